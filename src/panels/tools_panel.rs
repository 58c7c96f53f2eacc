use crate::ChartApp;
use crate::drawing::DrawingKind;

pub fn tools_panel(app: &mut ChartApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let active = app.manager().active_tool();

            for &kind in DrawingKind::all() {
                if ui.selectable_label(active == Some(kind), kind.name()).clicked() {
                    log::info!("Tool selected from UI: {}", kind);
                    if let Err(err) = app.manager_mut().select_tool(kind) {
                        log::warn!("{}", err);
                    }
                }
            }
            ui.separator();

            let can_undo = app.manager().can_undo();
            let can_redo = app.manager().can_redo();
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                app.manager_mut().undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                app.manager_mut().redo();
            }
            if ui.add_enabled(!app.manager().is_empty(), egui::Button::new("Clear")).clicked() {
                app.manager_mut().clear_all();
            }
            ui.separator();

            ui.label(format!("Drawings: {}", app.manager().len()));
            if !app.navigation_enabled() {
                ui.label("drawing…");
            }
        });
    });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.manager_mut().deselect_tool();
    }
    if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
        if let Some(id) = app.manager().hovered() {
            app.manager_mut().remove_drawing(id);
        }
    }
}
