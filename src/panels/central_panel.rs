use egui::{Color32, Stroke};

use crate::ChartApp;
use crate::coords::CoordinateMapper;
use crate::render::PainterSurface;

const SERIES_COLOR: Color32 = Color32::from_rgb(0x4c, 0xaf, 0x50);

pub fn central_panel(app: &mut ChartApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        // Gestures first so a pointer-down that starts one also locks navigation
        app.handle_input(ctx, rect);

        if app.navigation_enabled() {
            if response.dragged() {
                app.mapper_mut().pan(response.drag_delta());
            }
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                if let Some(pos) = response.hover_pos() {
                    app.mapper_mut().zoom_time((scroll as f64 / 200.0).exp(), pos.x);
                }
            }
        }

        painter.rect_filled(rect, 0.0, Color32::from_gray(18));

        let mapper = app.mapper();
        let points: Vec<_> = app
            .series()
            .iter()
            .map(|p| mapper.domain_to_screen(*p))
            .collect();
        for pair in points.windows(2) {
            if let [Some(a), Some(b)] = pair {
                painter.line_segment([*a, *b], Stroke::new(1.5, SERIES_COLOR));
            }
        }

        let mapper = app.mapper().clone();
        let mut surface = PainterSurface::new(&painter);
        app.manager_mut().paint(&mut surface, &mapper);
    });
}
