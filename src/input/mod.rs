use egui::{Context, Pos2, Rect};

/// Primary-button pointer notifications in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    /// Pointer left the chart area
    Leave,
}

/// Turns raw egui pointer state into [`PointerEvent`]s for the chart area.
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    chart_rect: Option<Rect>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the chart rectangle; positions outside it count as "left".
    pub fn set_chart_rect(&mut self, rect: Rect) {
        self.chart_rect = Some(rect);
    }

    fn in_chart(&self, pos: Pos2) -> bool {
        self.chart_rect.is_none_or(|rect| rect.contains(pos))
    }

    /// Process raw egui input and generate pointer events
    pub fn process_input(&mut self, ctx: &Context) -> Vec<PointerEvent> {
        let (hover, pressed, released) = ctx.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
            )
        });
        self.translate(hover, pressed, released)
    }

    /// Same as [`Self::process_input`] for an already sampled pointer state.
    pub fn translate(&mut self, hover: Option<Pos2>, pressed: bool, released: bool) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        match hover.filter(|pos| self.in_chart(*pos)) {
            Some(pos) => {
                if pressed {
                    events.push(PointerEvent::Down(pos));
                } else if Some(pos) != self.last_pointer_pos {
                    events.push(PointerEvent::Move(pos));
                }
                if released {
                    events.push(PointerEvent::Up(pos));
                }
                self.last_pointer_pos = Some(pos);
            }
            None => {
                if self.last_pointer_pos.take().is_some() {
                    events.push(PointerEvent::Leave);
                }
            }
        }

        events
    }
}
