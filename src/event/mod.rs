mod bus;
mod events;

pub use bus::EventBus;
pub use events::{AnnotationEvent, HistoryEvent};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &AnnotationEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&AnnotationEvent) + Send,
{
    fn handle_event(&mut self, event: &AnnotationEvent) {
        self(event)
    }
}
