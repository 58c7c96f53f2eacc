use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a committed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingId(Uuid);

impl DrawingId {
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for DrawingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

// Ids are only handed out at commit time, so in-progress drawings never carry one.
pub fn generate_id() -> DrawingId {
    DrawingId(Uuid::new_v4())
}
