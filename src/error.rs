use thiserror::Error;

/// Errors from tool lookup and activation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The tag does not name any drawing kind
    #[error("Unknown tool kind: {0}")]
    UnknownKind(String),

    /// The kind exists but no tool was registered for it
    #[error("No tool registered for {0}")]
    NotRegistered(crate::drawing::DrawingKind),
}

/// Why a single persisted record was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("{kind} needs {expected} anchors, record has {found}")]
    AnchorCount {
        kind: crate::drawing::DrawingKind,
        expected: usize,
        found: usize,
    },

    #[error("Anchor {index} is not a finite time/price pair")]
    NonFiniteAnchor { index: usize },
}

/// Errors from the configuration layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
