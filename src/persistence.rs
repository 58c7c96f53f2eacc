//! Export/import format: an ordered list of `{kind, anchors, style, createdAt}` records.
//!
//! Only domain coordinates are stored. Screen positions and derived values are never
//! written, and anything found in a record is validated before it becomes a drawing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::DomainPoint;
use crate::drawing::{Drawing, StyleRecord};
use crate::error::RecordError;
use crate::id_generator::DrawingId;

/// Errors that abort a whole export or import
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize drawings: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid drawing data: {0}")]
    InvalidData(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One persisted drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRecord {
    pub kind: String,
    #[serde(default)]
    pub anchors: Vec<DomainPoint>,
    #[serde(default)]
    pub style: StyleRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
}

impl DrawingRecord {
    pub fn from_drawing(drawing: &Drawing) -> Self {
        Self {
            kind: drawing.kind().name().to_owned(),
            anchors: drawing.anchors().to_vec(),
            style: drawing.style().to_record(),
            created_at: Some(drawing.created_at()),
        }
    }
}

/// Outcome of an import; the batch never fails because of a single record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Ids of the drawings added, in record order
    pub imported: Vec<DrawingId>,
    /// `(record index, reason)` for every rejected record
    pub skipped: Vec<(usize, RecordError)>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

pub fn encode_records(records: &[DrawingRecord]) -> PersistenceResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Split a JSON document into per-record results.
///
/// Fails only when the document itself is not a JSON array; a malformed entry turns
/// into an `Err` at its position and the rest still decode.
pub fn decode_records(json: &str) -> PersistenceResult<Vec<Result<DrawingRecord, RecordError>>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(PersistenceError::InvalidData("expected an array of drawings".to_owned()));
    };
    Ok(entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value::<DrawingRecord>(entry).map_err(|e| RecordError::Malformed(e.to_string()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_names() {
        let record = DrawingRecord {
            kind: "HorizontalLine".to_owned(),
            anchors: vec![DomainPoint::new(1.0, 2.5)],
            style: StyleRecord::default(),
            created_at: Some(42),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["anchors"][0]["price"], 2.5);
        assert!(json.get("derived").is_none());
    }

    #[test]
    fn test_decode_keeps_going_after_bad_entry() {
        let json = r#"[
            { "kind": "TrendLine", "anchors": [{ "time": 1, "price": 2 }, { "time": 3, "price": 4 }] },
            { "kind": 7 },
            { "kind": "HorizontalLine", "anchors": [{ "time": 1, "price": 2 }] }
        ]"#;
        let records = decode_records(json).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(RecordError::Malformed(_))));
        assert!(records[2].is_ok());
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(matches!(decode_records(r#"{ "kind": "TrendLine" }"#), Err(PersistenceError::InvalidData(_))));
        assert!(matches!(decode_records("not json"), Err(PersistenceError::SerializationError(_))));
    }
}
