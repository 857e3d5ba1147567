//! JSON interchange format for documents.
//!
//! # Responsibility
//! - Parse raw JSON (persisted blobs and user imports) into a typed
//!   `Document`, repairing completion arrays on the way in.
//! - Serialize documents for export and persistence.
//! - Provide the built-in default dataset.
//!
//! # Invariants
//! - A payload without an array at `categories` is rejected as a whole.
//! - A track whose `completed` value is missing, not an array of booleans,
//!   or of the wrong length is reset to all-false; this is never an error.
//! - `parse_document(&export_document(d)?)` yields `d` for consistent `d`.
//!
//! # See also
//! - `store::taxonomy_store` for the load/import entry points.

use crate::model::document::{
    Category, Document, Track, DEFAULT_CATEGORY_COLOR, MAX_TRACK_UNITS,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DEFAULT_DOCUMENT: Lazy<Document> = Lazy::new(|| {
    parse_document(include_str!("default_data.json"))
        .expect("valid built-in dataset")
        .document
});

/// Errors raised while reading or writing the interchange format.
#[derive(Debug)]
pub enum DocumentError {
    /// Input is not valid JSON.
    Malformed(serde_json::Error),
    /// Input has no array at `categories`.
    MissingCategories,
    /// A category or track lacks a required field or has the wrong type.
    InvalidShape(serde_json::Error),
    /// A track declares zero units or more than `MAX_TRACK_UNITS`.
    UnitsOutOfRange {
        category_id: String,
        track_id: String,
        units: u32,
    },
    /// Serialization failed.
    Serialize(serde_json::Error),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "document is not valid JSON: {err}"),
            Self::MissingCategories => write!(f, "document must contain a `categories` array"),
            Self::InvalidShape(err) => write!(f, "document has invalid structure: {err}"),
            Self::UnitsOutOfRange {
                category_id,
                track_id,
                units,
            } => write!(
                f,
                "track `{track_id}` in category `{category_id}` declares {units} units; expected 1..={MAX_TRACK_UNITS}"
            ),
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) | Self::InvalidShape(err) | Self::Serialize(err) => Some(err),
            Self::MissingCategories | Self::UnitsOutOfRange { .. } => None,
        }
    }
}

/// Parse result with repair metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub document: Document,
    /// Tracks whose completion array was reset during parsing.
    pub repaired_tracks: usize,
}

#[derive(Deserialize)]
struct RawDocument {
    categories: Vec<RawCategory>,
}

#[derive(Deserialize)]
struct RawCategory {
    id: String,
    name: String,
    #[serde(default)]
    color: Option<String>,
    tracks: Vec<RawTrack>,
}

#[derive(Deserialize)]
struct RawTrack {
    id: String,
    title: String,
    units: u32,
    #[serde(default)]
    completed: Option<Value>,
}

/// Returns a fresh copy of the built-in dataset with all units incomplete.
pub fn default_document() -> Document {
    DEFAULT_DOCUMENT.clone()
}

/// Parses and repairs a raw interchange payload.
///
/// # Errors
/// - `Malformed` when `raw` is not JSON.
/// - `MissingCategories` when `categories` is absent or not an array.
/// - `InvalidShape` when a category/track field is missing or mistyped.
/// - `UnitsOutOfRange` when a track declares no units or too many.
pub fn parse_document(raw: &str) -> Result<ParsedDocument, DocumentError> {
    let value: Value = serde_json::from_str(raw).map_err(DocumentError::Malformed)?;
    if !value.get("categories").is_some_and(Value::is_array) {
        return Err(DocumentError::MissingCategories);
    }
    let raw_document: RawDocument =
        serde_json::from_value(value).map_err(DocumentError::InvalidShape)?;

    let mut repaired_tracks = 0;
    let mut categories = Vec::with_capacity(raw_document.categories.len());
    for raw_category in raw_document.categories {
        let mut tracks = Vec::with_capacity(raw_category.tracks.len());
        for raw_track in raw_category.tracks {
            if raw_track.units == 0 || raw_track.units > MAX_TRACK_UNITS {
                return Err(DocumentError::UnitsOutOfRange {
                    category_id: raw_category.id,
                    track_id: raw_track.id,
                    units: raw_track.units,
                });
            }
            let completed = match completion_flags(raw_track.units, raw_track.completed) {
                Some(flags) => flags,
                None => {
                    repaired_tracks += 1;
                    vec![false; raw_track.units as usize]
                }
            };
            tracks.push(Track {
                id: raw_track.id,
                title: raw_track.title,
                units: raw_track.units,
                completed,
            });
        }

        let color = raw_category
            .color
            .filter(|color| !color.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());
        categories.push(Category {
            id: raw_category.id,
            name: raw_category.name,
            color,
            tracks,
        });
    }

    Ok(ParsedDocument {
        document: Document { categories },
        repaired_tracks,
    })
}

/// Serializes a document as pretty-printed JSON.
pub fn export_document(document: &Document) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(document).map_err(DocumentError::Serialize)
}

fn completion_flags(units: u32, raw: Option<Value>) -> Option<Vec<bool>> {
    let Value::Array(items) = raw? else {
        return None;
    };
    if items.len() != units as usize {
        return None;
    }
    items.iter().map(Value::as_bool).collect()
}

#[cfg(test)]
mod tests {
    use super::{default_document, export_document, parse_document, DocumentError};

    #[test]
    fn default_dataset_is_consistent_and_unstarted() {
        let document = default_document();
        assert_eq!(document.categories.len(), 1);
        let gemara = document.category("gemara").expect("gemara category");
        assert_eq!(gemara.tracks.len(), 39);
        assert_eq!(gemara.track("berakhot").map(|t| t.units), Some(64));
        assert!(document.is_consistent());
        assert!(gemara
            .tracks
            .iter()
            .all(|track| track.completed.iter().all(|flag| !flag)));
    }

    #[test]
    fn default_document_returns_independent_copies() {
        let mut first = default_document();
        first.categories[0].tracks[0].completed[0] = true;
        first.categories.clear();

        let second = default_document();
        assert_eq!(second.categories.len(), 1);
        assert!(!second.categories[0].tracks[0].completed[0]);
    }

    #[test]
    fn parse_rejects_missing_categories_array() {
        let err = parse_document(r#"{"categories": {}}"#).unwrap_err();
        assert!(matches!(err, DocumentError::MissingCategories));

        let err = parse_document("[]").unwrap_err();
        assert!(matches!(err, DocumentError::MissingCategories));
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = parse_document("{not json").unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn parse_resets_mistyped_completion_values() {
        let raw = r##"{"categories":[{"id":"c","name":"C","color":"#111111","tracks":[
            {"id":"a","title":"A","units":2,"completed":"yes"},
            {"id":"b","title":"B","units":2,"completed":[true, 1]},
            {"id":"d","title":"D","units":2,"completed":[true, false]}
        ]}]}"##;
        let parsed = parse_document(raw).unwrap();
        assert_eq!(parsed.repaired_tracks, 2);
        let category = &parsed.document.categories[0];
        assert_eq!(category.tracks[0].completed, vec![false, false]);
        assert_eq!(category.tracks[1].completed, vec![false, false]);
        assert_eq!(category.tracks[2].completed, vec![true, false]);
    }

    #[test]
    fn parse_rejects_zero_and_oversized_unit_counts() {
        for units in [0, 10_001] {
            let raw = format!(
                r#"{{"categories":[{{"id":"c","name":"C","tracks":[{{"id":"t","title":"T","units":{units}}}]}}]}}"#
            );
            match parse_document(&raw).unwrap_err() {
                DocumentError::UnitsOutOfRange {
                    category_id,
                    track_id,
                    units: found,
                } => {
                    assert_eq!((category_id.as_str(), track_id.as_str()), ("c", "t"));
                    assert_eq!(found, units);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn parse_fills_missing_color_with_default() {
        let raw = r#"{"categories":[{"id":"c","name":"C","tracks":[]}]}"#;
        let parsed = parse_document(raw).unwrap();
        assert_eq!(parsed.document.categories[0].color, "#888888");
    }

    #[test]
    fn export_is_pretty_printed_json() {
        let json = export_document(&default_document()).unwrap();
        assert!(json.starts_with("{\n"));
        assert!(json.contains("\"categories\""));
    }
}
