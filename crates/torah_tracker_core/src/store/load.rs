//! Session-start document restoration.

use crate::model::document::Document;
use crate::model::interchange::{default_document, parse_document};
use log::{info, warn};

/// How the session document was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Parsed from the stored blob.
    Restored { repaired_tracks: usize },
    /// Nothing was stored; defaults were seeded.
    SeededEmpty,
    /// The stored blob was unusable; defaults were seeded.
    SeededAfterError(String),
}

impl LoadOrigin {
    /// Whether the document came from the built-in dataset and should be
    /// written back immediately.
    pub fn is_seeded(&self) -> bool {
        !matches!(self, Self::Restored { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub document: Document,
    pub origin: LoadOrigin,
}

/// Builds the session document from an optional stored blob.
///
/// Never fails: a missing or unparsable blob falls back to a fresh copy of
/// the default dataset, and inconsistent tracks are reset per track.
pub fn load_document(raw: Option<&str>) -> LoadedDocument {
    let Some(raw) = raw else {
        info!("event=document_load module=store status=seeded reason=empty");
        return LoadedDocument {
            document: default_document(),
            origin: LoadOrigin::SeededEmpty,
        };
    };

    match parse_document(raw) {
        Ok(parsed) => {
            if parsed.repaired_tracks > 0 {
                warn!(
                    "event=track_repaired module=store status=repaired count={}",
                    parsed.repaired_tracks
                );
            }
            info!(
                "event=document_load module=store status=ok categories={} repaired_tracks={}",
                parsed.document.categories.len(),
                parsed.repaired_tracks
            );
            LoadedDocument {
                document: parsed.document,
                origin: LoadOrigin::Restored {
                    repaired_tracks: parsed.repaired_tracks,
                },
            }
        }
        Err(err) => {
            warn!(
                "event=document_load module=store status=seeded reason=malformed error={}",
                err
            );
            LoadedDocument {
                document: default_document(),
                origin: LoadOrigin::SeededAfterError(err.to_string()),
            }
        }
    }
}
