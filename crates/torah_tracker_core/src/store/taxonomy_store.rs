//! Taxonomy store implementation.
//!
//! # Responsibility
//! - Own the session `Document` and its gateway.
//! - Expose read queries and validated write commands for the view layer.
//!
//! # Invariants
//! - Validation happens before any mutation; a rejected command leaves the
//!   document untouched.
//! - Each successful mutation triggers exactly one gateway write.
//! - Import replaces the document wholesale or not at all.

use super::ids::generate_id;
use super::load::{load_document, LoadOrigin};
use super::{unit_count, Commit, PersistStatus, StoreError, StoreResult};
use crate::gateway::{PersistenceGateway, DOCUMENT_KEY};
use crate::model::document::{
    Category, CategoryId, Document, Track, TrackId, DEFAULT_CATEGORY_COLOR,
};
use crate::model::interchange::{export_document, parse_document};
use log::{debug, error, info, warn};

/// Counts describing an applied import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories: usize,
    pub tracks: usize,
    /// Tracks whose completion array was reset during import.
    pub repaired_tracks: usize,
}

/// Owner of the session document, writing through `G` after each mutation.
pub struct TaxonomyStore<G: PersistenceGateway> {
    gateway: G,
    document: Document,
    origin: LoadOrigin,
}

impl<G: PersistenceGateway> TaxonomyStore<G> {
    /// Restores the session document from `gateway`.
    ///
    /// A missing or unparsable blob is replaced by the default dataset,
    /// which is written back immediately. A failing read also seeds
    /// defaults, but nothing is written so the unreadable blob is not
    /// clobbered before the user acts.
    pub fn open(gateway: G) -> Self {
        let (raw, readable) = match gateway.get(DOCUMENT_KEY) {
            Ok(raw) => (raw, true),
            Err(err) => {
                error!(
                    "event=document_load module=store status=error error_code=gateway_read_failed error={}",
                    err
                );
                (None, false)
            }
        };

        let loaded = load_document(raw.as_deref());
        let mut store = Self {
            gateway,
            document: loaded.document,
            origin: loaded.origin,
        };
        if readable && store.origin.is_seeded() {
            store.persist();
        }
        store
    }

    /// Describes how the session document was obtained.
    pub fn origin(&self) -> &LoadOrigin {
        &self.origin
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn categories(&self) -> &[Category] {
        &self.document.categories
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.document.category(category_id)
    }

    pub fn track(&self, category_id: &str, track_id: &str) -> Option<&Track> {
        self.document.track(category_id, track_id)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Appends a new empty category and returns its generated id.
    ///
    /// A blank `color` falls back to the neutral default.
    pub fn add_category(&mut self, name: &str, color: &str) -> StoreResult<Commit<CategoryId>> {
        let name = normalize_name(name)?;
        let color = normalize_color(color);
        let id = generate_id(&name, |candidate| self.document.category(candidate).is_some());

        self.document
            .categories
            .push(Category::new(id.clone(), name, color));
        info!("event=category_add module=store status=ok category_id={id}");
        Ok(self.commit(id))
    }

    /// Renames and recolors a category.
    pub fn edit_category(
        &mut self,
        category_id: &str,
        name: &str,
        color: &str,
    ) -> StoreResult<Commit<()>> {
        let name = normalize_name(name)?;
        let color = normalize_color(color);
        let category = self.category_mut(category_id)?;
        category.name = name;
        category.color = color;
        Ok(self.commit(()))
    }

    /// Removes a category together with all of its tracks.
    pub fn remove_category(&mut self, category_id: &str) -> StoreResult<Commit<()>> {
        let before = self.document.categories.len();
        self.document
            .categories
            .retain(|category| category.id != category_id);
        if self.document.categories.len() == before {
            return Err(StoreError::CategoryNotFound(category_id.to_string()));
        }
        info!("event=category_remove module=store status=ok category_id={category_id}");
        Ok(self.commit(()))
    }

    /// Appends a track with `units` incomplete units and returns its id.
    pub fn add_track(
        &mut self,
        category_id: &str,
        title: &str,
        units: u32,
    ) -> StoreResult<Commit<TrackId>> {
        let title = normalize_title(title)?;
        validate_units(units)?;
        let category = self.category_mut(category_id)?;
        let id = generate_id(&title, |candidate| category.track(candidate).is_some());
        category.tracks.push(Track::new(id.clone(), title, units));
        info!(
            "event=track_add module=store status=ok category_id={category_id} track_id={id} units={units}"
        );
        Ok(self.commit(id))
    }

    /// Retitles a track and resizes it to `units`.
    pub fn edit_track(
        &mut self,
        category_id: &str,
        track_id: &str,
        title: &str,
        units: u32,
    ) -> StoreResult<Commit<()>> {
        let title = normalize_title(title)?;
        validate_units(units)?;
        let track = self.track_mut(category_id, track_id)?;
        track.title = title;
        track.resize(units);
        Ok(self.commit(()))
    }

    /// Grows (appending incomplete units) or shrinks (dropping the tail) a track.
    pub fn resize_track(
        &mut self,
        category_id: &str,
        track_id: &str,
        new_units: u32,
    ) -> StoreResult<Commit<()>> {
        validate_units(new_units)?;
        self.track_mut(category_id, track_id)?.resize(new_units);
        Ok(self.commit(()))
    }

    pub fn remove_track(&mut self, category_id: &str, track_id: &str) -> StoreResult<Commit<()>> {
        let category = self.category_mut(category_id)?;
        let before = category.tracks.len();
        category.tracks.retain(|track| track.id != track_id);
        if category.tracks.len() == before {
            return Err(StoreError::TrackNotFound {
                category_id: category_id.to_string(),
                track_id: track_id.to_string(),
            });
        }
        info!(
            "event=track_remove module=store status=ok category_id={category_id} track_id={track_id}"
        );
        Ok(self.commit(()))
    }

    /// Sets the completion flag of zero-based unit `index`.
    pub fn set_unit_completion(
        &mut self,
        category_id: &str,
        track_id: &str,
        index: u32,
        value: bool,
    ) -> StoreResult<Commit<()>> {
        let track = self.track_mut(category_id, track_id)?;
        *unit_flag(track, index)? = value;
        Ok(self.commit(()))
    }

    /// Flips unit `index` and returns its new state.
    pub fn toggle_unit(
        &mut self,
        category_id: &str,
        track_id: &str,
        index: u32,
    ) -> StoreResult<Commit<bool>> {
        let track = self.track_mut(category_id, track_id)?;
        let flag = unit_flag(track, index)?;
        *flag = !*flag;
        let value = *flag;
        Ok(self.commit(value))
    }

    /// Marks every unit of a track complete.
    pub fn mark_all(&mut self, category_id: &str, track_id: &str) -> StoreResult<Commit<()>> {
        self.track_mut(category_id, track_id)?.fill(true);
        Ok(self.commit(()))
    }

    /// Marks every unit of a track incomplete.
    pub fn clear_all(&mut self, category_id: &str, track_id: &str) -> StoreResult<Commit<()>> {
        self.track_mut(category_id, track_id)?.fill(false);
        Ok(self.commit(()))
    }

    /// Replaces the whole document with an interchange payload.
    ///
    /// # Errors
    /// - `StoreError::Import` when the payload is not JSON or lacks a
    ///   `categories` array (or has mistyped entries). The current document
    ///   is left untouched.
    pub fn import_document(&mut self, raw: &str) -> StoreResult<Commit<ImportSummary>> {
        let parsed = match parse_document(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(
                    "event=document_import module=store status=error error_code=invalid_payload error={}",
                    err
                );
                return Err(StoreError::Import(err));
            }
        };

        let summary = ImportSummary {
            categories: parsed.document.categories.len(),
            tracks: parsed
                .document
                .categories
                .iter()
                .map(|category| category.tracks.len())
                .sum(),
            repaired_tracks: parsed.repaired_tracks,
        };
        self.document = parsed.document;
        info!(
            "event=document_import module=store status=ok categories={} tracks={} repaired_tracks={}",
            summary.categories, summary.tracks, summary.repaired_tracks
        );
        Ok(self.commit(summary))
    }

    /// Serializes the current document in the interchange format.
    pub fn export_document(&self) -> StoreResult<String> {
        export_document(&self.document).map_err(StoreError::Export)
    }

    /// Writes the current document through the gateway.
    pub fn persist(&mut self) -> PersistStatus {
        let blob = match export_document(&self.document) {
            Ok(blob) => blob,
            Err(err) => {
                error!(
                    "event=document_save module=store status=error error_code=serialize_failed error={}",
                    err
                );
                return PersistStatus::Failed(err.to_string());
            }
        };

        match self.gateway.set(DOCUMENT_KEY, &blob) {
            Ok(()) => {
                debug!(
                    "event=document_save module=store status=ok bytes={}",
                    blob.len()
                );
                PersistStatus::Saved
            }
            Err(err) => {
                warn!(
                    "event=document_save module=store status=error error_code=gateway_write_failed error={}",
                    err
                );
                PersistStatus::Failed(err.to_string())
            }
        }
    }

    fn commit<T>(&mut self, value: T) -> Commit<T> {
        let persist = self.persist();
        Commit { value, persist }
    }

    fn category_mut(&mut self, category_id: &str) -> StoreResult<&mut Category> {
        self.document
            .category_mut(category_id)
            .ok_or_else(|| StoreError::CategoryNotFound(category_id.to_string()))
    }

    fn track_mut(&mut self, category_id: &str, track_id: &str) -> StoreResult<&mut Track> {
        self.category_mut(category_id)?
            .track_mut(track_id)
            .ok_or_else(|| StoreError::TrackNotFound {
                category_id: category_id.to_string(),
                track_id: track_id.to_string(),
            })
    }
}

fn unit_flag(track: &mut Track, index: u32) -> StoreResult<&mut bool> {
    let units = track.units;
    track
        .completed
        .get_mut(index as usize)
        .ok_or(StoreError::UnitOutOfRange { index, units })
}

fn normalize_name(value: &str) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn normalize_title(value: &str) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_color(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY_COLOR.to_string()
    } else {
        trimmed.to_string()
    }
}

fn validate_units(units: u32) -> StoreResult<()> {
    unit_count(i64::from(units)).map(|_| ())
}
