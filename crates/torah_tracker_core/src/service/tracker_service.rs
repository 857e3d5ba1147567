//! Tracker use-case service.
//!
//! # Responsibility
//! - Answer the per-screen read queries (home, category, track, manage).
//! - Provide stable command entry points for view/FFI/CLI callers.

use crate::gateway::PersistenceGateway;
use crate::label::LabelConventions;
use crate::model::document::{Category, CategoryId, Track, TrackId};
use crate::progress::{category_progress, document_progress, track_progress};
use crate::service::screens::{
    progress_caption, ratio_text, CategoryCard, CategoryScreen, HomeScreen, ManagedCategory,
    ManagedTrack, TrackCard, TrackScreen, UnitRow,
};
use crate::store::taxonomy_store::{ImportSummary, TaxonomyStore};
use crate::store::{Commit, StoreResult};

/// Use-case facade over a taxonomy store and its label conventions.
pub struct TrackerService<G: PersistenceGateway> {
    store: TaxonomyStore<G>,
    labels: LabelConventions,
}

impl<G: PersistenceGateway> TrackerService<G> {
    pub fn new(store: TaxonomyStore<G>, labels: LabelConventions) -> Self {
        Self { store, labels }
    }

    /// Loads the session document from `gateway`.
    pub fn open(gateway: G, labels: LabelConventions) -> Self {
        Self::new(TaxonomyStore::open(gateway), labels)
    }

    pub fn store(&self) -> &TaxonomyStore<G> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaxonomyStore<G> {
        &mut self.store
    }

    pub fn labels(&self) -> &LabelConventions {
        &self.labels
    }

    /// Label for zero-based unit `index` of a track in `category_id`.
    pub fn unit_label(&self, category_id: &str, index: u32) -> String {
        self.labels.unit_label(category_id, index)
    }

    pub fn home(&self) -> HomeScreen {
        HomeScreen {
            categories: self.store.categories().iter().map(category_card).collect(),
            overall: document_progress(self.store.document()),
        }
    }

    /// Returns `None` when the category does not exist.
    pub fn category_screen(&self, category_id: &str) -> Option<CategoryScreen> {
        let category = self.store.category(category_id)?;
        Some(CategoryScreen {
            category: category_card(category),
            tracks: category.tracks.iter().map(track_card).collect(),
        })
    }

    /// Returns `None` when the category or track does not exist.
    pub fn track_screen(&self, category_id: &str, track_id: &str) -> Option<TrackScreen> {
        let category = self.store.category(category_id)?;
        let track = category.track(track_id)?;
        let convention = self.labels.convention_for(category_id);
        let units = track
            .completed
            .iter()
            .enumerate()
            .map(|(index, completed)| {
                let index = index as u32;
                UnitRow {
                    index,
                    label: convention.label(index),
                    completed: *completed,
                }
            })
            .collect();
        let progress = track_progress(track);

        Some(TrackScreen {
            category_id: category.id.clone(),
            track_id: track.id.clone(),
            title: track.title.clone(),
            color: category.color.clone(),
            units,
            progress,
            percent: progress.percent(),
            caption: progress_caption(progress),
        })
    }

    pub fn manage_screen(&self) -> Vec<ManagedCategory> {
        self.store
            .categories()
            .iter()
            .map(|category| ManagedCategory {
                id: category.id.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
                tracks: category
                    .tracks
                    .iter()
                    .map(|track| ManagedTrack {
                        id: track.id.clone(),
                        title: track.title.clone(),
                        units: track.units,
                        caption: format!("{} ({})", track.title, track.units),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn toggle_unit(
        &mut self,
        category_id: &str,
        track_id: &str,
        index: u32,
    ) -> StoreResult<Commit<bool>> {
        self.store.toggle_unit(category_id, track_id, index)
    }

    pub fn set_unit_completion(
        &mut self,
        category_id: &str,
        track_id: &str,
        index: u32,
        value: bool,
    ) -> StoreResult<Commit<()>> {
        self.store
            .set_unit_completion(category_id, track_id, index, value)
    }

    pub fn mark_all(&mut self, category_id: &str, track_id: &str) -> StoreResult<Commit<()>> {
        self.store.mark_all(category_id, track_id)
    }

    pub fn clear_all(&mut self, category_id: &str, track_id: &str) -> StoreResult<Commit<()>> {
        self.store.clear_all(category_id, track_id)
    }

    pub fn add_category(&mut self, name: &str, color: &str) -> StoreResult<Commit<CategoryId>> {
        self.store.add_category(name, color)
    }

    pub fn edit_category(
        &mut self,
        category_id: &str,
        name: &str,
        color: &str,
    ) -> StoreResult<Commit<()>> {
        self.store.edit_category(category_id, name, color)
    }

    pub fn delete_category(&mut self, category_id: &str) -> StoreResult<Commit<()>> {
        self.store.remove_category(category_id)
    }

    pub fn add_track(
        &mut self,
        category_id: &str,
        title: &str,
        units: u32,
    ) -> StoreResult<Commit<TrackId>> {
        self.store.add_track(category_id, title, units)
    }

    pub fn edit_track(
        &mut self,
        category_id: &str,
        track_id: &str,
        title: &str,
        units: u32,
    ) -> StoreResult<Commit<()>> {
        self.store.edit_track(category_id, track_id, title, units)
    }

    pub fn delete_track(&mut self, category_id: &str, track_id: &str) -> StoreResult<Commit<()>> {
        self.store.remove_track(category_id, track_id)
    }

    pub fn import_json(&mut self, raw: &str) -> StoreResult<Commit<ImportSummary>> {
        self.store.import_document(raw)
    }

    pub fn export_json(&self) -> StoreResult<String> {
        self.store.export_document()
    }
}

fn category_card(category: &Category) -> CategoryCard {
    let progress = category_progress(category);
    CategoryCard {
        id: category.id.clone(),
        name: category.name.clone(),
        color: category.color.clone(),
        progress,
        percent: progress.percent(),
        ratio: ratio_text(progress),
    }
}

fn track_card(track: &Track) -> TrackCard {
    let progress = track_progress(track);
    TrackCard {
        id: track.id.clone(),
        title: track.title.clone(),
        progress,
        percent: progress.percent(),
        ratio: ratio_text(progress),
    }
}
