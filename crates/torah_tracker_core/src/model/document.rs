//! Document, category and track records.
//!
//! # Responsibility
//! - Define the typed in-memory tree that replaces the persisted JSON blob.
//! - Provide lookup and completion-array helpers used by the store.
//!
//! # Invariants
//! - `Track::completed` length always equals `Track::units`.
//! - `Track::resize` adjusts the array first and only then moves `units`.

use serde::{Deserialize, Serialize};

/// Stable category identifier (unique within a document).
pub type CategoryId = String;

/// Stable track identifier (unique within its category).
pub type TrackId = String;

/// Color hint used when a category carries none.
pub const DEFAULT_CATEGORY_COLOR: &str = "#888888";

/// Largest unit count a track may declare. Shulchan Aruch Orach Chaim,
/// the longest shipped work, has 697 sections.
pub const MAX_TRACK_UNITS: u32 = 10_000;

/// Root persisted state: ordered categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub categories: Vec<Category>,
}

/// Top-level grouping of tracks (a work or corpus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// User-facing display name.
    pub name: String,
    /// Display hint, usually a `#rrggbb` string.
    pub color: String,
    pub tracks: Vec<Track>,
}

/// Countable sub-division of a category with a fixed number of units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    /// Total number of trackable units.
    pub units: u32,
    /// One completion flag per unit, index-aligned with unit numbers.
    pub completed: Vec<bool>,
}

impl Document {
    /// Returns the category with `id`, if present.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    /// Returns the track `track_id` inside category `category_id`.
    pub fn track(&self, category_id: &str, track_id: &str) -> Option<&Track> {
        self.category(category_id)
            .and_then(|category| category.track(track_id))
    }

    pub fn track_mut(&mut self, category_id: &str, track_id: &str) -> Option<&mut Track> {
        self.category_mut(category_id)
            .and_then(|category| category.track_mut(track_id))
    }

    /// Repairs every track whose completion array drifted from its unit count.
    ///
    /// Returns how many tracks were reset.
    pub fn repair_all(&mut self) -> usize {
        self.categories
            .iter_mut()
            .flat_map(|category| category.tracks.iter_mut())
            .map(Track::repair)
            .filter(|repaired| *repaired)
            .count()
    }

    /// Returns whether every track satisfies the completion-length invariant.
    pub fn is_consistent(&self) -> bool {
        self.categories
            .iter()
            .flat_map(|category| category.tracks.iter())
            .all(Track::is_consistent)
    }
}

impl Category {
    /// Creates an empty category.
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            tracks: Vec::new(),
        }
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    pub fn track_mut(&mut self, id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|track| track.id == id)
    }
}

impl Track {
    /// Creates a track with every unit marked incomplete.
    pub fn new(id: impl Into<String>, title: impl Into<String>, units: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            units,
            completed: vec![false; units as usize],
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.completed.len() == self.units as usize
    }

    /// Resets the completion array when its length disagrees with `units`.
    ///
    /// There is no index correlation between a mismatched array and the
    /// current unit count, so history is dropped rather than guessed.
    /// Returns `true` when a reset happened.
    pub fn repair(&mut self) -> bool {
        if self.is_consistent() {
            return false;
        }
        self.completed = vec![false; self.units as usize];
        true
    }

    /// Grows or shrinks the track, keeping flags of surviving units.
    pub fn resize(&mut self, new_units: u32) {
        let old_units = self.units as usize;
        let new_len = new_units as usize;
        if self.completed.len() != old_units {
            self.completed = vec![false; old_units];
        }
        if new_len > old_units {
            self.completed.resize(new_len, false);
        } else {
            self.completed.truncate(new_len);
        }
        self.units = new_units;
    }

    /// Sets every unit flag to `value`.
    pub fn fill(&mut self, value: bool) {
        self.completed.iter_mut().for_each(|flag| *flag = value);
    }
}
