//! Read models for the browsing and management screens.

use crate::progress::Progress;

/// Category card on the home screen (or header of a category screen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub id: String,
    pub name: String,
    pub color: String,
    pub progress: Progress,
    /// Floored percentage of `progress`.
    pub percent: u32,
    /// `completed/total`, e.g. `12/64`.
    pub ratio: String,
}

/// Track card on a category screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCard {
    pub id: String,
    pub title: String,
    pub progress: Progress,
    pub percent: u32,
    pub ratio: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeScreen {
    pub categories: Vec<CategoryCard>,
    /// Progress across every category.
    pub overall: Progress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScreen {
    pub category: CategoryCard,
    pub tracks: Vec<TrackCard>,
}

/// One checkable unit row on a track screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRow {
    /// Zero-based unit index, the value commands expect.
    pub index: u32,
    pub label: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackScreen {
    pub category_id: String,
    pub track_id: String,
    pub title: String,
    pub color: String,
    pub units: Vec<UnitRow>,
    pub progress: Progress,
    pub percent: u32,
    /// Footer caption, e.g. `הושלמו 1 מתוך 3`.
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedTrack {
    pub id: String,
    pub title: String,
    pub units: u32,
    /// `title (units)` as shown in the manage list.
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedCategory {
    pub id: String,
    pub name: String,
    pub color: String,
    pub tracks: Vec<ManagedTrack>,
}

pub fn ratio_text(progress: Progress) -> String {
    format!("{}/{}", progress.completed, progress.total)
}

pub fn progress_caption(progress: Progress) -> String {
    format!("הושלמו {} מתוך {}", progress.completed, progress.total)
}
