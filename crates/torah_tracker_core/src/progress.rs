//! Completion progress aggregation.
//!
//! Progress is recomputed from the document on every call; nothing is cached.

use crate::model::document::{Category, Document, Track};
use std::ops::Add;

/// Completed/total unit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: u64,
    pub total: u64,
}

impl Progress {
    /// Floored whole percentage; `0` when `total == 0`.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u32
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl Add for Progress {
    type Output = Progress;

    fn add(self, rhs: Self) -> Self::Output {
        Progress {
            completed: self.completed + rhs.completed,
            total: self.total + rhs.total,
        }
    }
}

pub fn track_progress(track: &Track) -> Progress {
    Progress {
        completed: track.completed.iter().filter(|flag| **flag).count() as u64,
        total: u64::from(track.units),
    }
}

/// Sums track progress in order; empty categories yield `0/0`.
pub fn category_progress(category: &Category) -> Progress {
    category
        .tracks
        .iter()
        .map(track_progress)
        .fold(Progress::default(), Add::add)
}

pub fn document_progress(document: &Document) -> Progress {
    document
        .categories
        .iter()
        .map(category_progress)
        .fold(Progress::default(), Add::add)
}
