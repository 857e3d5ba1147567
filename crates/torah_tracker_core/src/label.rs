//! Per-category unit label conventions.
//!
//! # Responsibility
//! - Map a category id to a unit-kind word and a numbering scheme.
//! - Load that mapping from JSON so deployments can override it.
//!
//! # Invariants
//! - Lookup never fails: unknown categories use the `default` convention.
//! - Labels are `<unit word> <numeral>`.

use crate::numeral::{format_numeral, NumberingScheme};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Kind of unit a category counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Folio page (`דף`).
    Page,
    /// Paragraph/section (`סעיף`).
    Section,
    /// Chapter (`פרק`).
    Chapter,
}

impl UnitKind {
    /// Display word prefixed to the numeral.
    pub fn word(self) -> &'static str {
        match self {
            Self::Page => "דף",
            Self::Section => "סעיף",
            Self::Chapter => "פרק",
        }
    }
}

/// Unit kind plus numbering scheme for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConvention {
    pub unit_kind: UnitKind,
    #[serde(default)]
    pub numbering: NumberingScheme,
}

impl LabelConvention {
    pub const fn new(unit_kind: UnitKind, numbering: NumberingScheme) -> Self {
        Self {
            unit_kind,
            numbering,
        }
    }

    /// Builds the display label for zero-based unit `index`.
    pub fn label(&self, index: u32) -> String {
        format!(
            "{} {}",
            self.unit_kind.word(),
            format_numeral(self.numbering, index)
        )
    }
}

const FALLBACK_CONVENTION: LabelConvention =
    LabelConvention::new(UnitKind::Chapter, NumberingScheme::Numeric);

fn fallback_convention() -> LabelConvention {
    FALLBACK_CONVENTION
}

/// Category id -> label convention lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConventions {
    #[serde(default = "fallback_convention")]
    default: LabelConvention,
    #[serde(default)]
    categories: BTreeMap<String, LabelConvention>,
}

/// Errors from loading label configuration.
#[derive(Debug)]
pub enum LabelConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for LabelConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read label config: {err}"),
            Self::Parse(err) => write!(f, "invalid label config: {err}"),
        }
    }
}

impl Error for LabelConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl Default for LabelConventions {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LabelConventions {
    /// Creates an empty table where every category uses `default`.
    pub fn with_default(default: LabelConvention) -> Self {
        Self {
            default,
            categories: BTreeMap::new(),
        }
    }

    /// Shipped conventions: Gemara pages in letters, Shulchan Aruch sections
    /// in digits, chapters in digits for everything else.
    pub fn builtin() -> Self {
        Self::with_default(FALLBACK_CONVENTION)
            .with_category(
                "gemara",
                LabelConvention::new(UnitKind::Page, NumberingScheme::Alphabetic),
            )
            .with_category(
                "shulchan_aruch",
                LabelConvention::new(UnitKind::Section, NumberingScheme::Numeric),
            )
    }

    /// Adds or replaces the convention for `category_id`.
    pub fn with_category(
        mut self,
        category_id: impl Into<String>,
        convention: LabelConvention,
    ) -> Self {
        self.categories.insert(category_id.into(), convention);
        self
    }

    /// Parses a JSON table such as
    /// `{"default": {"unit_kind": "chapter"}, "categories": {"gemara": {"unit_kind": "page", "numbering": "alphabetic"}}}`.
    pub fn from_json_str(raw: &str) -> Result<Self, LabelConfigError> {
        serde_json::from_str(raw).map_err(LabelConfigError::Parse)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LabelConfigError> {
        let raw = std::fs::read_to_string(path).map_err(LabelConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn convention_for(&self, category_id: &str) -> LabelConvention {
        self.categories
            .get(category_id)
            .copied()
            .unwrap_or(self.default)
    }

    /// Label for zero-based unit `index` of a track in `category_id`.
    pub fn unit_label(&self, category_id: &str, index: u32) -> String {
        self.convention_for(category_id).label(index)
    }
}
