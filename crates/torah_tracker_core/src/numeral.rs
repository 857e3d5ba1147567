//! Unit numeral formatting.
//!
//! # Responsibility
//! - Turn zero-based unit indices into display numerals.
//! - Implement Hebrew alphabetic (gematria) numbering for page counts.
//!
//! # Invariants
//! - Residues 15 and 16 (mod 100) are written `טו` / `טז`, never `יה` / `יו`.
//! - Hundreds are written by repeating `ק`; this is exact up to 499 and is
//!   only used for tracks far below that.

use serde::{Deserialize, Serialize};

const HUNDRED_LETTER: char = 'ק';
const TENS_LETTERS: [char; 9] = ['י', 'כ', 'ל', 'מ', 'נ', 'ס', 'ע', 'פ', 'צ'];
const UNIT_LETTERS: [char; 9] = ['א', 'ב', 'ג', 'ד', 'ה', 'ו', 'ז', 'ח', 'ט'];
const FIFTEEN_TOKEN: &str = "טו";
const SIXTEEN_TOKEN: &str = "טז";

/// Numbering scheme applied to unit labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingScheme {
    /// Base-10 arabic digits.
    #[default]
    Numeric,
    /// Hebrew letters (gematria).
    Alphabetic,
}

/// Formats the unit at zero-based `index` under `scheme`.
pub fn format_numeral(scheme: NumberingScheme, index: u32) -> String {
    let value = i64::from(index) + 1;
    match scheme {
        NumberingScheme::Numeric => value.to_string(),
        NumberingScheme::Alphabetic => hebrew_numeral(value),
    }
}

/// Renders a positive integer as Hebrew letters.
///
/// Returns an empty string for non-positive input.
pub fn hebrew_numeral(value: i64) -> String {
    if value <= 0 {
        return String::new();
    }
    match value % 100 {
        15 => return hebrew_numeral(value - 15) + FIFTEEN_TOKEN,
        16 => return hebrew_numeral(value - 16) + SIXTEEN_TOKEN,
        _ => {}
    }

    let mut result: String = std::iter::repeat(HUNDRED_LETTER)
        .take((value / 100) as usize)
        .collect();
    let remainder = value % 100;
    let tens = (remainder / 10) as usize;
    let units = (remainder % 10) as usize;
    if tens > 0 {
        result.push(TENS_LETTERS[tens - 1]);
    }
    if units > 0 {
        result.push(UNIT_LETTERS[units - 1]);
    }
    result
}
