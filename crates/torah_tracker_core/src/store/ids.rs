//! Generated identifiers for user-created categories and tracks.
//!
//! Ids are `<slug>-<salt>`: the slug keeps them readable, the random salt
//! keeps them unique. `~` is stripped because views use it to join
//! category and track ids in location fragments.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Separator joining category and track ids in route fragments.
pub const ROUTE_SEPARATOR: char = '~';

const SALT_LEN: usize = 8;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Lowercases `name` and replaces whitespace runs with `-`.
pub fn slugify(name: &str) -> String {
    WHITESPACE_RE
        .replace_all(name.trim(), "-")
        .to_lowercase()
        .replace(ROUTE_SEPARATOR, "")
}

/// Generates an id from `name` that `is_taken` does not report as used.
pub fn generate_id(name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let base = slugify(name);
    loop {
        let salt = Uuid::new_v4().simple().to_string();
        let salt = &salt[..SALT_LEN];
        let candidate = if base.is_empty() {
            salt.to_string()
        } else {
            format!("{base}-{salt}")
        };
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}
