//! Location-fragment routing for the UI shell.
//!
//! # Responsibility
//! - Encode/decode the screen a fragment points at.
//! - Resolve stale ids by falling back to the nearest existing parent screen.
//!
//! Fragments: `#home`, `#category-<id>`, `#track-<category>~<track>`,
//! `#manage`. Anything else is treated as home. Imported ids may contain
//! `~`, so ids are written with `%` as `%25` and `~` as `%7E`.

use torah_tracker_core::{PersistenceGateway, TrackerService, ROUTE_SEPARATOR};

const HOME: &str = "#home";
const MANAGE: &str = "#manage";
const CATEGORY_PREFIX: &str = "#category-";
const TRACK_PREFIX: &str = "#track-";
const ESCAPED_PERCENT: &str = "%25";
const ESCAPED_SEPARATOR: &str = "%7E";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Category {
        category_id: String,
    },
    Track {
        category_id: String,
        track_id: String,
    },
    Manage,
}

impl Route {
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.trim();
        if fragment == MANAGE {
            return Self::Manage;
        }
        if let Some(category_id) = fragment.strip_prefix(CATEGORY_PREFIX) {
            return Self::Category {
                category_id: unescape_id(category_id),
            };
        }
        if let Some(rest) = fragment.strip_prefix(TRACK_PREFIX) {
            let (category_id, track_id) = rest.split_once(ROUTE_SEPARATOR).unwrap_or((rest, ""));
            return Self::Track {
                category_id: unescape_id(category_id),
                track_id: unescape_id(track_id),
            };
        }
        Self::Home
    }

    pub fn to_fragment(&self) -> String {
        match self {
            Self::Home => HOME.to_string(),
            Self::Manage => MANAGE.to_string(),
            Self::Category { category_id } => {
                format!("{CATEGORY_PREFIX}{}", escape_id(category_id))
            }
            Self::Track {
                category_id,
                track_id,
            } => format!(
                "{TRACK_PREFIX}{}{ROUTE_SEPARATOR}{}",
                escape_id(category_id),
                escape_id(track_id)
            ),
        }
    }

    /// Screen name reported to the UI shell.
    pub fn screen(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Category { .. } => "category",
            Self::Track { .. } => "track",
            Self::Manage => "manage",
        }
    }

    /// Replaces routes to missing categories/tracks with their parent screen.
    pub fn resolve<G: PersistenceGateway>(self, service: &TrackerService<G>) -> Self {
        match self {
            Self::Category { ref category_id } if service.store().category(category_id).is_none() => {
                Self::Home
            }
            Self::Track {
                category_id,
                track_id,
            } => {
                if service.store().category(&category_id).is_none() {
                    Self::Home
                } else if service.store().track(&category_id, &track_id).is_none() {
                    Self::Category { category_id }
                } else {
                    Self::Track {
                        category_id,
                        track_id,
                    }
                }
            }
            other => other,
        }
    }
}

fn escape_id(id: &str) -> String {
    id.replace('%', ESCAPED_PERCENT)
        .replace(ROUTE_SEPARATOR, ESCAPED_SEPARATOR)
}

// Unknown `%` sequences are kept literally.
fn unescape_id(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix(ESCAPED_SEPARATOR) {
            out.push(ROUTE_SEPARATOR);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(ESCAPED_PERCENT) {
            out.push('%');
            rest = after;
        } else {
            out.push('%');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::Route;
    use torah_tracker_core::{LabelConventions, MemoryGateway, TrackerService};

    #[test]
    fn parse_known_fragments() {
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("#"), Route::Home);
        assert_eq!(Route::parse("#manage"), Route::Manage);
        assert_eq!(
            Route::parse("#category-gemara"),
            Route::Category {
                category_id: "gemara".to_string()
            }
        );
        assert_eq!(
            Route::parse("#track-gemara~bava-kamma"),
            Route::Track {
                category_id: "gemara".to_string(),
                track_id: "bava-kamma".to_string()
            }
        );
        assert_eq!(Route::parse("#unknown"), Route::Home);
    }

    #[test]
    fn fragments_roundtrip_hyphenated_ids() {
        let route = Route::Track {
            category_id: "rosh-hashanah-set".to_string(),
            track_id: "moed-katan".to_string(),
        };
        assert_eq!(Route::parse(&route.to_fragment()), route);
    }

    #[test]
    fn ids_containing_separator_survive_fragment() {
        let route = Route::Track {
            category_id: "z~b".to_string(),
            track_id: "50%~x".to_string(),
        };
        let fragment = route.to_fragment();
        assert_eq!(fragment, "#track-z%7Eb~50%25%7Ex");
        assert_eq!(Route::parse(&fragment), route);

        let category = Route::Category {
            category_id: "a~".to_string(),
        };
        assert_eq!(Route::parse(&category.to_fragment()), category);
        assert_eq!(
            Route::parse("#category-100%"),
            Route::Category {
                category_id: "100%".to_string()
            }
        );
    }

    #[test]
    fn resolve_falls_back_to_parent_screen() {
        let service = TrackerService::open(MemoryGateway::new(), LabelConventions::builtin());

        let missing_track = Route::parse("#track-gemara~no-such-tractate").resolve(&service);
        assert_eq!(
            missing_track,
            Route::Category {
                category_id: "gemara".to_string()
            }
        );

        let missing_category = Route::parse("#category-nothing").resolve(&service);
        assert_eq!(missing_category, Route::Home);

        let existing = Route::parse("#track-gemara~yoma").resolve(&service);
        assert_eq!(existing.screen(), "track");
    }
}
