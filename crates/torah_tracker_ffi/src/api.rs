//! FFI use-case API for the UI shell.
//!
//! # Responsibility
//! - Expose screen queries and tracker commands to Dart via FRB.
//! - Own the per-process tracker session backed by SQLite.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in response envelopes, never thrown.
//! - One session (one in-memory document) per process.

use crate::route::Route;
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use torah_tracker_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    unit_count, CategoryCard, Commit, LabelConventions, SqliteGateway, StoreResult, TrackCard,
    TrackerService,
};

const DB_FILE_NAME: &str = "torah_tracker.sqlite3";
const DB_PATH_ENV: &str = "TORAH_TRACKER_DB_PATH";
const LABELS_PATH_ENV: &str = "TORAH_TRACKER_LABELS_PATH";

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<TrackerService<SqliteGateway>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Category card data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    pub color: String,
    pub completed: u64,
    pub total: u64,
    pub percent: u32,
    pub ratio: String,
}

/// Track card data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackItem {
    pub id: String,
    pub title: String,
    pub completed: u64,
    pub total: u64,
    pub percent: u32,
    pub ratio: String,
}

/// One unit row on the track screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitItem {
    /// Zero-based index to pass back to `toggle_unit`.
    pub index: u32,
    pub label: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeResponse {
    pub ok: bool,
    pub message: String,
    pub categories: Vec<CategoryItem>,
    pub overall_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResponse {
    pub ok: bool,
    pub message: String,
    pub category: Option<CategoryItem>,
    pub tracks: Vec<TrackItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackResponse {
    pub ok: bool,
    pub message: String,
    pub title: String,
    pub color: String,
    pub units: Vec<UnitItem>,
    pub completed: u64,
    pub total: u64,
    pub percent: u32,
    /// Footer caption, e.g. `הושלמו 3 מתוך 64`.
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageTrackItem {
    pub id: String,
    pub title: String,
    pub units: u32,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageCategoryItem {
    pub id: String,
    pub name: String,
    pub color: String,
    pub tracks: Vec<ManageTrackItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageResponse {
    pub ok: bool,
    pub message: String,
    pub categories: Vec<ManageCategoryItem>,
}

/// Generic command response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the command was applied.
    pub ok: bool,
    /// Id created by the command, if any.
    pub id: Option<String>,
    pub message: String,
    /// Set when the command applied but could not be saved.
    pub warning: Option<String>,
}

impl ActionResponse {
    fn applied<T>(message: impl Into<String>, id: Option<String>, commit: &Commit<T>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
            warning: commit.warning().map(str::to_string),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
            warning: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    pub json: String,
    pub message: String,
}

/// Resolved screen for a location fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResponse {
    /// `home|category|track|manage`.
    pub screen: String,
    pub category_id: Option<String>,
    pub track_id: Option<String>,
    /// Canonical fragment for the resolved screen.
    pub fragment: String,
}

/// Resolves a location fragment, falling back to the nearest existing screen.
#[flutter_rust_bridge::frb(sync)]
pub fn resolve_route(fragment: String) -> RouteResponse {
    let parsed = Route::parse(&fragment);
    let route = with_service(|service| parsed.resolve(&*service)).unwrap_or(Route::Home);
    let (category_id, track_id) = match &route {
        Route::Category { category_id } => (Some(category_id.clone()), None),
        Route::Track {
            category_id,
            track_id,
        } => (Some(category_id.clone()), Some(track_id.clone())),
        Route::Home | Route::Manage => (None, None),
    };
    RouteResponse {
        screen: route.screen().to_string(),
        category_id,
        track_id,
        fragment: route.to_fragment(),
    }
}

/// Lists categories with aggregated progress.
#[flutter_rust_bridge::frb(sync)]
pub fn home_screen() -> HomeResponse {
    match with_service(|service| service.home()) {
        Ok(home) => HomeResponse {
            ok: true,
            message: String::new(),
            overall_percent: home.overall.percent(),
            categories: home.categories.into_iter().map(to_category_item).collect(),
        },
        Err(err) => HomeResponse {
            ok: false,
            message: format!("home_screen failed: {err}"),
            categories: Vec::new(),
            overall_percent: 0,
        },
    }
}

/// Lists the tracks of one category.
#[flutter_rust_bridge::frb(sync)]
pub fn category_screen(category_id: String) -> CategoryResponse {
    match with_service(|service| service.category_screen(&category_id)) {
        Ok(Some(screen)) => CategoryResponse {
            ok: true,
            message: String::new(),
            category: Some(to_category_item(screen.category)),
            tracks: screen.tracks.into_iter().map(to_track_item).collect(),
        },
        Ok(None) => category_failure(format!("category not found: {category_id}")),
        Err(err) => category_failure(format!("category_screen failed: {err}")),
    }
}

/// Lists unit rows of one track.
#[flutter_rust_bridge::frb(sync)]
pub fn track_screen(category_id: String, track_id: String) -> TrackResponse {
    match with_service(|service| service.track_screen(&category_id, &track_id)) {
        Ok(Some(screen)) => TrackResponse {
            ok: true,
            message: String::new(),
            title: screen.title,
            color: screen.color,
            units: screen
                .units
                .into_iter()
                .map(|row| UnitItem {
                    index: row.index,
                    label: row.label,
                    completed: row.completed,
                })
                .collect(),
            completed: screen.progress.completed,
            total: screen.progress.total,
            percent: screen.percent,
            caption: screen.caption,
        },
        Ok(None) => track_failure(format!("track not found: {category_id}/{track_id}")),
        Err(err) => track_failure(format!("track_screen failed: {err}")),
    }
}

/// Lists the taxonomy for the management screen.
#[flutter_rust_bridge::frb(sync)]
pub fn manage_screen() -> ManageResponse {
    match with_service(|service| service.manage_screen()) {
        Ok(categories) => ManageResponse {
            ok: true,
            message: String::new(),
            categories: categories
                .into_iter()
                .map(|category| ManageCategoryItem {
                    id: category.id,
                    name: category.name,
                    color: category.color,
                    tracks: category
                        .tracks
                        .into_iter()
                        .map(|track| ManageTrackItem {
                            id: track.id,
                            title: track.title,
                            units: track.units,
                            caption: track.caption,
                        })
                        .collect(),
                })
                .collect(),
        },
        Err(err) => ManageResponse {
            ok: false,
            message: format!("manage_screen failed: {err}"),
            categories: Vec::new(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn toggle_unit(category_id: String, track_id: String, index: u32) -> ActionResponse {
    run_command("toggle_unit", |service| {
        let commit = service.toggle_unit(&category_id, &track_id, index)?;
        let message = if commit.value {
            "Unit completed."
        } else {
            "Unit cleared."
        };
        Ok(ActionResponse::applied(message, None, &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn mark_all(category_id: String, track_id: String) -> ActionResponse {
    run_command("mark_all", |service| {
        let commit = service.mark_all(&category_id, &track_id)?;
        Ok(ActionResponse::applied("All units completed.", None, &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn clear_all(category_id: String, track_id: String) -> ActionResponse {
    run_command("clear_all", |service| {
        let commit = service.clear_all(&category_id, &track_id)?;
        Ok(ActionResponse::applied("All units cleared.", None, &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn add_category(name: String, color: String) -> ActionResponse {
    run_command("add_category", |service| {
        let commit = service.add_category(&name, &color)?;
        Ok(ActionResponse::applied(
            "Category created.",
            Some(commit.value.clone()),
            &commit,
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn edit_category(category_id: String, name: String, color: String) -> ActionResponse {
    run_command("edit_category", |service| {
        let commit = service.edit_category(&category_id, &name, &color)?;
        Ok(ActionResponse::applied("Category updated.", None, &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_category(category_id: String) -> ActionResponse {
    run_command("delete_category", |service| {
        let commit = service.delete_category(&category_id)?;
        Ok(ActionResponse::applied("Category deleted.", None, &commit))
    })
}

/// Adds a track; `units` must be a positive integer.
#[flutter_rust_bridge::frb(sync)]
pub fn add_track(category_id: String, title: String, units: i64) -> ActionResponse {
    run_command("add_track", |service| {
        let commit = service.add_track(&category_id, &title, unit_count(units)?)?;
        Ok(ActionResponse::applied(
            "Track created.",
            Some(commit.value.clone()),
            &commit,
        ))
    })
}

/// Retitles and resizes a track; surviving units keep their state.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_track(category_id: String, track_id: String, title: String, units: i64) -> ActionResponse {
    run_command("edit_track", |service| {
        let commit = service.edit_track(&category_id, &track_id, &title, unit_count(units)?)?;
        Ok(ActionResponse::applied("Track updated.", None, &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_track(category_id: String, track_id: String) -> ActionResponse {
    run_command("delete_track", |service| {
        let commit = service.delete_track(&category_id, &track_id)?;
        Ok(ActionResponse::applied("Track deleted.", None, &commit))
    })
}

/// Replaces the whole document with `json`; invalid payloads change nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn import_json(json: String) -> ActionResponse {
    run_command("import_json", |service| {
        let commit = service.import_json(&json)?;
        let message = format!(
            "Imported {} categories and {} tracks.",
            commit.value.categories, commit.value.tracks
        );
        Ok(ActionResponse::applied(message, None, &commit))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn export_json() -> ExportResponse {
    match with_service(|service| service.export_json()) {
        Ok(Ok(json)) => ExportResponse {
            ok: true,
            json,
            message: String::new(),
        },
        Ok(Err(err)) => ExportResponse {
            ok: false,
            json: String::new(),
            message: format!("export_json failed: {err}"),
        },
        Err(err) => ExportResponse {
            ok: false,
            json: String::new(),
            message: format!("export_json failed: {err}"),
        },
    }
}

fn run_command(
    name: &str,
    command: impl FnOnce(&mut TrackerService<SqliteGateway>) -> StoreResult<ActionResponse>,
) -> ActionResponse {
    match with_service(command) {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => ActionResponse::failure(format!("{name} failed: {err}")),
        Err(err) => ActionResponse::failure(format!("{name} failed: {err}")),
    }
}

fn with_service<T>(f: impl FnOnce(&mut TrackerService<SqliteGateway>) -> T) -> Result<T, String> {
    let mut session = SESSION.lock().unwrap_or_else(PoisonError::into_inner);
    if session.is_none() {
        *session = Some(open_session()?);
    }
    session
        .as_mut()
        .map(f)
        .ok_or_else(|| "tracker session unavailable".to_string())
}

fn open_session() -> Result<TrackerService<SqliteGateway>, String> {
    let gateway = SqliteGateway::open(resolve_db_path())
        .map_err(|err| format!("tracker DB open failed: {err}"))?;
    Ok(TrackerService::open(gateway, resolve_labels()))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn resolve_labels() -> LabelConventions {
    let Ok(raw) = std::env::var(LABELS_PATH_ENV) else {
        return LabelConventions::builtin();
    };
    let path = raw.trim();
    if path.is_empty() {
        return LabelConventions::builtin();
    }
    LabelConventions::from_path(path).unwrap_or_else(|err| {
        warn!("event=label_config_load module=ffi status=error error={err}");
        LabelConventions::builtin()
    })
}


fn to_category_item(card: CategoryCard) -> CategoryItem {
    CategoryItem {
        id: card.id,
        name: card.name,
        color: card.color,
        completed: card.progress.completed,
        total: card.progress.total,
        percent: card.percent,
        ratio: card.ratio,
    }
}

fn to_track_item(card: TrackCard) -> TrackItem {
    TrackItem {
        id: card.id,
        title: card.title,
        completed: card.progress.completed,
        total: card.progress.total,
        percent: card.percent,
        ratio: card.ratio,
    }
}

fn category_failure(message: String) -> CategoryResponse {
    CategoryResponse {
        ok: false,
        message,
        category: None,
        tracks: Vec::new(),
    }
}

fn track_failure(message: String) -> TrackResponse {
    TrackResponse {
        ok: false,
        message,
        title: String::new(),
        color: String::new(),
        units: Vec::new(),
        completed: 0,
        total: 0,
        percent: 0,
        caption: String::new(),
    }
}
