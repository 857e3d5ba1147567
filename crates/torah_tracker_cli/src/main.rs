//! Command-line front end for the tracker.
//!
//! # Responsibility
//! - Browse progress and run tracker commands against a SQLite file.
//! - Print persistence warnings to stderr without failing the command.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use torah_tracker_core::{
    default_log_level, init_logging, unit_count, Commit, LabelConventions, SqliteGateway,
    StoreError, TrackerService,
};

/// Track Torah study progress from the terminal.
#[derive(Parser, Debug)]
#[command(name = "torah-tracker", version, long_about = None)]
struct Cli {
    /// SQLite file holding the tracker document.
    #[arg(
        long,
        global = true,
        env = "TORAH_TRACKER_DB_PATH",
        default_value = "torah_tracker.sqlite3"
    )]
    db: PathBuf,

    /// JSON file overriding unit label conventions.
    #[arg(long, global = true, env = "TORAH_TRACKER_LABELS_PATH")]
    labels: Option<PathBuf>,

    /// Write rolling logs into this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// List categories with progress.
    Home,
    /// List the tracks of a category.
    Category { category_id: String },
    /// List the units of a track.
    Track {
        category_id: String,
        track_id: String,
    },
    /// Flip one unit (1-based, as printed by `track`).
    Toggle {
        category_id: String,
        track_id: String,
        unit: u32,
    },
    /// Complete every unit of a track.
    MarkAll {
        category_id: String,
        track_id: String,
    },
    /// Clear every unit of a track.
    ClearAll {
        category_id: String,
        track_id: String,
    },
    /// List categories and tracks with their ids.
    Manage,
    AddCategory {
        name: String,
        #[arg(long, default_value = "")]
        color: String,
    },
    EditCategory {
        category_id: String,
        name: String,
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Delete a category and all of its tracks.
    RemoveCategory { category_id: String },
    AddTrack {
        category_id: String,
        title: String,
        #[arg(allow_negative_numbers = true)]
        units: i64,
    },
    /// Retitle and resize a track; surviving units keep their state.
    EditTrack {
        category_id: String,
        track_id: String,
        title: String,
        #[arg(allow_negative_numbers = true)]
        units: i64,
    },
    RemoveTrack {
        category_id: String,
        track_id: String,
    },
    /// Print the document as JSON, or write it to `--output`.
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the whole document with a JSON file.
    Import { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &absolute(log_dir)?.to_string_lossy())?;
    }

    if let Command::Ping = cli.command {
        println!("torah_tracker_core ping={}", torah_tracker_core::ping());
        println!(
            "torah_tracker_core version={}",
            torah_tracker_core::core_version()
        );
        return Ok(());
    }

    let labels = match &cli.labels {
        Some(path) => LabelConventions::from_path(path).map_err(|err| err.to_string())?,
        None => LabelConventions::builtin(),
    };
    let gateway = SqliteGateway::open(&cli.db)
        .map_err(|err| format!("cannot open `{}`: {err}", cli.db.display()))?;
    let mut service = TrackerService::open(gateway, labels);

    execute(&mut service, cli.command).map_err(|err| err.to_string())
}

fn execute(service: &mut TrackerService<SqliteGateway>, command: Command) -> Result<(), CliError> {
    match command {
        Command::Ping => {}
        Command::Home => {
            let home = service.home();
            for card in &home.categories {
                println!(
                    "{}\t{}\t{}\t{}%",
                    card.id, card.name, card.ratio, card.percent
                );
            }
            println!("total\t{}%", home.overall.percent());
        }
        Command::Category { category_id } => {
            let screen = service
                .category_screen(&category_id)
                .ok_or(StoreError::CategoryNotFound(category_id))?;
            println!("{} {}%", screen.category.name, screen.category.percent);
            for card in &screen.tracks {
                println!(
                    "{}\t{}\t{}\t{}%",
                    card.id, card.title, card.ratio, card.percent
                );
            }
        }
        Command::Track {
            category_id,
            track_id,
        } => {
            let screen = service
                .track_screen(&category_id, &track_id)
                .ok_or_else(|| StoreError::TrackNotFound {
                    category_id,
                    track_id,
                })?;
            println!("{} {}%", screen.title, screen.percent);
            for row in &screen.units {
                let mark = if row.completed { "x" } else { " " };
                println!("{:>4} [{mark}] {}", row.index + 1, row.label);
            }
            println!("{}", screen.caption);
        }
        Command::Toggle {
            category_id,
            track_id,
            unit,
        } => {
            let index = unit.checked_sub(1).ok_or(CliError::Usage(
                "unit numbers start at 1".to_string(),
            ))?;
            let commit = service.toggle_unit(&category_id, &track_id, index)?;
            report(&commit);
            let label = service.unit_label(&category_id, index);
            let state = if commit.value { "completed" } else { "cleared" };
            println!("{label} {state}");
        }
        Command::MarkAll {
            category_id,
            track_id,
        } => report(&service.mark_all(&category_id, &track_id)?),
        Command::ClearAll {
            category_id,
            track_id,
        } => report(&service.clear_all(&category_id, &track_id)?),
        Command::Manage => {
            for category in service.manage_screen() {
                println!("{}\t{}\t{}", category.id, category.name, category.color);
                for track in &category.tracks {
                    println!("  {}\t{}", track.id, track.caption);
                }
            }
        }
        Command::AddCategory { name, color } => {
            let commit = service.add_category(&name, &color)?;
            report(&commit);
            println!("{}", commit.value);
        }
        Command::EditCategory {
            category_id,
            name,
            color,
        } => report(&service.edit_category(&category_id, &name, &color)?),
        Command::RemoveCategory { category_id } => {
            report(&service.delete_category(&category_id)?)
        }
        Command::AddTrack {
            category_id,
            title,
            units,
        } => {
            let commit = service.add_track(&category_id, &title, unit_count(units)?)?;
            report(&commit);
            println!("{}", commit.value);
        }
        Command::EditTrack {
            category_id,
            track_id,
            title,
            units,
        } => report(&service.edit_track(
            &category_id,
            &track_id,
            &title,
            unit_count(units)?,
        )?),
        Command::RemoveTrack {
            category_id,
            track_id,
        } => report(&service.delete_track(&category_id, &track_id)?),
        Command::Export { output } => {
            let json = service.export_json()?;
            match output {
                Some(path) => std::fs::write(&path, json).map_err(|err| {
                    CliError::Io(format!("cannot write `{}`: {err}", path.display()))
                })?,
                None => println!("{json}"),
            }
        }
        Command::Import { file } => {
            let raw = std::fs::read_to_string(&file).map_err(|err| {
                CliError::Io(format!("cannot read `{}`: {err}", file.display()))
            })?;
            let commit = service.import_json(&raw)?;
            report(&commit);
            println!(
                "imported {} categories, {} tracks",
                commit.value.categories, commit.value.tracks
            );
        }
    }
    Ok(())
}

#[derive(Debug)]
enum CliError {
    Store(StoreError),
    Usage(String),
    Io(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Usage(message) | Self::Io(message) => write!(f, "{message}"),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

fn report<T>(commit: &Commit<T>) {
    if let Some(warning) = commit.warning() {
        eprintln!("warning: changes not saved: {warning}");
    }
}


fn absolute(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|err| format!("cannot resolve `{}`: {err}", path.display()))
}
