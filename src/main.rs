// LuckyDraw - main.rs
//
// Command-line front-end. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Feeding files, pasted text, and manual entries into the app state
// 4. Running draws and printing what the engine exposes

use clap::{Parser, ValueEnum};
use luckydraw::app::driver::DrawDriver;
use luckydraw::app::state::AppState;
use luckydraw::core::draw::RngIndexSource;
use luckydraw::core::export;
use luckydraw::core::model::{DrawEvent, ImportFormat, Participant};
use luckydraw::platform::{config, fs};
use luckydraw::util::{self, constants, error::ExportError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// LuckyDraw - pick random winners from a pool of participants.
///
/// Participants come from import files, pasted text, or --add. Each draw
/// shows a run of suspense picks before revealing the winner.
#[derive(Parser, Debug)]
#[command(name = "LuckyDraw", version, about)]
struct Cli {
    /// Import file(s) with one participant per line (.txt / .csv).
    #[arg(short = 'i', long = "import")]
    import: Vec<PathBuf>,

    /// Participant lines given directly (newline separated).
    #[arg(short = 't', long = "text")]
    text: Option<String>,

    /// Line format for imports (defaults to the config value).
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<FormatArg>,

    /// Add one participant as NAME or NAME,EMAIL.
    #[arg(short = 'a', long = "add")]
    add: Vec<String>,

    /// Number of draws to run.
    #[arg(short = 'n', long = "draws", default_value_t = 1)]
    draws: u32,

    /// Seed for reproducible draws.
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Skip all suspense delays.
    #[arg(long = "fast")]
    fast: bool,

    /// Write the full draw history to this file.
    #[arg(short = 'o', long = "export-history")]
    export_history: Option<PathBuf>,

    /// History export format.
    #[arg(long = "export-format", value_enum, default_value_t = ExportFormat::Csv)]
    export_format: ExportFormat,

    /// Alternative config.toml location.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// One name per line.
    Names,
    /// name,email or name<TAB>email per line.
    NameEmail,
}

impl From<FormatArg> for ImportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Names => ImportFormat::NamesOnly,
            FormatArg::NameEmail => ImportFormat::NameAndContact,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so [logging] level can apply.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config::PlatformPaths::resolve().config_file());
    let (mut app_config, config_warnings) = config::load_config(&config_path);

    util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LuckyDraw starting"
    );

    if cli.fast {
        app_config.draw = app_config.draw.instant();
    }
    let max_import_bytes = app_config.max_import_file_bytes;

    let state = match cli.seed {
        Some(seed) => {
            AppState::with_index_source(app_config, Box::new(RngIndexSource::seeded(seed)))
        }
        None => AppState::new(app_config),
    };
    let mut driver = DrawDriver::new(state);

    if let Some(format) = cli.format {
        driver.state_mut().set_import_format(format.into());
    }

    for path in &cli.import {
        match fs::read_import_file(path, max_import_bytes) {
            Ok(text) => import_text(&mut driver, &text, &path.display().to_string()),
            Err(e) => {
                tracing::error!(error = %e, "Import failed");
                eprintln!("Error: {e}");
            }
        }
    }
    if let Some(ref text) = cli.text {
        import_text(&mut driver, text, "--text");
    }

    for entry in &cli.add {
        let (name, email) = match entry.split_once(',') {
            Some((name, email)) => (name, Some(email)),
            None => (entry.as_str(), None),
        };
        if driver.state_mut().add_participant(name, email).is_none() {
            eprintln!("Skipping --add '{entry}': name is blank");
        }
    }

    let participants = driver.state().participants();
    println!("Participants ({}):", participants.len());
    for (idx, participant) in participants.iter().enumerate() {
        println!("  {:>3}. {}", idx + 1, describe(participant));
    }

    if driver.state().participants().is_empty() {
        println!("No participants; nothing to draw.");
        std::process::exit(0);
    }

    let frame = Duration::from_millis(constants::CLI_FRAME_INTERVAL_MS);
    for round in 1..=cli.draws {
        println!();
        println!("Draw {round} of {}", cli.draws);
        let mut stdout = std::io::stdout();
        driver.run_draw(frame, |event, _| match event {
            DrawEvent::Highlighted { participant, .. } => {
                let _ = write!(stdout, "\r  ... {:<40}", participant.name);
                let _ = stdout.flush();
            }
            DrawEvent::Revealed(winner) => {
                let _ = writeln!(stdout, "\r  WINNER: {:<40}", describe(&winner.participant));
                let _ = writeln!(
                    stdout,
                    "  Won on {}",
                    winner.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
                );
            }
            DrawEvent::CelebrationEnded => {}
        });
    }

    let state = driver.state();
    let stats = state.stats();
    println!();
    println!(
        "Participants: {}  Draws: {}  Win chance: {}%",
        stats.participants, stats.total_draws, stats.win_chance_percent
    );
    println!("Recent winners:");
    for (idx, winner) in state.recent_winners().enumerate() {
        println!(
            "  {:>3}. {} ({})",
            idx + 1,
            winner.participant.name,
            winner.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        );
    }

    if let Some(ref path) = cli.export_history {
        match export_history(state, path, cli.export_format) {
            Ok(count) => println!("Exported {count} winners to {}", path.display()),
            Err(e) => {
                tracing::error!(error = %e, "History export failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Run text through the import preview and accept it.
fn import_text(driver: &mut DrawDriver, text: &str, source: &str) {
    let state = driver.state_mut();
    state.submit_import_text(text);
    let (shown, hidden) = state.import_preview_page();
    println!(
        "Import from {source} ({}): {} candidates",
        state.import_format(),
        state.import_preview_len()
    );
    for participant in shown {
        println!("    {}", describe(participant));
    }
    if hidden > 0 {
        println!("    ... and {hidden} more");
    }
    let outcome = state.accept_import();
    println!(
        "  imported {}, skipped {} already registered",
        outcome.accepted, outcome.excluded
    );
}

fn describe(participant: &Participant) -> String {
    match &participant.email {
        Some(email) => format!("{} <{email}>", participant.name),
        None => participant.name.clone(),
    }
}

fn export_history(
    state: &AppState,
    path: &Path,
    format: ExportFormat,
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let writer = std::io::BufWriter::new(file);
    match format {
        ExportFormat::Csv => export::export_csv(state.history().iter(), writer, path),
        ExportFormat::Json => export::export_json(state.history().iter(), writer, path),
    }
}
