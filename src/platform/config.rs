// LuckyDraw - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::draw::DrawConfig;
use crate::core::model::ImportFormat;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for LuckyDraw configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/luckydraw/ or %APPDATA%\LuckyDraw\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[draw]` section.
    pub draw: DrawSection,
    /// `[import]` section.
    pub import: ImportSection,
    /// `[display]` section.
    pub display: DisplaySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[draw]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DrawSection {
    /// Number of suspense ticks.
    pub tick_count: Option<u32>,
    /// Delay before each tick in ms.
    pub tick_interval_ms: Option<u64>,
    /// Pause before the reveal in ms.
    pub reveal_delay_ms: Option<u64>,
    /// Celebration duration in ms.
    pub celebration_ms: Option<u64>,
}

/// `[import]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// "names" or "name_email".
    pub default_format: Option<String>,
    /// Largest accepted import file in bytes.
    pub max_file_bytes: Option<u64>,
}

/// `[display]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// History rows shown.
    pub history_limit: Option<usize>,
    /// Import preview rows shown.
    pub preview_limit: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Draw --
    pub draw: DrawConfig,

    // -- Import --
    pub default_import_format: ImportFormat,
    pub max_import_file_bytes: u64,

    // -- Display --
    pub history_limit: usize,
    pub preview_limit: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            draw: DrawConfig::default(),
            default_import_format: ImportFormat::default(),
            max_import_file_bytes: constants::DEFAULT_MAX_IMPORT_FILE_BYTES,
            history_limit: constants::DEFAULT_HISTORY_DISPLAY_LIMIT,
            preview_limit: constants::DEFAULT_PREVIEW_DISPLAY_LIMIT,
            log_level: None,
        }
    }
}

/// Read and parse config.toml without validation.
pub fn read_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate config.toml at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with one warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let raw = match read_config_file(config_path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    validate(raw)
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Draw: tick_count --
    if let Some(count) = raw.draw.tick_count {
        if (constants::MIN_TICK_COUNT..=constants::MAX_TICK_COUNT).contains(&count) {
            config.draw.tick_count = count;
        } else {
            warnings.push(format!(
                "[draw] tick_count = {count} is out of range ({}-{}). Using default ({}).",
                constants::MIN_TICK_COUNT,
                constants::MAX_TICK_COUNT,
                constants::DEFAULT_TICK_COUNT,
            ));
        }
    }

    // -- Draw: delays --
    let delays: [(&str, Option<u64>, u64, u64, &mut Duration); 3] = [
        (
            "tick_interval_ms",
            raw.draw.tick_interval_ms,
            constants::MAX_TICK_INTERVAL_MS,
            constants::DEFAULT_TICK_INTERVAL_MS,
            &mut config.draw.tick_interval,
        ),
        (
            "reveal_delay_ms",
            raw.draw.reveal_delay_ms,
            constants::MAX_REVEAL_DELAY_MS,
            constants::DEFAULT_REVEAL_DELAY_MS,
            &mut config.draw.reveal_delay,
        ),
        (
            "celebration_ms",
            raw.draw.celebration_ms,
            constants::MAX_CELEBRATION_MS,
            constants::DEFAULT_CELEBRATION_MS,
            &mut config.draw.celebration,
        ),
    ];
    for (field, value, max, default, target) in delays {
        let Some(ms) = value else { continue };
        if ms <= max {
            *target = Duration::from_millis(ms);
        } else {
            warnings.push(format!(
                "[draw] {field} = {ms} is out of range (0-{max}). Using default ({default}).",
            ));
        }
    }

    // -- Import: default_format --
    if let Some(ref format) = raw.import.default_format {
        match ImportFormat::from_config_str(format) {
            Some(f) => config.default_import_format = f,
            None => warnings.push(format!(
                "[import] default_format = \"{format}\" is not recognised. \
                 Expected \"names\" or \"name_email\". Using default (names).",
            )),
        }
    }

    // -- Import: max_file_bytes --
    if let Some(bytes) = raw.import.max_file_bytes {
        if (constants::MIN_MAX_IMPORT_FILE_BYTES..=constants::ABSOLUTE_MAX_IMPORT_FILE_BYTES)
            .contains(&bytes)
        {
            config.max_import_file_bytes = bytes;
        } else {
            warnings.push(format!(
                "[import] max_file_bytes = {bytes} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_IMPORT_FILE_BYTES,
                constants::ABSOLUTE_MAX_IMPORT_FILE_BYTES,
                constants::DEFAULT_MAX_IMPORT_FILE_BYTES,
            ));
        }
    }

    // -- Display limits --
    if let Some(limit) = raw.display.history_limit {
        if (1..=constants::MAX_DISPLAY_LIMIT).contains(&limit) {
            config.history_limit = limit;
        } else {
            warnings.push(format!(
                "[display] history_limit = {limit} is out of range (1-{}). Using default ({}).",
                constants::MAX_DISPLAY_LIMIT,
                constants::DEFAULT_HISTORY_DISPLAY_LIMIT,
            ));
        }
    }
    if let Some(limit) = raw.display.preview_limit {
        if (1..=constants::MAX_DISPLAY_LIMIT).contains(&limit) {
            config.preview_limit = limit;
        } else {
            warnings.push(format!(
                "[display] preview_limit = {limit} is out of range (1-{}). Using default ({}).",
                constants::MAX_DISPLAY_LIMIT,
                constants::DEFAULT_PREVIEW_DISPLAY_LIMIT,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}
