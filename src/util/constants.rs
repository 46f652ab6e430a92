// LuckyDraw - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LuckyDraw";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LuckyDraw";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Draw timing
// =============================================================================

/// Number of suspense ticks shown before the winner is revealed.
pub const DEFAULT_TICK_COUNT: u32 = 20;

/// Minimum configurable tick count. At least one tick keeps the animation
/// phase observable.
pub const MIN_TICK_COUNT: u32 = 1;

/// Maximum configurable tick count.
pub const MAX_TICK_COUNT: u32 = 200;

/// Delay before each suspense tick (ms).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Maximum configurable tick interval (ms).
pub const MAX_TICK_INTERVAL_MS: u64 = 5_000;

/// Pause between the last tick and the final reveal (ms).
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 500;

/// Maximum configurable reveal delay (ms).
pub const MAX_REVEAL_DELAY_MS: u64 = 10_000;

/// How long the celebration flag stays raised after a reveal (ms).
pub const DEFAULT_CELEBRATION_MS: u64 = 3_000;

/// Maximum configurable celebration duration (ms).
pub const MAX_CELEBRATION_MS: u64 = 60_000;

/// How often the draw timer thread checks its cancel flag while sleeping (ms).
/// Long delays are sliced so a stopped timer exits promptly.
pub const DRAW_CANCEL_CHECK_INTERVAL_MS: u64 = 25;

/// Frame interval used by the CLI when polling the draw timer (ms).
pub const CLI_FRAME_INTERVAL_MS: u64 = 16;

// =============================================================================
// Import limits
// =============================================================================

/// Default maximum size of an uploaded import file in bytes.
pub const DEFAULT_MAX_IMPORT_FILE_BYTES: u64 = 1024 * 1024; // 1 MiB

/// Minimum configurable import file cap.
pub const MIN_MAX_IMPORT_FILE_BYTES: u64 = 1024; // 1 KiB

/// Hard upper bound on the import file cap.
pub const ABSOLUTE_MAX_IMPORT_FILE_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

/// Field separators accepted in name-and-contact import lines.
pub const IMPORT_FIELD_SEPARATORS: [char; 2] = [',', '\t'];

// =============================================================================
// Display defaults
// =============================================================================

/// Number of history entries shown by default.
pub const DEFAULT_HISTORY_DISPLAY_LIMIT: usize = 10;

/// Number of import preview rows shown before "... and N more".
pub const DEFAULT_PREVIEW_DISPLAY_LIMIT: usize = 10;

/// Upper bound for either display limit.
pub const MAX_DISPLAY_LIMIT: usize = 1_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
