//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.pixie/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::clock::DEFAULT_TICK_RATE_HZ;
use crate::core::state::{RetreatPolicy, ViewerSettings};
use crate::core::story::duration_from_secs;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PixieConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlaybackConfig {
    pub tick_rate_hz: Option<u32>,
    pub image_duration_secs: Option<f64>,
    pub retreat_at_start: Option<RetreatPolicy>,
    pub skip_failed_media: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MediaConfig {
    pub http_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HistoryConfig {
    pub enabled: Option<bool>,
    pub max_records: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_IMAGE_DURATION_SECS: f64 = 5.0;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_HISTORY_RECORDS: usize = 200;
const MAX_TICK_RATE_HZ: u32 = 120;

// ============================================================================
// CLI overrides
// ============================================================================

/// Values passed on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub tick_rate_hz: Option<u32>,
    pub image_duration_secs: Option<f64>,
    pub retreat_at_start: Option<RetreatPolicy>,
    pub skip_failed_media: Option<bool>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub tick_rate_hz: u32,
    pub image_duration: Duration,
    pub retreat_policy: RetreatPolicy,
    pub skip_failed_media: bool,
    pub http_timeout: Duration,
    pub history_enabled: bool,
    pub max_history_records: usize,
}

impl ResolvedConfig {
    pub fn viewer_settings(&self) -> ViewerSettings {
        ViewerSettings {
            tick_rate_hz: self.tick_rate_hz,
            retreat_policy: self.retreat_policy,
            skip_failed_media: self.skip_failed_media,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.pixie`.
pub fn pixie_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pixie"))
}

/// Returns the path to `~/.pixie/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    pixie_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.pixie/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PixieConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PixieConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PixieConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<PixieConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(PixieConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PixieConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Pixie Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [playback]
# tick_rate_hz = 10                  # progress updates per second
# image_duration_secs = 5.0          # also used for videos without a duration
# retreat_at_start = "stay"          # "stay" or "exit"
# skip_failed_media = true           # skip items whose media can't be found

# [media]
# http_timeout_secs = 10

# [history]
# enabled = true
# max_records = 200                 # 0 disables history
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Reads an env var and parses it, warning (and ignoring it) when malformed.
fn env_parsed<T>(name: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        warn!("Ignoring invalid value for {}: {:?}", name, raw);
    }
    parsed
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PixieConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Tick rate: CLI → env → config → default, clamped to 1..=120
    let tick_rate_hz = cli
        .tick_rate_hz
        .or_else(|| env_parsed("PIXIE_TICK_RATE", |s| s.trim().parse().ok()))
        .or(config.playback.tick_rate_hz)
        .unwrap_or(DEFAULT_TICK_RATE_HZ)
        .clamp(1, MAX_TICK_RATE_HZ);

    // Image duration: CLI → env → config → default; unusable values fall back
    let image_duration = cli
        .image_duration_secs
        .or_else(|| env_parsed("PIXIE_IMAGE_DURATION", |s| s.trim().parse().ok()))
        .or(config.playback.image_duration_secs)
        .and_then(|secs: f64| {
            let duration = duration_from_secs(secs);
            if duration.is_none() {
                warn!("Image duration must be a positive number of seconds, got {}", secs);
            }
            duration
        })
        .unwrap_or(Duration::from_secs_f64(DEFAULT_IMAGE_DURATION_SECS));

    let retreat_policy = cli
        .retreat_at_start
        .or_else(|| env_parsed("PIXIE_RETREAT_AT_START", RetreatPolicy::parse))
        .or(config.playback.retreat_at_start)
        .unwrap_or_default();

    let skip_failed_media = cli
        .skip_failed_media
        .or_else(|| env_parsed("PIXIE_SKIP_FAILED_MEDIA", parse_bool))
        .or(config.playback.skip_failed_media)
        .unwrap_or(true);

    // HTTP timeout: env → config → default; zero would fail every request
    let http_timeout_secs = env_parsed("PIXIE_HTTP_TIMEOUT", |s| s.trim().parse().ok())
        .or(config.media.http_timeout_secs)
        .filter(|secs: &u64| {
            if *secs == 0 {
                warn!("HTTP timeout must be at least 1 second, using default");
            }
            *secs > 0
        })
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

    // A cap of zero records means nothing is kept, so treat it as disabled
    let max_history_records = config
        .history
        .max_records
        .unwrap_or(DEFAULT_MAX_HISTORY_RECORDS);
    let history_enabled = config.history.enabled.unwrap_or(true) && max_history_records > 0;

    ResolvedConfig {
        tick_rate_hz,
        image_duration,
        retreat_policy,
        skip_failed_media,
        http_timeout: Duration::from_secs(http_timeout_secs),
        history_enabled,
        max_history_records,
    }
}
