//! TOML Configuration File Support
//!
//! Settings for the bistro live in `~/.config/mood-bistro/bistro.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! Every resolved value remembers its [`ConfigSource`].
//!
//! # Example Configuration
//!
//! ```toml
//! [backend]
//! model = "gemini-2.5-flash"
//! api_key_env = "GEMINI_API_KEY"
//! temperature = 0.7
//! timeout_secs = 60
//!
//! [pacing]
//! reply_to_mix_ms = 2000
//! mix_to_serve_ms = 3000
//! serve_to_idle_ms = 5000
//! reveal_ms = 1500
//! greeting_ms = 1000
//!
//! [conversation]
//! history_policy = "plain_only"
//! max_history_turns = 0
//! mix_policy = "always"
//! max_input_chars = 2000
//!
//! [audio]
//! volume = 0.3
//! player = "mpv --no-video --loop=inf --volume={volume} {url}"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `BISTRO_MODEL` | `backend.model` |
//! | `BISTRO_BASE_URL` | `backend.base_url` |
//! | `GEMINI_API_KEY` (or `backend.api_key_env`, then `API_KEY`) | API key |
//! | `BISTRO_HISTORY_POLICY` | `conversation.history_policy` |
//! | `BISTRO_PLAYER` | `audio.player` |

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{DEFAULT_TRACK_URL, DEFAULT_VOLUME};
use crate::conductor::{ConductorConfig, MixPolicy};
use crate::pacing::PacingConfig;
use crate::session::HistoryPolicy;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key unless configured otherwise
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Last-resort API key variable
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Backend section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendToml {
    /// Model identifier
    pub model: Option<String>,

    /// API endpoint
    pub base_url: Option<String>,

    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,

    /// Sampling temperature for replies
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Pacing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingToml {
    /// Reply to mixing, in milliseconds
    pub reply_to_mix_ms: Option<u64>,

    /// Mix result to serving, in milliseconds
    pub mix_to_serve_ms: Option<u64>,

    /// Serving to idle, in milliseconds
    pub serve_to_idle_ms: Option<u64>,

    /// Card reveal to whisper, in milliseconds
    pub reveal_ms: Option<u64>,

    /// Entering to greeting, in milliseconds
    pub greeting_ms: Option<u64>,
}

/// Conversation section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationToml {
    /// `plain_only` or `include_artifacts`
    pub history_policy: Option<String>,

    /// Most recent turns sent as history (0 = unlimited)
    pub max_history_turns: Option<usize>,

    /// `always` or `never`
    pub mix_policy: Option<String>,

    /// Longest accepted submission, in characters
    pub max_input_chars: Option<usize>,
}

/// Audio section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioToml {
    /// Background track
    pub track_url: Option<String>,

    /// Playback volume (0.0-1.0)
    pub volume: Option<f32>,

    /// Player command template (`{url}` and `{volume}` are substituted)
    pub player: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BistroToml {
    /// Backend configuration section
    pub backend: BackendToml,

    /// Pacing configuration section
    pub pacing: PacingToml,

    /// Conversation configuration section
    pub conversation: ConversationToml,

    /// Audio configuration section
    pub audio: AudioToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Resolved backend settings
#[derive(Clone, Debug)]
pub struct BackendSettings {
    /// Model identifier
    pub model: String,
    /// API endpoint
    pub base_url: String,
    /// API key, if one was found
    pub api_key: Option<String>,
    /// Variable the key was looked up in (for error messages)
    pub api_key_env: String,
    /// Sampling temperature for replies
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Resolved audio settings
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSettings {
    /// Background track
    pub track_url: String,
    /// Playback volume (0.0-1.0)
    pub volume: f32,
    /// Player command template; `None` means no music
    pub player: Option<String>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            track_url: DEFAULT_TRACK_URL.to_string(),
            volume: DEFAULT_VOLUME,
            player: None,
        }
    }
}

/// Values given on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Explicit config file
    pub config_path: Option<PathBuf>,
    /// Model identifier
    pub model: Option<String>,
    /// History policy
    pub history_policy: Option<HistoryPolicy>,
    /// Player command template
    pub player: Option<String>,
    /// Disable music entirely
    pub no_music: bool,
}

/// Complete configuration
#[derive(Clone, Debug, Default)]
pub struct BistroConfig {
    /// Backend settings
    pub backend: BackendSettings,
    /// Conversation settings
    pub conductor: ConductorConfig,
    /// Audio settings
    pub audio: AudioSettings,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    sources: BTreeMap<&'static str, ConfigSource>,
}

impl BistroConfig {
    /// Where a value came from, keyed by its TOML name (e.g. `backend.model`)
    #[must_use]
    pub fn source(&self, key: &str) -> ConfigSource {
        self.sources.get(key).copied().unwrap_or(ConfigSource::Default)
    }

    fn record(&mut self, key: &'static str, source: ConfigSource) {
        self.sources.insert(key, source);
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/mood-bistro/bistro.toml` or
/// `~/.config/mood-bistro/bistro.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mood-bistro").join("bistro.toml"))
}

/// Load configuration from all sources with proper priority
///
/// Uses `overrides.config_path` if given, otherwise [`default_config_path`].
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or if a resolved value is out of range. A missing config file is not an
/// error (defaults are used).
pub fn load_config(overrides: &ConfigOverrides) -> Result<BistroConfig, ConfigError> {
    let path = overrides.config_path.clone().or_else(default_config_path);
    load_config_from_path(path, overrides)
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if a resolved value is out of range.
pub fn load_config_from_path(
    path: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<BistroConfig, ConfigError> {
    let mut file = BistroToml::default();
    let mut loaded_from = None;

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            file = toml::from_str(&toml_content)?;
            loaded_from = Some(config_path.clone());

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    let mut config = resolve(&file, overrides, |key| std::env::var(key).ok())?;
    config.config_file_path = loaded_from;
    Ok(config)
}

/// Layer file values, environment and CLI overrides on top of the defaults
///
/// `env` looks up an environment variable; tests pass a map instead of the
/// process environment.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] for unknown policy names or
/// out-of-range numbers.
pub fn resolve(
    file: &BistroToml,
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<BistroConfig, ConfigError> {
    let mut config = BistroConfig::default();
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    apply_toml_config(&mut config, file)?;

    // Environment
    if let Some(model) = env("BISTRO_MODEL") {
        config.backend.model = model;
        config.record("backend.model", ConfigSource::Env);
    }
    if let Some(url) = env("BISTRO_BASE_URL") {
        config.backend.base_url = url;
        config.record("backend.base_url", ConfigSource::Env);
    }
    if let Some(key) = env(&config.backend.api_key_env).or_else(|| env(FALLBACK_API_KEY_ENV)) {
        config.backend.api_key = Some(key);
        config.record("backend.api_key", ConfigSource::Env);
    }
    if let Some(policy) = env("BISTRO_HISTORY_POLICY") {
        config.conductor.history_policy = parse_history_policy(&policy)?;
        config.record("conversation.history_policy", ConfigSource::Env);
    }
    if let Some(player) = env("BISTRO_PLAYER") {
        config.audio.player = Some(player);
        config.record("audio.player", ConfigSource::Env);
    }

    // CLI
    if let Some(model) = &overrides.model {
        config.backend.model.clone_from(model);
        config.record("backend.model", ConfigSource::Cli);
    }
    if let Some(policy) = overrides.history_policy {
        config.conductor.history_policy = policy;
        config.record("conversation.history_policy", ConfigSource::Cli);
    }
    if let Some(player) = &overrides.player {
        config.audio.player = Some(player.clone());
        config.record("audio.player", ConfigSource::Cli);
    }
    if overrides.no_music {
        config.audio.player = None;
        config.record("audio.player", ConfigSource::Cli);
    }

    validate(&config)?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut BistroConfig, toml: &BistroToml) -> Result<(), ConfigError> {
    let file = ConfigSource::File;

    // Backend settings
    if let Some(model) = &toml.backend.model {
        config.backend.model.clone_from(model);
        config.record("backend.model", file);
    }
    if let Some(url) = &toml.backend.base_url {
        config.backend.base_url.clone_from(url);
        config.record("backend.base_url", file);
    }
    if let Some(var) = &toml.backend.api_key_env {
        config.backend.api_key_env.clone_from(var);
        config.record("backend.api_key_env", file);
    }
    if let Some(temperature) = toml.backend.temperature {
        config.backend.temperature = temperature;
        config.record("backend.temperature", file);
    }
    if let Some(secs) = toml.backend.timeout_secs {
        config.backend.timeout = Duration::from_secs(secs);
        config.record("backend.timeout_secs", file);
    }

    // Pacing settings
    let pacing: &mut PacingConfig = &mut config.conductor.pacing;
    for (value, slot) in [
        (toml.pacing.reply_to_mix_ms, &mut pacing.reply_to_mix),
        (toml.pacing.mix_to_serve_ms, &mut pacing.mix_to_serve),
        (toml.pacing.serve_to_idle_ms, &mut pacing.serve_to_idle),
        (toml.pacing.reveal_ms, &mut pacing.reveal),
        (toml.pacing.greeting_ms, &mut pacing.greeting),
    ] {
        if let Some(ms) = value {
            *slot = Duration::from_millis(ms);
        }
    }
    if toml.pacing.reply_to_mix_ms.is_some()
        || toml.pacing.mix_to_serve_ms.is_some()
        || toml.pacing.serve_to_idle_ms.is_some()
        || toml.pacing.reveal_ms.is_some()
        || toml.pacing.greeting_ms.is_some()
    {
        config.record("pacing", file);
    }

    // Conversation settings
    if let Some(policy) = &toml.conversation.history_policy {
        config.conductor.history_policy = parse_history_policy(policy)?;
        config.record("conversation.history_policy", file);
    }
    if let Some(turns) = toml.conversation.max_history_turns {
        config.conductor.max_history_turns = turns;
        config.record("conversation.max_history_turns", file);
    }
    if let Some(policy) = &toml.conversation.mix_policy {
        config.conductor.mix_policy = policy
            .parse::<MixPolicy>()
            .map_err(ConfigError::ValidationError)?;
        config.record("conversation.mix_policy", file);
    }
    if let Some(chars) = toml.conversation.max_input_chars {
        config.conductor.max_input_chars = chars;
        config.record("conversation.max_input_chars", file);
    }

    // Audio settings
    if let Some(url) = &toml.audio.track_url {
        config.audio.track_url.clone_from(url);
        config.record("audio.track_url", file);
    }
    if let Some(volume) = toml.audio.volume {
        config.audio.volume = volume;
        config.record("audio.volume", file);
    }
    if let Some(player) = &toml.audio.player {
        config.audio.player = Some(player.clone());
        config.record("audio.player", file);
    }

    Ok(())
}

fn parse_history_policy(value: &str) -> Result<HistoryPolicy, ConfigError> {
    value.parse().map_err(ConfigError::ValidationError)
}

fn validate(config: &BistroConfig) -> Result<(), ConfigError> {
    let temperature = config.backend.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ConfigError::ValidationError(format!(
            "backend.temperature must be between 0.0 and 2.0 (got {temperature})"
        )));
    }

    let volume = config.audio.volume;
    if !(0.0..=1.0).contains(&volume) {
        return Err(ConfigError::ValidationError(format!(
            "audio.volume must be between 0.0 and 1.0 (got {volume})"
        )));
    }

    if config.conductor.max_input_chars == 0 {
        return Err(ConfigError::ValidationError(
            "conversation.max_input_chars must be at least 1".to_string(),
        ));
    }

    if config.backend.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "backend.model must not be empty".to_string(),
        ));
    }

    Ok(())
}
