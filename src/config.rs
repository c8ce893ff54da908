use crate::background::Preset;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub owner: OwnerConfig,

    #[serde(default)]
    pub intro: IntroConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub background: BackgroundConfig,
}

/// Who the portfolio belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerConfig {
    /// Host part of the prompt (`guest@<handle>:~$`)
    #[serde(default = "default_handle")]
    pub handle: String,

    /// Profile page opened by the LINKEDIN command
    #[serde(default = "default_profile_url")]
    pub profile_url: String,
}

fn default_handle() -> String {
    "-jake-".to_string()
}

fn default_profile_url() -> String {
    "https://linkedin.com/in/-jake-/".to_string()
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            handle: default_handle(),
            profile_url: default_profile_url(),
        }
    }
}

/// Introduction playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntroConfig {
    /// File path or http(s) URL of the introduction text
    #[serde(default = "default_intro_source")]
    pub source: String,

    /// Delay between typed characters
    #[serde(default = "default_char_delay")]
    pub char_delay_ms: u64,

    /// Pause between the end of the typed text and the command listing
    #[serde(default = "default_commands_pause")]
    pub commands_pause_ms: u64,
}

fn default_intro_source() -> String {
    "introduction.txt".to_string()
}

fn default_char_delay() -> u64 {
    15
}

fn default_commands_pause() -> u64 {
    1000
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            source: default_intro_source(),
            char_delay_ms: default_char_delay(),
            commands_pause_ms: default_commands_pause(),
        }
    }
}

/// Form-relay endpoint used by the MESSAGE command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_relay_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_relay_subject")]
    pub subject: String,

    #[serde(default = "default_relay_timeout")]
    pub timeout_secs: u64,
}

fn default_relay_endpoint() -> String {
    "https://formspree.io/f/meokydqz".to_string()
}

fn default_relay_subject() -> String {
    "New message from your website".to_string()
}

fn default_relay_timeout() -> u64 {
    10
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_relay_endpoint(),
            subject: default_relay_subject(),
            timeout_secs: default_relay_timeout(),
        }
    }
}

/// Terminal window geometry, in cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u16,

    #[serde(default = "default_window_height")]
    pub height: u16,
}

fn default_window_width() -> u16 {
    90
}

fn default_window_height() -> u16 {
    28
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

/// Animated background configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Name of the initial preset (see `Preset::ALL`)
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Switch to the next preset every N seconds; 0 disables cycling
    #[serde(default)]
    pub auto_cycle_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_preset() -> String {
    Preset::Voronoi.name().to_string()
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preset: default_preset(),
            auto_cycle_secs: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: OwnerConfig::default(),
            intro: IntroConfig::default(),
            relay: RelayConfig::default(),
            window: WindowConfig::default(),
            background: BackgroundConfig::default(),
        }
    }
}

impl Config {
    /// The config filename used throughout the application
    pub(crate) const FILENAME: &'static str = "config.json";

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// The preset named by `background.preset`, if it is a known one
    pub fn initial_preset(&self) -> Option<Preset> {
        Preset::from_name(&self.background.preset)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ValidationError(
                "window width and height must be greater than 0".to_string(),
            ));
        }

        if self.intro.char_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "intro.char_delay_ms must be greater than 0".to_string(),
            ));
        }

        if self.initial_preset().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "unknown background preset '{}'",
                self.background.preset
            )));
        }

        if self.relay.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "relay.endpoint cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
