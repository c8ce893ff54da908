//! Runtime configuration I/O operations.
//!
//! System directory detection and layered config loading. The pure config
//! types live in `config.rs`.

use crate::config::{Config, ConfigError};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Manages loading and merging of all configuration layers.
///
/// Resolution order: built-in defaults → user (~/.config/termfolio/config.json)
/// → local ($CWD/.termfolio/config.json)
pub struct ConfigResolver {
    dir_context: DirectoryContext,
    working_dir: PathBuf,
}

impl ConfigResolver {
    pub fn new(dir_context: DirectoryContext, working_dir: PathBuf) -> Self {
        Self {
            dir_context,
            working_dir,
        }
    }

    /// Load all layers and merge them into a resolved Config.
    ///
    /// Layers are deep-merged as JSON objects, so a layer only needs to name
    /// the keys it changes.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let mut merged = serde_json::to_value(Config::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(user) = self.load_layer_from_path(&self.user_config_path())? {
            tracing::debug!("Loaded user config layer");
            merge_json(&mut merged, user);
        }

        if let Some(local) = self.load_layer_from_path(&self.local_config_path())? {
            tracing::debug!("Loaded local config layer");
            merge_json(&mut merged, local);
        }

        let config: Config =
            serde_json::from_value(merged).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the path to user config file.
    pub fn user_config_path(&self) -> PathBuf {
        self.dir_context.config_path()
    }

    /// Get the path to the directory-local config file.
    pub fn local_config_path(&self) -> PathBuf {
        self.working_dir.join(".termfolio").join(Config::FILENAME)
    }

    fn load_layer_from_path(&self, path: &Path) -> Result<Option<Value>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let value: Value = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        if !value.is_object() {
            return Err(ConfigError::ParseError(format!(
                "{}: top level must be a JSON object",
                path.display()
            )));
        }

        Ok(Some(value))
    }
}

/// Recursively merge `overlay` into `base`. Objects merge key by key,
/// anything else in `overlay` replaces the value in `base`.
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl Config {
    /// Load the configuration for `working_dir`, falling back to defaults
    /// (with a warning in the log) when a layer is broken.
    pub fn load_with_layers(dir_context: &DirectoryContext, working_dir: &Path) -> Config {
        let resolver = ConfigResolver::new(dir_context.clone(), working_dir.to_path_buf());
        match resolver.resolve() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load layered config, using defaults: {}", e);
                Config::default()
            }
        }
    }
}

/// Directories used by the application
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// Data directory for persistent state (the local storage file)
    /// e.g., ~/.local/share/termfolio on Linux
    pub data_dir: PathBuf,

    /// Config directory for user configuration
    /// e.g., ~/.config/termfolio on Linux
    pub config_dir: PathBuf,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    /// This should ONLY be called from main()
    pub fn from_system() -> std::io::Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine data directory",
                )
            })?
            .join("termfolio");

        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("termfolio");

        Ok(Self {
            data_dir,
            config_dir,
        })
    }

    /// Create a DirectoryContext for testing with a temp directory
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            data_dir: temp_dir.join("data"),
            config_dir: temp_dir.join("config"),
        }
    }

    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(Config::FILENAME)
    }

    /// Get the local storage file path (persisted key/value pairs)
    pub fn local_storage_path(&self) -> PathBuf {
        self.data_dir.join("local_storage.json")
    }
}
