//! Configuration system for zzrust
//!
//! This module provides a trait-based configuration system that supports:
//! - Type-safe config structs via serde
//! - TOML file format
//! - Auto-generation of default configs
//! - Manual reload capability
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use zzrust_core::PluginConfig;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! pub struct GrinderConfig {
//!     pub max_level: i32,
//!     pub rest_below_health: i32,
//! }
//!
//! impl PluginConfig for GrinderConfig {
//!     const PLUGIN_NAME: &'static str = "grinder";
//! }
//!
//! let config = GrinderConfig::load().unwrap_or_default();
//! ```

mod loader;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use loader::{configs_dir, core_config_path, gamedata_path, plugin_config_path, zzrust_base_dir};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory from the host location
    #[error("Config directory not available - could not resolve host base path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read a TOML config from `path`, writing `T::default()` there if missing
pub fn load_or_create<T>(path: &Path) -> ConfigResult<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: T = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    } else {
        let default = T::default();
        save_to(&default, path)?;
        tracing::info!("Created default config at {:?}", path);
        Ok(default)
    }
}

/// Write a config as pretty TOML, creating parent directories
pub fn save_to<T: Serialize>(config: &T, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::debug!("Saved config to {:?}", path);
    Ok(())
}

/// Trait for add-on configuration types.
///
/// Configs are stored at:
/// `<client dir>/zzrust/configs/plugins/{PLUGIN_NAME}/{PLUGIN_NAME}.toml`
pub trait PluginConfig: Default + Serialize + DeserializeOwned + Send + Sync {
    /// The plugin name used for config file path resolution.
    const PLUGIN_NAME: &'static str;

    /// Load config from file, creating default if missing.
    fn load() -> ConfigResult<Self> {
        load_or_create(&plugin_config_path(Self::PLUGIN_NAME)?)
    }

    /// Save config to file.
    fn save(&self) -> ConfigResult<()> {
        save_to(self, &plugin_config_path(Self::PLUGIN_NAME)?)
    }

    /// Reload config from file.
    fn reload(&mut self) -> ConfigResult<()> {
        let path = plugin_config_path(Self::PLUGIN_NAME)?;
        let content = std::fs::read_to_string(&path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded config for {} from {:?}", Self::PLUGIN_NAME, path);
        Ok(())
    }
}

/// Mirror configuration.
///
/// Loaded from `<client dir>/zzrust/configs/core.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Period of the object manager pulse in milliseconds
    pub update_interval_ms: u64,

    /// Minimum time between quest log refreshes in milliseconds
    pub quest_refresh_ms: u64,

    /// Minimum time between spell book refreshes in milliseconds
    pub spell_refresh_ms: u64,

    /// Treat the session as live when attaching to a running client
    ///
    /// No load event fires for a session that was already in the world when
    /// the library was injected.
    pub assume_ready_on_attach: bool,

    /// Offsets file overriding the built-in table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsets_file: Option<PathBuf>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            update_interval_ms: 50,
            quest_refresh_ms: 1000,
            spell_refresh_ms: 5000,
            assume_ready_on_attach: true,
            offsets_file: None,
        }
    }
}

impl MirrorConfig {
    /// Load from the core config path, creating default if missing.
    pub fn load() -> ConfigResult<Self> {
        load_or_create(&core_config_path()?)
    }

    /// Load from an explicit path, creating default if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        load_or_create(path)
    }

    /// Save to the core config path.
    pub fn save(&self) -> ConfigResult<()> {
        save_to(self, &core_config_path()?)
    }

    /// Reload from an explicit path.
    pub fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded core config from {:?}", path);
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn quest_refresh(&self) -> Duration {
        Duration::from_millis(self.quest_refresh_ms)
    }

    pub fn spell_refresh(&self) -> Duration {
        Duration::from_millis(self.spell_refresh_ms)
    }
}
