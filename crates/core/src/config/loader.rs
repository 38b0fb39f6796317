//! Config path resolution
//!
//! Handles resolving paths for configuration files based on the host's location.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Directory name created next to the host executable
const BASE_DIR_NAME: &str = "zzrust";

/// Returns the zzrust base directory next to the host executable.
///
/// The library is injected into the client, so `current_exe` is the client:
/// `<client dir>/WoW.exe` → `<client dir>/zzrust/`
pub fn zzrust_base_dir() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;

    exe.parent()
        .map(|dir| dir.join(BASE_DIR_NAME))
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the base configs directory.
///
/// Path: `<client dir>/zzrust/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(zzrust_base_dir()?.join("configs"))
}

/// Returns the path for a plugin's config file.
///
/// Path: `<client dir>/zzrust/configs/plugins/{plugin_name}/{plugin_name}.toml`
pub fn plugin_config_path(plugin_name: &str) -> ConfigResult<PathBuf> {
    let base = configs_dir()?;
    Ok(base
        .join("plugins")
        .join(plugin_name)
        .join(format!("{}.toml", plugin_name)))
}

/// Returns the core config path.
///
/// Path: `<client dir>/zzrust/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("core.toml"))
}

/// Returns the default gamedata (offsets) path.
///
/// Path: `<client dir>/zzrust/gamedata/offsets.json`
pub fn gamedata_path() -> ConfigResult<PathBuf> {
    Ok(zzrust_base_dir()?.join("gamedata").join("offsets.json"))
}
