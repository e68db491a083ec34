//! Config path resolution helpers.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "unraid";

/// File name of the profile store.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Location of config.toml inside a config directory.
pub fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Platform default, e.g. `~/.config/unraid/config.toml` on Linux.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(Error::NoConfigDir)?;
    Ok(config_path_in(&config_dir))
}
