//! Config store for loading and saving config.toml.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{ConfigFile, parser, paths};
use crate::error::{Error, Result};

/// Owns the on-disk profile file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn from_default_location() -> Result<Self> {
        Ok(Self::new(paths::default_config_path()?))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config file. A missing file is an empty config; any other
    /// read failure is a `ConfigIo` error.
    pub fn load(&self) -> Result<ConfigFile> {
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.config_path.display(), "Config file not found, using empty config");
                return Ok(ConfigFile::new());
            }
            Err(e) => return Err(Error::io(&self.config_path, e)),
        };

        parser::parse_config_toml_str(&content).map_err(|message| Error::ConfigParse {
            path: self.config_path.clone(),
            message,
        })
    }

    /// Write the config file atomically: temp file in the same directory,
    /// fsync, then rename over the target. An existing file keeps its
    /// permissions; a new one is created owner-only on unix.
    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let content = parser::to_toml(config)?;

        let dir = match self.config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let permissions = match fs::metadata(&self.config_path) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(Error::io(&self.config_path, e)),
        };

        let tmp_path = self.tmp_path();
        if let Err(err) = write_synced(&tmp_path, content.as_bytes(), permissions) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        if let Err(e) = fs::rename(&tmp_path, &self.config_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::io(&self.config_path, e));
        }

        tracing::debug!(path = %self.config_path.display(), "Saved config");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .config_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| paths::CONFIG_FILE_NAME.to_string());
        self.config_path
            .with_file_name(format!("{}.{}.tmp", file_name, std::process::id()))
    }
}

fn write_synced(path: &Path, bytes: &[u8], permissions: Option<fs::Permissions>) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| Error::io(path, e))?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)
            .map_err(|e| Error::io(path, e))?;
    }
    file.write_all(bytes).map_err(|e| Error::io(path, e))?;
    file.sync_all().map_err(|e| Error::io(path, e))
}
