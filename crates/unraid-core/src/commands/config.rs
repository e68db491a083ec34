//! Server profile commands.
//!
//! Each operation loads config.toml, applies one change and saves it back.

use crate::config::{ConfigFile, ConfigStore, ServerProfile, validate_profile};
use crate::error::Result;

/// Options for adding a server profile
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Profile name (key under `[servers]`)
    pub name: String,
    pub url: String,
    pub api_key: String,
}

impl AddOptions {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Result of `config add`
#[derive(Debug, Clone)]
pub struct AddReport {
    pub name: String,
    /// An existing profile with this name was overwritten
    pub replaced: bool,
    /// The profile is now the default server
    pub became_default: bool,
    pub warnings: Vec<String>,
}

/// Result of `config remove`
#[derive(Debug, Clone)]
pub struct RemoveReport {
    pub name: String,
    /// The removed profile was the default
    pub was_default: bool,
    /// Default server after removal
    pub new_default: Option<String>,
}

/// Result of `config list`
#[derive(Debug, Clone)]
pub struct ListReport {
    pub default: Option<String>,
    pub profiles: Vec<ServerProfile>,
}

impl ListReport {
    pub fn is_default(&self, profile: &ServerProfile) -> bool {
        self.default.as_deref() == Some(profile.name.as_str())
    }
}

/// Profile command orchestrator
#[derive(Debug, Clone)]
pub struct ConfigCommand {
    store: ConfigStore,
}

impl ConfigCommand {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Add or overwrite a server profile.
    pub fn add(&self, options: &AddOptions) -> Result<AddReport> {
        validate_profile(&options.name, &options.url, &options.api_key)?;

        let mut config = self.store.load()?;
        let outcome = config.add_server(&options.name, &options.url, &options.api_key);
        self.store.save(&config)?;

        let mut warnings = Vec::new();
        if outcome.replaced {
            tracing::warn!(server = %options.name, "Overwrote existing server profile");
            warnings.push(format!(
                "Server '{}' already existed and was overwritten",
                options.name
            ));
        }

        Ok(AddReport {
            name: options.name.clone(),
            replaced: outcome.replaced,
            became_default: outcome.became_default,
            warnings,
        })
    }

    /// Remove a server profile.
    pub fn remove(&self, name: &str) -> Result<RemoveReport> {
        let mut config = self.store.load()?;
        let was_default = config.is_default(name);
        let new_default = config.remove_server(name)?;
        self.store.save(&config)?;

        Ok(RemoveReport {
            name: name.to_string(),
            was_default,
            new_default,
        })
    }

    /// Make an existing profile the default.
    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut config = self.store.load()?;
        config.set_default(name)?;
        self.store.save(&config)
    }

    /// All profiles in name order.
    pub fn list(&self) -> Result<ListReport> {
        let config = self.store.load()?;
        Ok(ListReport {
            profiles: config.profiles().collect(),
            default: config.default,
        })
    }

    /// The current config, for resolution.
    pub fn load(&self) -> Result<ConfigFile> {
        self.store.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn setup_test_env() -> (TempDir, ConfigCommand) {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("unraid").join("config.toml"));
        (temp, ConfigCommand::new(store))
    }

    #[test]
    fn test_list_empty_returns_no_profiles() {
        let (_temp, cmd) = setup_test_env();

        let report = cmd.list().unwrap();

        assert!(report.profiles.is_empty());
        assert!(report.default.is_none());
    }

    #[test]
    fn test_add_then_list_shows_single_entry() {
        let (_temp, cmd) = setup_test_env();

        cmd.add(&AddOptions::new("tower", "https://192.168.1.100", "key-1"))
            .unwrap();
        let report = cmd.list().unwrap();

        assert_eq!(report.profiles.len(), 1);
        let profile = &report.profiles[0];
        assert_eq!(profile.name, "tower");
        assert_eq!(profile.url, "https://192.168.1.100");
        assert_eq!(profile.api_key, "key-1");
        assert!(report.is_default(profile));
    }

    #[test]
    fn test_add_same_name_twice_last_write_wins_with_warning() {
        let (_temp, cmd) = setup_test_env();

        let first = cmd
            .add(&AddOptions::new("tower", "https://old.local", "old"))
            .unwrap();
        let second = cmd
            .add(&AddOptions::new("tower", "https://new.local", "new"))
            .unwrap();

        assert!(!first.replaced);
        assert!(first.warnings.is_empty());
        assert!(second.replaced);
        assert!(!second.became_default);
        assert_eq!(second.warnings.len(), 1);

        let report = cmd.list().unwrap();
        assert_eq!(report.profiles.len(), 1);
        assert_eq!(report.profiles[0].url, "https://new.local");
        assert_eq!(report.profiles[0].api_key, "new");
        assert_eq!(report.default.as_deref(), Some("tower"));
    }

    #[test]
    fn test_add_invalid_profile_writes_nothing() {
        let (_temp, cmd) = setup_test_env();

        let err = cmd
            .add(&AddOptions::new("tower", "not-a-url", "key"))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidProfile(_)));
        assert!(!cmd.store().config_path().exists());
    }

    #[test]
    fn test_remove_unknown_is_not_found() {
        let (_temp, cmd) = setup_test_env();
        cmd.add(&AddOptions::new("tower", "https://tower.local", "key"))
            .unwrap();

        let err = cmd.remove("backup").unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_remove_default_reports_promotion() {
        let (_temp, cmd) = setup_test_env();
        cmd.add(&AddOptions::new("tower", "https://tower.local", "key"))
            .unwrap();
        cmd.add(&AddOptions::new("backup", "https://backup.local", "key"))
            .unwrap();

        let report = cmd.remove("tower").unwrap();

        assert!(report.was_default);
        assert_eq!(report.new_default.as_deref(), Some("backup"));
        assert_eq!(cmd.list().unwrap().default.as_deref(), Some("backup"));
    }

    #[test]
    fn test_set_default_persists() {
        let (_temp, cmd) = setup_test_env();
        cmd.add(&AddOptions::new("tower", "https://tower.local", "key"))
            .unwrap();
        cmd.add(&AddOptions::new("backup", "https://backup.local", "key"))
            .unwrap();

        cmd.set_default("backup").unwrap();

        assert_eq!(cmd.load().unwrap().default.as_deref(), Some("backup"));
        assert!(matches!(
            cmd.set_default("missing").unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
