//! Configuration schema for config.toml
//!
//! ```toml
//! default = "tower"
//!
//! [servers.tower]
//! url = "https://192.168.1.100"
//! api_key = "..."
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of API key characters shown by [`ServerProfile::masked_api_key`].
const API_KEY_VISIBLE_CHARS: usize = 8;

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Name of the server used when none is selected explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Server entries keyed by profile name
    #[serde(default)]
    pub servers: BTreeMap<String, ServerEntry>,
}

/// One `[servers.<name>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub url: String,
    pub api_key: String,
}

/// A named server entry, as produced by [`ConfigFile::profiles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProfile {
    pub name: String,
    pub url: String,
    pub api_key: String,
}

impl ServerProfile {
    /// API key reduced to its first few characters for display.
    pub fn masked_api_key(&self) -> String {
        let visible: String = self.api_key.chars().take(API_KEY_VISIBLE_CHARS).collect();
        format!("{visible}...")
    }
}

/// What [`ConfigFile::add_server`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// An entry with the same name existed and was overwritten
    pub replaced: bool,
    /// The entry was made the default server
    pub became_default: bool,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over all profiles in lexicographic name order.
    pub fn profiles(&self) -> impl Iterator<Item = ServerProfile> + '_ {
        self.servers.iter().map(|(name, entry)| ServerProfile {
            name: name.clone(),
            url: entry.url.clone(),
            api_key: entry.api_key.clone(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&ServerEntry> {
        self.servers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.default.as_deref() == Some(name)
    }

    /// The default entry, if `default` names an existing server.
    pub fn default_server(&self) -> Option<(&str, &ServerEntry)> {
        let name = self.default.as_deref()?;
        self.servers
            .get_key_value(name)
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Insert or overwrite a server entry.
    ///
    /// The entry becomes the default when no usable default is set.
    pub fn add_server(
        &mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> AddOutcome {
        let name = name.into();
        let entry = ServerEntry {
            url: url.into(),
            api_key: api_key.into(),
        };

        let replaced = self.servers.insert(name.clone(), entry).is_some();
        let became_default = self.default_server().is_none();
        if became_default {
            self.default = Some(name);
        }

        AddOutcome {
            replaced,
            became_default,
        }
    }

    /// Remove a server entry.
    ///
    /// Removing the default promotes the first remaining server (by name), or
    /// clears the default when none remain. Returns the default after removal.
    pub fn remove_server(&mut self, name: &str) -> Result<Option<String>> {
        if self.servers.remove(name).is_none() {
            return Err(Error::NotFound(name.to_string()));
        }

        if self.is_default(name) {
            self.default = self.servers.keys().next().cloned();
        }

        Ok(self.default.clone())
    }

    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if !self.servers.contains_key(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        self.default = Some(name.to_string());
        Ok(())
    }

    /// A `default` naming a server that does not exist.
    pub fn dangling_default(&self) -> Option<&str> {
        self.default
            .as_deref()
            .filter(|name| !self.servers.contains_key(*name))
    }
}

/// Check the fields of a profile before it is written.
pub fn validate_profile(name: &str, url: &str, api_key: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidProfile("server name cannot be empty".into()));
    }
    if name.trim() != name {
        return Err(Error::InvalidProfile(format!(
            "server name '{name}' has leading or trailing whitespace"
        )));
    }
    if api_key.trim().is_empty() {
        return Err(Error::InvalidProfile("API key cannot be empty".into()));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| Error::InvalidProfile(format!("invalid URL '{url}': {e}")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::InvalidProfile(format!(
            "URL '{url}' must use http or https"
        )));
    }

    Ok(())
}
