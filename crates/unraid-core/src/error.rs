//! Error taxonomy shared by the config store, resolution engine and API client.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The config file exists but could not be read or written.
    #[error("Config file I/O error at {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("Failed to parse config file {}:\n{message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The platform config directory could not be determined.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// A profile named by a config command does not exist.
    #[error("Server '{0}' not found in configuration")]
    NotFound(String),

    #[error("Invalid server profile: {0}")]
    InvalidProfile(String),

    /// A server selected via `--server` or `UNRAID_SERVER` does not exist.
    #[error(
        "Unknown server '{0}'. Use 'unraid config list' to see configured servers."
    )]
    UnknownServer(String),

    #[error(
        "Missing {missing}. Use 'unraid config add <name>' to add a server, \
         or set UNRAID_URL and UNRAID_API_KEY environment variables."
    )]
    MissingCredentials { missing: String },

    #[error("Invalid timeout '{value}' from {origin}: expected a positive number of seconds")]
    InvalidTimeout { value: String, origin: String },

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status or GraphQL errors.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Container '{0}' not found")]
    ContainerNotFound(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }
}
