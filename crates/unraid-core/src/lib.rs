//! Unraid Core Library
//!
//! Provides server profile storage, settings resolution and the Unraid API
//! adapter used by the `unraid` command-line client.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod resolve;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigFile, ConfigStore, ServerEntry, ServerProfile};

    // Resolution
    pub use crate::resolve::{CliOverrides, EffectiveSettings, EnvOverrides, resolve};

    // API
    pub use crate::api::{Container, ContainerState, DockerApi, UnraidClient};

    // Commands
    pub use crate::commands::{ConfigCommand, ContainerAction, DockerCommand};

    pub use crate::error::{Error, Result};
}
