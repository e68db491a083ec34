//! Server profile configuration
//!
//! A single TOML file holds every named server profile plus the name of the
//! default one. [`ConfigStore`] owns the file; [`ConfigFile`] is its in-memory form.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_config_toml, parse_config_toml_str, to_toml};
pub use paths::{config_path_in, default_config_path};
pub use schema::{AddOutcome, ConfigFile, ServerEntry, ServerProfile, validate_profile};
pub use store::ConfigStore;
