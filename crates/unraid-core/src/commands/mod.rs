//! High-level commands for unraid operations.
//!
//! These are called by the CLI frontend; each returns a report for rendering.

pub mod config;
pub mod docker;

pub use config::{AddOptions, AddReport, ConfigCommand, ListReport, RemoveReport};
pub use docker::{ContainerAction, ContainerReport, DockerCommand, ListOptions};
