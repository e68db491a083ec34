//! Docker container commands.

use std::fmt;

use crate::api::{Container, DockerApi};
use crate::error::{Error, Result};

/// Options for listing containers
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Include stopped and paused containers
    pub all: bool,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }
}

/// Action on a single container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
    Update,
}

impl ContainerAction {
    /// Past tense, for reports.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::Restart => "restarted",
            Self::Update => "updated",
        }
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Update => "update",
        })
    }
}

/// Result of a container action
#[derive(Debug, Clone)]
pub struct ContainerReport {
    pub action: ContainerAction,
    /// Container state returned by the server after the action
    pub container: Container,
}

/// Docker command orchestrator over any [`DockerApi`].
#[derive(Debug)]
pub struct DockerCommand<A> {
    api: A,
}

impl<A: DockerApi> DockerCommand<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// List containers; only running ones unless `all` is set.
    pub async fn list_containers(&self, options: ListOptions) -> Result<Vec<Container>> {
        let containers = self.api.list_containers().await?;
        if options.all {
            return Ok(containers);
        }
        Ok(containers.into_iter().filter(Container::is_running).collect())
    }

    pub async fn start(&self, name: &str) -> Result<ContainerReport> {
        self.run(ContainerAction::Start, name).await
    }

    pub async fn stop(&self, name: &str) -> Result<ContainerReport> {
        self.run(ContainerAction::Stop, name).await
    }

    pub async fn restart(&self, name: &str) -> Result<ContainerReport> {
        self.run(ContainerAction::Restart, name).await
    }

    pub async fn update(&self, name: &str) -> Result<ContainerReport> {
        self.run(ContainerAction::Update, name).await
    }

    /// Resolve `name` to a container id, then apply `action`.
    async fn run(&self, action: ContainerAction, name: &str) -> Result<ContainerReport> {
        let target = self.find(name).await?;
        tracing::debug!(%action, container = %target.display_name(), id = %target.id, "Running container action");

        let container = match action {
            ContainerAction::Start => self.api.start(&target.id).await?,
            ContainerAction::Stop => self.api.stop(&target.id).await?,
            ContainerAction::Restart => self.api.restart(&target.id).await?,
            ContainerAction::Update => self.api.update(&target.id).await?,
        };

        Ok(ContainerReport { action, container })
    }

    async fn find(&self, name: &str) -> Result<Container> {
        self.api
            .list_containers()
            .await?
            .into_iter()
            .find(|c| c.matches(name))
            .ok_or_else(|| Error::ContainerNotFound(name.to_string()))
    }
}
