//! Unraid API adapter.
//!
//! [`DockerApi`] is the boundary the commands depend on; [`UnraidClient`]
//! implements it over GraphQL.

pub mod client;
pub mod container;
pub mod graphql;

pub use client::{UnraidClient, graphql_endpoint};
pub use container::{Container, ContainerState};

use crate::error::Result;

/// Docker operations exposed by an Unraid server.
#[allow(async_fn_in_trait)]
pub trait DockerApi {
    async fn list_containers(&self) -> Result<Vec<Container>>;

    async fn start(&self, id: &str) -> Result<Container>;

    async fn stop(&self, id: &str) -> Result<Container>;

    /// Pull the latest image and recreate the container.
    async fn update(&self, id: &str) -> Result<Container>;

    async fn restart(&self, id: &str) -> Result<Container> {
        self.stop(id).await?;
        self.start(id).await
    }
}
