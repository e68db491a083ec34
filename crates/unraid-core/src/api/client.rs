//! GraphQL-over-HTTP client for the Unraid API.

use std::error::Error as StdError;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use super::DockerApi;
use super::container::Container;
use super::graphql::{self, ContainerMutationData, ListContainersData};
use crate::error::{Error, Result};
use crate::resolve::EffectiveSettings;

const USER_AGENT: &str = concat!("unraid-cli/", env!("CARGO_PKG_VERSION"));

/// Authenticated client bound to one server.
#[derive(Debug, Clone)]
pub struct UnraidClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    timeout: Duration,
}

impl UnraidClient {
    pub fn new(settings: &EffectiveSettings) -> Result<Self> {
        Self::with_timeout(&settings.url, &settings.api_key, settings.timeout)
    }

    pub fn with_timeout(url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let endpoint = graphql_endpoint(url)?;

        // Unraid servers commonly serve self-signed certificates.
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one GraphQL document and decode its `data`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        tracing::debug!(endpoint = %self.endpoint, "Sending GraphQL request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-api-key", &self.api_key)
            .json(&graphql::Request { query, variables })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        decode_response(status, &body)
    }

    async fn mutate(&self, operation: &str, field: &str, id: &str) -> Result<Container> {
        let query = graphql::container_mutation(operation, field);
        let data: ContainerMutationData = self.execute(&query, json!({ "id": id })).await?;
        data.into_container().ok_or_else(|| Error::Api {
            status: StatusCode::OK.as_u16(),
            message: format!("{field} returned no container"),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            Error::Network(describe(&err))
        }
    }
}

impl DockerApi for UnraidClient {
    async fn list_containers(&self) -> Result<Vec<Container>> {
        let data: ListContainersData = self
            .execute(&graphql::list_containers_query(), json!({}))
            .await?;
        Ok(data.docker.containers)
    }

    async fn start(&self, id: &str) -> Result<Container> {
        self.mutate("StartContainer", "start", id).await
    }

    async fn stop(&self, id: &str) -> Result<Container> {
        self.mutate("StopContainer", "stop", id).await
    }

    async fn update(&self, id: &str) -> Result<Container> {
        self.mutate("UpdateContainer", "updateContainer", id).await
    }
}

/// The GraphQL endpoint for a configured server URL. A bare host gets `/graphql`.
pub fn graphql_endpoint(url: &str) -> Result<Url> {
    let mut endpoint = Url::parse(url).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(Error::InvalidUrl {
            url: url.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }

    if endpoint.path().is_empty() || endpoint.path() == "/" {
        endpoint.set_path("/graphql");
    }
    Ok(endpoint)
}

/// Map an HTTP status and body to decoded `data` or an API error.
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        let message = graphql::error_messages(body)
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    let response: graphql::Response<T> =
        serde_json::from_str(body).map_err(|e| Error::Api {
            status: status.as_u16(),
            message: format!("Failed to parse GraphQL response: {e}"),
        })?;

    if let Some(message) = graphql::join_errors(&response.errors) {
        return Err(Error::Api {
            status: status.as_u16(),
            message: format!("GraphQL errors: {message}"),
        });
    }

    response.data.ok_or_else(|| Error::Api {
        status: status.as_u16(),
        message: "No data returned from GraphQL query".to_string(),
    })
}

/// reqwest errors hide the interesting part in their source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = StdError::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = StdError::source(inner);
    }
    message
}
