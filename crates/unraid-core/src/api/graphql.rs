//! GraphQL documents and response envelope for the Unraid API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::container::Container;

const CONTAINER_FIELDS: &str = "id names image state status autoStart";

pub fn list_containers_query() -> String {
    format!("query ListContainers {{ docker {{ containers {{ {CONTAINER_FIELDS} }} }} }}")
}

/// Mutation on a single container, `field` being `start`, `stop` or `updateContainer`.
pub fn container_mutation(operation: &str, field: &str) -> String {
    format!(
        "mutation {operation}($id: PrefixedID!) {{ docker {{ {field}(id: $id) {{ {CONTAINER_FIELDS} }} }} }}"
    )
}

#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub query: &'a str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct Response<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `errors` field of a body, if it parses as a GraphQL response.
pub fn error_messages(body: &str) -> Option<String> {
    let response: Response<Value> = serde_json::from_str(body).ok()?;
    join_errors(&response.errors)
}

pub fn join_errors(errors: &[GraphQlError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

#[derive(Debug, Deserialize)]
pub struct ListContainersData {
    pub docker: DockerContainers,
}

#[derive(Debug, Deserialize)]
pub struct DockerContainers {
    pub containers: Vec<Container>,
}

/// `docker { <field> { ... } }` where the single field is the mutated container.
#[derive(Debug, Deserialize)]
pub struct ContainerMutationData {
    pub docker: std::collections::HashMap<String, Container>,
}

impl ContainerMutationData {
    pub fn into_container(self) -> Option<Container> {
        self.docker.into_values().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_selects_container_fields() {
        let query = container_mutation("StartContainer", "start");
        assert!(query.starts_with("mutation StartContainer($id: PrefixedID!)"));
        assert!(query.contains("start(id: $id) { id names image state status autoStart }"));
    }

    #[test]
    fn error_messages_are_joined() {
        let body = r#"{"data": null, "errors": [{"message": "forbidden"}, {"message": "bad id"}]}"#;
        assert_eq!(error_messages(body).as_deref(), Some("forbidden, bad id"));
    }

    #[test]
    fn error_messages_absent_for_plain_text() {
        assert_eq!(error_messages("Bad Gateway"), None);
        assert_eq!(error_messages(r#"{"data": {}}"#), None);
    }

    #[test]
    fn mutation_data_yields_container() {
        let body = r#"{"docker": {"stop": {"id": "x", "names": ["/db"], "image": "postgres", "state": "EXITED", "status": "Exited", "autoStart": true}}}"#;
        let data: ContainerMutationData = serde_json::from_str(body).unwrap();
        let container = data.into_container().unwrap();
        assert_eq!(container.display_name(), "db");
    }
}
