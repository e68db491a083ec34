//! Docker container model returned by the Unraid API.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub image: String,
    pub state: ContainerState,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub auto_start: bool,
}

impl Container {
    /// First container name without the leading `/` Docker adds.
    pub fn display_name(&self) -> &str {
        self.names
            .first()
            .map_or("unnamed", |name| name.trim_start_matches('/'))
    }

    /// Whether `name` refers to this container, by name or by exact id.
    pub fn matches(&self, name: &str) -> bool {
        let wanted = name.trim_start_matches('/');
        self.id == name
            || self
                .names
                .iter()
                .any(|n| n.trim_start_matches('/') == wanted)
    }

    pub fn is_running(&self) -> bool {
        self.state == ContainerState::Running
    }
}

/// Container state as reported by the API (`RUNNING`, `PAUSED`, `EXITED`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContainerState {
    Running,
    Paused,
    Exited,
    Other(String),
}

impl ContainerState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Exited => "exited",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ContainerState {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "RUNNING" => Self::Running,
            "PAUSED" => Self::Paused,
            "EXITED" => Self::Exited,
            _ => Self::Other(value.to_ascii_lowercase()),
        }
    }
}

impl From<ContainerState> for String {
    fn from(value: ContainerState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
