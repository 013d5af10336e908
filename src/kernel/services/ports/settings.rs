use serde::{Deserialize, Serialize};

use super::config::WorkbenchConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub workbench: WorkbenchConfig,
    #[serde(default)]
    pub servers: Vec<ServerSettings>,
    #[serde(default)]
    pub health_probe: HealthProbeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub name: String,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthProbeKind {
    #[default]
    Random,
    AlwaysOnline,
    AlwaysOffline,
}
