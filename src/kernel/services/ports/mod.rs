//! Service ports: traits + data contracts.

pub mod agent;
pub mod config;
pub mod health;
pub mod settings;

pub use agent::{AgentAction, AgentActionStatus, AgentReply};
pub use config::WorkbenchConfig;
pub use health::HealthProbe;
pub use settings::{HealthProbeKind, ServerSettings, Settings};
