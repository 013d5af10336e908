//! 模型服务器列表

use std::fmt;

use crate::kernel::services::ports::ServerSettings;

pub type ServerId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub id: ServerId,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub is_online: bool,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    MissingName,
    MissingHost,
    NotFound(ServerId),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::MissingName => write!(f, "server name is required"),
            ServerError::MissingHost => write!(f, "server host is required"),
            ServerError::NotFound(id) => write!(f, "server not found: {}", id),
        }
    }
}

impl std::error::Error for ServerError {}

#[derive(Debug, Clone)]
pub struct ServersState {
    servers: Vec<ServerConfig>,
    next_id: ServerId,
    checking: bool,
}

impl ServersState {
    pub fn new() -> Self {
        Self {
            servers: Vec::new(),
            next_id: 1,
            checking: false,
        }
    }

    /// A local server that starts online and a LAN server that starts offline.
    pub fn with_defaults(port: u16) -> Self {
        let mut state = Self::new();
        for (name, host, online) in [
            ("Local Server", "localhost", true),
            ("Development Server", "192.168.1.100", false),
        ] {
            if let Ok(id) = state.add(name, host, port) {
                state.set_online(id, online);
            }
        }
        state
    }

    pub fn from_settings(settings: &[ServerSettings], default_port: u16) -> Self {
        if settings.is_empty() {
            return Self::with_defaults(default_port);
        }

        let mut state = Self::new();
        for server in settings {
            if let Err(e) = state.add(
                &server.name,
                &server.host,
                server.port.unwrap_or(default_port),
            ) {
                tracing::warn!(name = %server.name, error = %e, "skipping server from settings");
            }
        }
        state
    }

    pub fn servers(&self) -> &[ServerConfig] {
        &self.servers
    }

    pub fn get(&self, id: ServerId) -> Option<&ServerConfig> {
        self.servers.iter().find(|s| s.id == id)
    }

    pub fn is_checking(&self) -> bool {
        self.checking
    }

    pub fn set_checking(&mut self, checking: bool) -> bool {
        let changed = self.checking != checking;
        self.checking = checking;
        changed
    }

    pub fn add(&mut self, name: &str, host: &str, port: u16) -> Result<ServerId, ServerError> {
        let name = name.trim();
        let host = host.trim();
        if name.is_empty() {
            return Err(ServerError::MissingName);
        }
        if host.is_empty() {
            return Err(ServerError::MissingHost);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.servers.push(ServerConfig {
            id,
            name: name.to_string(),
            host: host.to_string(),
            port,
            is_online: false,
        });
        Ok(id)
    }

    pub fn remove(&mut self, id: ServerId) -> Result<ServerConfig, ServerError> {
        let idx = self
            .servers
            .iter()
            .position(|s| s.id == id)
            .ok_or(ServerError::NotFound(id))?;
        Ok(self.servers.remove(idx))
    }

    fn set_online(&mut self, id: ServerId, online: bool) -> bool {
        match self.servers.iter_mut().find(|s| s.id == id) {
            Some(server) => {
                server.is_online = online;
                true
            }
            None => false,
        }
    }

    /// Servers removed while a check was in flight are skipped.
    pub fn apply_statuses(&mut self, statuses: &[(ServerId, bool)]) -> usize {
        statuses
            .iter()
            .filter(|(id, online)| self.set_online(*id, *online))
            .count()
    }
}

impl Default for ServersState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/servers.rs"]
mod tests;
