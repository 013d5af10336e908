use serde::{Deserialize, Serialize};

/// Timings and limits for the simulated collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkbenchConfig {
    pub prompt_delay_ms: u64,
    pub index_step_ms: u64,
    pub index_step_percent: u8,
    pub status_check_delay_ms: u64,
    /// 占位健康检查的在线概率
    pub online_ratio: f64,
    pub default_server_port: u16,
    pub log_capacity: usize,
    /// Oldest toasts are dropped beyond this.
    pub notification_capacity: usize,
    pub terminal_scrollback: usize,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            prompt_delay_ms: 2000,
            index_step_ms: 300,
            index_step_percent: 10,
            status_check_delay_ms: 2000,
            online_ratio: 0.7,
            default_server_port: 11434,
            log_capacity: 200,
            notification_capacity: 50,
            terminal_scrollback: 1000,
        }
    }
}

impl WorkbenchConfig {
    /// Zero delays; used by tests and scripted sessions.
    pub fn immediate() -> Self {
        Self {
            prompt_delay_ms: 0,
            index_step_ms: 0,
            status_check_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn index_step(&self) -> usize {
        usize::from(self.index_step_percent.clamp(1, 100))
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
