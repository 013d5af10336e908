//! 工作台：驱动 Store，执行副作用，回收异步消息
//!
//! 职责：
//! - 分发 Action 给 Store 并执行返回的 Effect
//! - 把 AppMessage 转换为 Action
//! - 收集日志行

use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::kernel::services::adapters::{probe_from_kind, AppMessage, AsyncRuntime};
use crate::kernel::services::ports::{HealthProbe, Settings};
use crate::kernel::{Action, AppState, ServersState, Store};
use crate::models::DocTree;

const MAX_LOG_DRAIN_PER_TICK: usize = 256;

pub struct Workbench {
    store: Store,
    runtime: AsyncRuntime,
    rx: Receiver<AppMessage>,
    log_rx: Option<Receiver<String>>,
}

pub fn message_to_action(msg: AppMessage) -> Action {
    match msg {
        AppMessage::PromptProcessed { request_id, reply } => {
            Action::PromptProcessed { request_id, reply }
        }
        AppMessage::PromptFailed { request_id, error } => {
            Action::PromptFailed { request_id, error }
        }
        AppMessage::IndexProgress { run, percent } => Action::IndexProgress { run, percent },
        AppMessage::IndexCompleted {
            run,
            nodes,
            finished_at,
        } => Action::IndexCompleted {
            run,
            nodes,
            finished_at,
        },
        AppMessage::IndexFailed { run, error } => Action::IndexFailed { run, error },
        AppMessage::ServerStatus { statuses } => Action::ServerStatusChecked { statuses },
        AppMessage::ServerCheckFailed { error } => Action::ServerCheckFailed { error },
    }
}

impl Workbench {
    pub fn new(
        state: AppState,
        probe: Arc<dyn HealthProbe>,
        log_rx: Option<Receiver<String>>,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(tx, state.config.clone(), probe)?;
        Ok(Self {
            store: Store::new(state),
            runtime,
            rx,
            log_rx,
        })
    }

    pub fn from_settings(
        settings: &Settings,
        files: DocTree,
        log_rx: Option<Receiver<String>>,
    ) -> io::Result<Self> {
        let config = settings.workbench.clone();
        let probe = probe_from_kind(settings.health_probe, config.online_ratio);
        let servers = ServersState::from_settings(&settings.servers, config.default_server_port);
        let state = AppState::new(files, config).with_servers(servers);
        tracing::info!(
            files = state.files.len(),
            servers = state.servers.servers().len(),
            "workbench created"
        );
        Self::new(state, probe, log_rx)
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn runtime(&self) -> &AsyncRuntime {
        &self.runtime
    }

    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.runtime.execute(effect);
        }
        result.state_changed
    }

    pub fn handle_message(&mut self, msg: AppMessage) -> bool {
        self.dispatch(message_to_action(msg))
    }

    /// Drains pending runtime messages and log lines without blocking.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.handle_message(msg);
        }
        changed |= self.poll_logs();
        changed
    }

    /// Blocks until no simulated task is pending. Returns false on timeout.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.poll_logs();
            if !self.store.state().has_pending_tasks() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.handle_message(msg);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => return false,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    tracing::warn!("runtime channel closed while tasks were pending");
                    return false;
                }
            }
        }
    }

    fn poll_logs(&mut self) -> bool {
        let Some(rx) = self.log_rx.take() else {
            return false;
        };

        let mut lines = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(line) => {
                    lines.push(line);
                    if lines.len() >= MAX_LOG_DRAIN_PER_TICK {
                        break;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if !disconnected {
            self.log_rx = Some(rx);
        }

        let changed = !lines.is_empty();
        for line in lines {
            self.store.dispatch(Action::LogLine(line));
        }
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/workbench.rs"]
mod tests;
