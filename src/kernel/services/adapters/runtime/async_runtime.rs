use std::future::Future;
use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::task::JoinHandle;

use super::message::AppMessage;
use crate::kernel::servers::ServerConfig;
use crate::kernel::services::adapters::agent::MockAgent;
use crate::kernel::services::ports::{HealthProbe, WorkbenchConfig};
use crate::kernel::{Effect, TaskKind};
use crate::models::{indexed_project, DocTree};

/// Runs simulated collaborators. Each `TaskKind` owns one slot: a new task
/// aborts the one it replaces.
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    config: WorkbenchConfig,
    probe: Arc<dyn HealthProbe>,
    tasks: FxHashMap<TaskKind, JoinHandle<()>>,
}

impl AsyncRuntime {
    pub fn new(
        tx: Sender<AppMessage>,
        config: WorkbenchConfig,
        probe: Arc<dyn HealthProbe>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            tx,
            config,
            probe,
            tasks: FxHashMap::default(),
        })
    }

    pub fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::ProcessPrompt {
                request_id,
                prompt,
                files,
            } => self.process_prompt(request_id, prompt, files),
            Effect::IndexProject { run, path } => self.index_project(run, path),
            Effect::CheckServers { servers } => self.check_servers(servers),
            Effect::CancelTask(kind) => self.cancel(kind),
        }
    }

    pub fn cancel(&mut self, kind: TaskKind) {
        if let Some(handle) = self.tasks.remove(&kind) {
            if !handle.is_finished() {
                tracing::debug!(?kind, "task aborted");
            }
            handle.abort();
        }
    }

    pub fn is_running(&self, kind: TaskKind) -> bool {
        self.tasks.get(&kind).is_some_and(|h| !h.is_finished())
    }

    fn spawn_task<F>(&mut self, kind: TaskKind, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = self.runtime.spawn(task);
        if let Some(previous) = self.tasks.insert(kind, handle) {
            previous.abort();
        }
    }

    fn process_prompt(&mut self, request_id: u64, prompt: String, files: DocTree) {
        let tx = self.tx.clone();
        let delay = Duration::from_millis(self.config.prompt_delay_ms);
        tracing::debug!(request_id, files = files.len(), "processing prompt");

        self.spawn_task(TaskKind::Prompt, async move {
            tokio::time::sleep(delay).await;
            let reply =
                tokio::task::spawn_blocking(move || MockAgent::reply(&prompt, &files)).await;
            let msg = match reply {
                Ok(reply) => AppMessage::PromptProcessed { request_id, reply },
                Err(e) => AppMessage::PromptFailed {
                    request_id,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg);
        });
    }

    fn index_project(&mut self, run: u64, path: String) {
        let tx = self.tx.clone();
        let step_delay = Duration::from_millis(self.config.index_step_ms);
        let step = self.config.index_step();
        tracing::debug!(run, %path, "indexing project");

        self.spawn_task(TaskKind::Index, async move {
            let mut percent = 0usize;
            while percent < 100 {
                tokio::time::sleep(step_delay).await;
                percent = (percent + step).min(100);
                let msg = AppMessage::IndexProgress {
                    run,
                    percent: percent as u8,
                };
                if tx.send(msg).is_err() {
                    return;
                }
            }

            let msg = match tokio::task::spawn_blocking(move || indexed_project(run)).await {
                Ok(nodes) => AppMessage::IndexCompleted {
                    run,
                    nodes,
                    finished_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                },
                Err(e) => AppMessage::IndexFailed {
                    run,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg);
        });
    }

    fn check_servers(&mut self, servers: Vec<ServerConfig>) {
        let tx = self.tx.clone();
        let delay = Duration::from_millis(self.config.status_check_delay_ms);
        let probe = self.probe.clone();

        self.spawn_task(TaskKind::ServerCheck, async move {
            tokio::time::sleep(delay).await;
            let statuses = tokio::task::spawn_blocking(move || {
                servers
                    .iter()
                    .map(|server| (server.id, probe.is_online(server)))
                    .collect::<Vec<_>>()
            })
            .await;
            let msg = match statuses {
                Ok(statuses) => AppMessage::ServerStatus { statuses },
                Err(e) => AppMessage::ServerCheckFailed {
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg);
        });
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
