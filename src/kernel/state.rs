use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use crate::kernel::servers::ServersState;
use crate::kernel::services::ports::{AgentAction, WorkbenchConfig};
use crate::kernel::terminal::TerminalState;
use crate::models::{DocTree, DocTreeRow, Node, NodeId, NodeRef, ProjectStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarTab {
    Home,
    Explorer,
    Editor,
    Analytics,
    Terminal,
    Settings,
}

impl SidebarTab {
    pub const ALL: [SidebarTab; 6] = [
        SidebarTab::Home,
        SidebarTab::Explorer,
        SidebarTab::Editor,
        SidebarTab::Analytics,
        SidebarTab::Terminal,
        SidebarTab::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Explorer => "Explorer",
            Self::Editor => "Editor",
            Self::Analytics => "Analytics",
            Self::Terminal => "Terminal",
            Self::Settings => "Settings",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(label.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub seq: u64,
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
}

/// Folders start expanded; only the collapsed ones are tracked.
#[derive(Debug, Clone, Default)]
pub struct ExplorerState {
    collapsed: FxHashSet<NodeId>,
}

impl ExplorerState {
    pub fn is_collapsed(&self, id: &NodeId) -> bool {
        self.collapsed.contains(id)
    }

    pub fn toggle(&mut self, files: &DocTree, id: &NodeId) -> bool {
        if !files.find(id.as_str()).is_some_and(|n| n.is_folder()) {
            return false;
        }
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.clone());
        }
        true
    }

    pub fn rows(&self, files: &DocTree) -> Vec<DocTreeRow> {
        let expanded: FxHashSet<NodeId> = files
            .iter()
            .filter(|n| n.is_folder() && !self.collapsed.contains(n.id()))
            .map(|n| n.id().clone())
            .collect();
        files.flatten_for_view(&expanded)
    }

    pub fn prune(&mut self, files: &DocTree) {
        self.collapsed.retain(|id| files.contains(id.as_str()));
    }
}

#[derive(Debug, Clone, Default)]
pub struct AgentState {
    pub processing: bool,
    pub request_id: u64,
    pub response: String,
    pub actions: Vec<AgentAction>,
}

#[derive(Debug, Clone, Default)]
pub struct IndexerState {
    pub path: Option<String>,
    pub indexing: bool,
    pub progress: u8,
    pub run: u64,
    pub last_indexed: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: WorkbenchConfig,
    pub files: DocTree,
    pub selected_file: Option<NodeId>,
    pub active_tab: SidebarTab,
    pub show_welcome: bool,
    pub explorer: ExplorerState,
    pub stats: ProjectStats,
    pub agent: AgentState,
    pub indexer: IndexerState,
    pub servers: ServersState,
    pub terminal: TerminalState,
    pub notifications: Vec<Notification>,
    pub logs: VecDeque<String>,
    next_node_seq: u64,
    next_notification_seq: u64,
}

impl AppState {
    pub fn new(files: DocTree, config: WorkbenchConfig) -> Self {
        let stats = ProjectStats::collect(&files);
        let servers = ServersState::with_defaults(config.default_server_port);
        let terminal = TerminalState::new(config.terminal_scrollback);
        Self {
            config,
            files,
            selected_file: None,
            active_tab: SidebarTab::Home,
            show_welcome: true,
            explorer: ExplorerState::default(),
            stats,
            agent: AgentState::default(),
            indexer: IndexerState::default(),
            servers,
            terminal,
            notifications: Vec::new(),
            logs: VecDeque::new(),
            next_node_seq: 1,
            next_notification_seq: 0,
        }
    }

    pub fn with_servers(mut self, servers: ServersState) -> Self {
        self.servers = servers;
        self
    }

    /// Re-resolves the selection against the current tree.
    pub fn selected_node(&self) -> Option<&NodeRef> {
        let id = self.selected_file.as_ref()?;
        self.files
            .find(id.as_str())
            .filter(|n| matches!(n.as_ref(), Node::File(_)))
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.agent.processing || self.indexer.indexing || self.servers.is_checking()
    }

    pub fn fresh_node_id(&mut self, prefix: &str) -> NodeId {
        loop {
            let id = NodeId::new(format!("{}-{}", prefix, self.next_node_seq));
            self.next_node_seq += 1;
            if !self.files.contains(id.as_str()) {
                return id;
            }
        }
    }

    pub fn notify(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push_notification(title.into(), description.into(), NotificationKind::Info);
    }

    pub fn notify_error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push_notification(title.into(), description.into(), NotificationKind::Error);
    }

    fn push_notification(&mut self, title: String, description: String, kind: NotificationKind) {
        match kind {
            NotificationKind::Info => tracing::info!(%title, %description, "notification"),
            NotificationKind::Error => tracing::warn!(%title, %description, "notification"),
        }
        self.notifications.push(Notification {
            seq: self.next_notification_seq,
            title,
            description,
            kind,
        });
        self.next_notification_seq += 1;

        let capacity = self.config.notification_capacity.max(1);
        if self.notifications.len() > capacity {
            let excess = self.notifications.len() - capacity;
            self.notifications.drain(..excess);
        }
    }

    /// Sequence number the next notification will get; survives dismissal and eviction.
    pub fn next_notification_seq(&self) -> u64 {
        self.next_notification_seq
    }

    pub fn push_log(&mut self, line: String) {
        self.logs.push_back(line);
        while self.logs.len() > self.config.log_capacity.max(1) {
            self.logs.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
