use crate::kernel::servers::ServerId;
use crate::kernel::services::ports::AgentReply;
use crate::kernel::state::SidebarTab;
use crate::models::{NodeId, NodeRef, Parent};

#[derive(Debug, Clone)]
pub enum Action {
    SetActiveTab(SidebarTab),
    DismissWelcome,
    DismissNotifications,
    SelectFile(NodeId),
    ToggleFolder(NodeId),
    EditContent {
        id: NodeId,
        content: String,
    },
    NewFile {
        parent: Parent,
        name: String,
    },
    NewFolder {
        parent: Parent,
        name: String,
    },
    DeleteNode(NodeId),
    DeleteSelected,
    RenameNode {
        id: NodeId,
        name: String,
    },
    MoveNode {
        id: NodeId,
        parent: Parent,
    },
    SaveChanges,
    RunSelected,
    SubmitPrompt(String),
    PromptProcessed {
        request_id: u64,
        reply: AgentReply,
    },
    PromptFailed {
        request_id: u64,
        error: String,
    },
    CancelPrompt,
    SelectIndexFolder(String),
    StartIndexing,
    IndexProgress {
        run: u64,
        percent: u8,
    },
    IndexCompleted {
        run: u64,
        nodes: Vec<NodeRef>,
        finished_at: String,
    },
    IndexFailed {
        run: u64,
        error: String,
    },
    CancelIndexing,
    AddServer {
        name: String,
        host: String,
        port: Option<u16>,
    },
    DeleteServer(ServerId),
    CheckServerStatus,
    ServerStatusChecked {
        statuses: Vec<(ServerId, bool)>,
    },
    ServerCheckFailed {
        error: String,
    },
    TerminalSubmit(String),
    LogLine(String),
}
