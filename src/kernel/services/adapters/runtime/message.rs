use crate::kernel::servers::ServerId;
use crate::kernel::services::ports::AgentReply;
use crate::models::NodeRef;

#[derive(Debug)]
pub enum AppMessage {
    PromptProcessed {
        request_id: u64,
        reply: AgentReply,
    },
    PromptFailed {
        request_id: u64,
        error: String,
    },
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
    ServerStatus {
        statuses: Vec<(ServerId, bool)>,
    },
    ServerCheckFailed {
        error: String,
    },
}
