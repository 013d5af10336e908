use crate::kernel::servers::ServerConfig;
use crate::models::DocTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Prompt,
    Index,
    ServerCheck,
}

#[derive(Debug, Clone)]
pub enum Effect {
    ProcessPrompt {
        request_id: u64,
        prompt: String,
        files: DocTree,
    },
    IndexProject {
        run: u64,
        path: String,
    },
    CheckServers {
        servers: Vec<ServerConfig>,
    },
    CancelTask(TaskKind),
}
