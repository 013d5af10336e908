#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentActionStatus {
    Pending,
    Complete,
    Error,
}

impl AgentActionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAction {
    pub title: String,
    pub description: String,
    pub status: AgentActionStatus,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub response: String,
    pub actions: Vec<AgentAction>,
}
