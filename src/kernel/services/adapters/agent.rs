//! 模拟 Agent：固定延迟后返回预设分析结果

use crate::kernel::services::ports::{AgentAction, AgentActionStatus, AgentReply};
use crate::models::DocTree;

pub struct MockAgent;

impl MockAgent {
    /// `files.roots().len()` is what the reply calls "main files".
    pub fn reply(prompt: &str, files: &DocTree) -> AgentReply {
        let main_files = files.roots().len();
        let response = format!(
            "I've analyzed your project based on the prompt: \"{prompt}\"\n\n\
             Here's what I found:\n\
             - The project contains {main_files} main files\n\
             - I detected some patterns in your code that could be improved\n\
             - Based on your request, I'd recommend creating a new module for handling the functionality you described.\n\n\
             Would you like me to implement these changes?"
        );

        let actions = vec![
            AgentAction {
                title: "Project Analysis".to_string(),
                description: "Scanned project structure and files".to_string(),
                status: AgentActionStatus::Complete,
                output: Some(format!("Found {main_files} files in the project.")),
            },
            AgentAction {
                title: "Code Review".to_string(),
                description: "Analyzed code quality and patterns".to_string(),
                status: AgentActionStatus::Complete,
                output: Some("Identified 3 areas for potential improvement.".to_string()),
            },
            AgentAction {
                title: "Task Planning".to_string(),
                description: "Planned implementation tasks".to_string(),
                status: AgentActionStatus::Complete,
                output: Some(
                    "Created plan with 5 steps to implement requested changes.".to_string(),
                ),
            },
        ];

        AgentReply { response, actions }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/agent.rs"]
mod tests;
