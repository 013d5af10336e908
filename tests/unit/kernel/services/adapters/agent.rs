use super::*;
use crate::models::sample_project;

#[test]
fn reply_mentions_prompt_and_top_level_count() {
    let reply = MockAgent::reply("add a login page", &sample_project());

    assert!(reply
        .response
        .starts_with("I've analyzed your project based on the prompt: \"add a login page\""));
    assert!(reply.response.contains("The project contains 3 main files"));
    assert_eq!(reply.actions.len(), 3);
    assert!(reply
        .actions
        .iter()
        .all(|a| a.status == AgentActionStatus::Complete));
    assert_eq!(
        reply.actions[0].output.as_deref(),
        Some("Found 3 files in the project.")
    );
}

#[test]
fn reply_on_empty_tree() {
    let reply = MockAgent::reply("x", &DocTree::new());
    assert!(reply.response.contains("contains 0 main files"));
}
