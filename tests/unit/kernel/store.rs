use super::*;
use crate::kernel::services::ports::{AgentAction, AgentActionStatus, AgentReply, WorkbenchConfig};
use crate::kernel::NotificationKind;
use crate::models::{indexed_project, sample_project};

fn new_store() -> Store {
    Store::new(AppState::new(
        sample_project(),
        WorkbenchConfig::immediate(),
    ))
}

fn last_notification(store: &Store) -> (&str, &str, NotificationKind) {
    let n = store.state().notifications.last().unwrap();
    (n.title.as_str(), n.description.as_str(), n.kind)
}

fn terminal_texts(store: &Store) -> Vec<String> {
    store
        .state()
        .terminal
        .lines()
        .map(|l| l.text.clone())
        .collect()
}

fn reply() -> AgentReply {
    AgentReply {
        response: "done\nreally".to_string(),
        actions: vec![AgentAction {
            title: "Project Analysis".to_string(),
            description: "Scanned".to_string(),
            status: AgentActionStatus::Complete,
            output: Some("Found 3 files in the project.".to_string()),
        }],
    }
}

#[test]
fn test_edit_content_recomputes_stats() {
    let mut store = new_store();
    assert_eq!(store.state().stats.issues_count, 1);

    let result = store.dispatch(Action::EditContent {
        id: NodeId::from("file-2"),
        content: "clean".to_string(),
    });
    assert!(result.state_changed);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().stats.issues_count, 0);
    assert_eq!(
        store.state().files.find("file-2").unwrap().content(),
        Some("clean")
    );
}

#[test]
fn test_edit_content_on_folder_is_noop() {
    let mut store = new_store();
    let before = store.state().files.clone();

    let result = store.dispatch(Action::EditContent {
        id: NodeId::from("root-1"),
        content: "x".to_string(),
    });
    assert!(!result.state_changed);
    assert!(store.state().files.ptr_eq(&before));
}

#[test]
fn test_select_file_switches_to_editor() {
    let mut store = new_store();
    assert!(store.dispatch(Action::SelectFile(NodeId::from("file-1"))).state_changed);
    assert_eq!(store.state().active_tab, SidebarTab::Editor);
    assert_eq!(store.state().selected_file, Some(NodeId::from("file-1")));

    assert!(!store.dispatch(Action::SelectFile(NodeId::from("root-1"))).state_changed);
    assert_eq!(store.state().selected_file, Some(NodeId::from("file-1")));
}

#[test]
fn test_select_file_keeps_non_navigation_tab() {
    let mut store = new_store();
    store.dispatch(Action::SetActiveTab(SidebarTab::Analytics));
    store.dispatch(Action::SelectFile(NodeId::from("file-1")));
    assert_eq!(store.state().active_tab, SidebarTab::Analytics);
}

#[test]
fn test_new_file_gets_fresh_id_language_and_selection() {
    let mut store = new_store();
    store.dispatch(Action::NewFile {
        parent: Parent::Folder(NodeId::from("folder-1")),
        name: "util.ts".to_string(),
    });

    let node = store.state().files.find("file-7").unwrap().clone();
    assert_eq!(node.name(), "util.ts");
    assert_eq!(node.language(), Some("typescript"));
    assert_eq!(node.content(), Some(""));
    assert_eq!(
        store.state().files.parent_of("file-7"),
        Some(Parent::Folder(NodeId::from("folder-1")))
    );
    assert_eq!(store.state().selected_file, Some(NodeId::from("file-7")));
    assert_eq!(store.state().stats.total_files, 8);
}

#[test]
fn test_new_folder_at_root() {
    let mut store = new_store();
    store.dispatch(Action::NewFolder {
        parent: Parent::Root,
        name: "docs".to_string(),
    });
    let last = store.state().files.roots().last().unwrap();
    assert!(last.is_folder());
    assert_eq!(last.name(), "docs");
    assert_eq!(store.state().selected_file, None);
}

#[test]
fn test_new_file_under_file_reports_error() {
    let mut store = new_store();
    let before = store.state().files.clone();
    store.dispatch(Action::NewFile {
        parent: Parent::Folder(NodeId::from("file-1")),
        name: "nope.js".to_string(),
    });

    assert!(store.state().files.ptr_eq(&before));
    let (title, _, kind) = last_notification(&store);
    assert_eq!(title, "Create Failed");
    assert_eq!(kind, NotificationKind::Error);
}

#[test]
fn test_new_file_requires_name() {
    let mut store = new_store();
    store.dispatch(Action::NewFile {
        parent: Parent::Root,
        name: "   ".to_string(),
    });
    assert_eq!(store.state().files.len(), sample_project().len());
    assert_eq!(last_notification(&store).0, "Create Failed");
}

#[test]
fn test_delete_selected_clears_selection() {
    let mut store = new_store();
    store.dispatch(Action::SelectFile(NodeId::from("file-3")));
    store.dispatch(Action::DeleteNode(NodeId::from("folder-1")));

    assert!(!store.state().files.contains("file-3"));
    assert_eq!(store.state().selected_file, None);
    assert_eq!(store.state().stats.total_files, 5);
}

#[test]
fn test_delete_selected_without_selection() {
    let mut store = new_store();
    store.dispatch(Action::DeleteSelected);
    assert_eq!(
        last_notification(&store),
        (
            "No file selected",
            "Please select a file to delete.",
            NotificationKind::Error
        )
    );
}

#[test]
fn test_rename_keeps_selection_and_updates_histogram() {
    let mut store = new_store();
    store.dispatch(Action::SelectFile(NodeId::from("root-3")));
    store.dispatch(Action::RenameNode {
        id: NodeId::from("root-3"),
        name: "README.txt".to_string(),
    });

    assert_eq!(store.state().selected_file, Some(NodeId::from("root-3")));
    let names: Vec<&str> = store
        .state()
        .stats
        .file_types
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["js", "json", "txt"]);
}

#[test]
fn test_move_into_descendant_is_rejected() {
    let mut store = new_store();
    let before = store.state().files.clone();
    store.dispatch(Action::MoveNode {
        id: NodeId::from("root-1"),
        parent: Parent::Folder(NodeId::from("folder-1")),
    });
    assert!(store.state().files.ptr_eq(&before));
    assert_eq!(last_notification(&store).0, "Move Failed");

    store.dispatch(Action::MoveNode {
        id: NodeId::from("file-6"),
        parent: Parent::Root,
    });
    assert_eq!(store.state().files.parent_of("file-6"), Some(Parent::Root));
}

#[test]
fn test_toggle_folder_collapses_rows() {
    let mut store = new_store();
    assert!(store.dispatch(Action::ToggleFolder(NodeId::from("root-1"))).state_changed);
    let rows = store.state().explorer.rows(&store.state().files);
    assert_eq!(rows.len(), 4);
    assert!(!store.dispatch(Action::ToggleFolder(NodeId::from("file-1"))).state_changed);
}

#[test]
fn test_prompt_round_trip() {
    let mut store = new_store();
    let result = store.dispatch(Action::SubmitPrompt("  explain  ".to_string()));
    let request_id = match result.effects.as_slice() {
        [Effect::ProcessPrompt {
            request_id,
            prompt,
            files,
        }] => {
            assert_eq!(prompt, "explain");
            assert!(files.ptr_eq(&store.state().files));
            *request_id
        }
        other => panic!("unexpected effects: {other:?}"),
    };
    assert!(store.state().agent.processing);
    assert!(store.state().has_pending_tasks());

    // Busy agent ignores further prompts.
    assert!(store
        .dispatch(Action::SubmitPrompt("again".to_string()))
        .effects
        .is_empty());

    store.dispatch(Action::PromptProcessed {
        request_id,
        reply: reply(),
    });
    assert!(!store.state().agent.processing);
    assert_eq!(store.state().agent.response, "done\nreally");
    assert_eq!(last_notification(&store).0, "Analysis Complete");
    let lines = terminal_texts(&store);
    assert!(lines.contains(&"really".to_string()));
    assert!(lines
        .iter()
        .any(|l| l.contains("[complete] Project Analysis: Found 3 files")));
}

#[test]
fn test_stale_prompt_reply_is_dropped() {
    let mut store = new_store();
    store.dispatch(Action::SubmitPrompt("first".to_string()));
    store.dispatch(Action::CancelPrompt);
    store.dispatch(Action::SubmitPrompt("second".to_string()));

    let result = store.dispatch(Action::PromptProcessed {
        request_id: 1,
        reply: reply(),
    });
    assert!(!result.state_changed);
    assert!(store.state().agent.processing);
    assert_eq!(store.state().agent.request_id, 2);
}

#[test]
fn test_cancel_prompt_emits_cancel_effect() {
    let mut store = new_store();
    assert!(store.dispatch(Action::CancelPrompt).effects.is_empty());

    store.dispatch(Action::SubmitPrompt("x".to_string()));
    let result = store.dispatch(Action::CancelPrompt);
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::CancelTask(TaskKind::Prompt)]
    ));
    assert!(!store.state().agent.processing);
}

#[test]
fn test_prompt_failure_notifies() {
    let mut store = new_store();
    store.dispatch(Action::SubmitPrompt("x".to_string()));
    store.dispatch(Action::PromptFailed {
        request_id: 1,
        error: "boom".to_string(),
    });
    assert_eq!(
        last_notification(&store),
        ("Processing Error", "boom", NotificationKind::Error)
    );
    assert!(!store.state().agent.processing);
}

#[test]
fn test_start_indexing_requires_folder() {
    let mut store = new_store();
    let result = store.dispatch(Action::StartIndexing);
    assert!(result.effects.is_empty());
    assert_eq!(last_notification(&store).0, "No folder selected");
}

#[test]
fn test_indexing_merges_at_top_level() {
    let mut store = new_store();
    store.dispatch(Action::SelectIndexFolder("/work/app".to_string()));
    assert_eq!(
        last_notification(&store),
        (
            "Folder Selected",
            "Ready to index /work/app",
            NotificationKind::Info
        )
    );

    let result = store.dispatch(Action::StartIndexing);
    let run = match result.effects.as_slice() {
        [Effect::IndexProject { run, path }] => {
            assert_eq!(path, "/work/app");
            *run
        }
        other => panic!("unexpected effects: {other:?}"),
    };

    store.dispatch(Action::IndexProgress { run, percent: 40 });
    assert_eq!(store.state().indexer.progress, 40);

    store.dispatch(Action::IndexCompleted {
        run,
        nodes: indexed_project(run),
        finished_at: "2026-01-01 00:00:00".to_string(),
    });
    let state = store.state();
    assert!(!state.indexer.indexing);
    assert_eq!(state.indexer.progress, 100);
    assert_eq!(
        state.indexer.last_indexed.as_deref(),
        Some("2026-01-01 00:00:00")
    );
    assert_eq!(state.files.roots().len(), 5);
    assert_eq!(state.stats.total_files, 10);
    assert_eq!(
        last_notification(&store).1,
        "Successfully indexed project at /work/app"
    );
}

#[test]
fn test_stale_index_messages_are_ignored() {
    let mut store = new_store();
    store.dispatch(Action::SelectIndexFolder("/a".to_string()));
    store.dispatch(Action::StartIndexing);
    store.dispatch(Action::CancelIndexing);

    let result = store.dispatch(Action::IndexCompleted {
        run: 1,
        nodes: indexed_project(1),
        finished_at: String::new(),
    });
    assert!(!result.state_changed);
    assert_eq!(store.state().files.roots().len(), 3);
}

#[test]
fn test_index_folder_is_locked_while_indexing() {
    let mut store = new_store();
    store.dispatch(Action::SelectIndexFolder("/srv/a".to_string()));
    let run = match store.dispatch(Action::StartIndexing).effects.as_slice() {
        [Effect::IndexProject { run, .. }] => *run,
        other => panic!("unexpected effects: {other:?}"),
    };

    store.dispatch(Action::TerminalSubmit("index /srv/b".to_string()));
    assert_eq!(store.state().indexer.path.as_deref(), Some("/srv/a"));
    assert_eq!(
        last_notification(&store),
        (
            "Indexing In Progress",
            "Cannot select /srv/b while indexing is running",
            NotificationKind::Error
        )
    );

    store.dispatch(Action::IndexCompleted {
        run,
        nodes: indexed_project(run),
        finished_at: String::new(),
    });
    let lines = terminal_texts(&store);
    assert!(lines
        .iter()
        .any(|l| l.starts_with("index: merged") && l.ends_with("from /srv/a")));
    assert_eq!(
        last_notification(&store).1,
        "Successfully indexed project at /srv/a"
    );

    store.dispatch(Action::SelectIndexFolder("/srv/b".to_string()));
    assert_eq!(store.state().indexer.path.as_deref(), Some("/srv/b"));
}

#[test]
fn test_add_server_validation_and_default_port() {
    let mut store = new_store();
    store.dispatch(Action::AddServer {
        name: " ".to_string(),
        host: "h".to_string(),
        port: None,
    });
    assert_eq!(
        last_notification(&store),
        (
            "Validation Error",
            "Server name and host are required",
            NotificationKind::Error
        )
    );

    store.dispatch(Action::AddServer {
        name: "GPU Box".to_string(),
        host: "10.0.0.5".to_string(),
        port: None,
    });
    let server = store.state().servers.servers().last().unwrap();
    assert_eq!(server.port, 11434);
    assert!(!server.is_online);
    assert_eq!(
        last_notification(&store).1,
        "GPU Box has been added to your servers list"
    );
}

#[test]
fn test_server_check_flow() {
    let mut store = new_store();
    let result = store.dispatch(Action::CheckServerStatus);
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::CheckServers { servers }] if servers.len() == 2
    ));
    assert!(store
        .dispatch(Action::CheckServerStatus)
        .effects
        .is_empty());

    store.dispatch(Action::ServerStatusChecked {
        statuses: vec![(1, false), (2, true)],
    });
    let online: Vec<bool> = store
        .state()
        .servers
        .servers()
        .iter()
        .map(|s| s.is_online)
        .collect();
    assert_eq!(online, vec![false, true]);
    assert!(!store.state().servers.is_checking());
    assert_eq!(last_notification(&store).0, "Status Check Complete");
}

#[test]
fn test_run_selected() {
    let mut store = new_store();
    store.dispatch(Action::RunSelected);
    assert_eq!(
        last_notification(&store),
        (
            "No file selected",
            "Please select a file to run.",
            NotificationKind::Error
        )
    );

    store.dispatch(Action::SelectFile(NodeId::from("file-1")));
    store.dispatch(Action::RunSelected);
    assert_eq!(last_notification(&store).0, "Run Code");
    assert!(terminal_texts(&store).contains(&"$ run main.js".to_string()));
}

#[test]
fn test_terminal_ls_and_unknown() {
    let mut store = new_store();
    store.dispatch(Action::TerminalSubmit("ls".to_string()));
    store.dispatch(Action::TerminalSubmit("ls folder-1".to_string()));
    store.dispatch(Action::TerminalSubmit("frob".to_string()));

    let lines = terminal_texts(&store);
    let tail: Vec<&str> = lines[2..].iter().map(String::as_str).collect();
    assert_eq!(
        tail,
        vec![
            "$ ls",
            "src/  [root-1]",
            "config/  [root-2]",
            "README.md  [root-3]",
            "$ ls folder-1",
            "index.js  [file-3]",
            "fileScanner.js  [file-4]",
            "$ frob",
            "Command not found: frob",
        ]
    );
}

#[test]
fn test_terminal_blank_input_is_ignored() {
    let mut store = new_store();
    let before = store.state().terminal.next_seq();
    assert!(!store.dispatch(Action::TerminalSubmit("  ".to_string())).state_changed);
    assert_eq!(store.state().terminal.next_seq(), before);
}

#[test]
fn test_terminal_file_commands() {
    let mut store = new_store();
    store.dispatch(Action::TerminalSubmit("touch root notes.md".to_string()));
    store.dispatch(Action::TerminalSubmit(
        "write file-7 hello\\nworld".to_string(),
    ));
    assert_eq!(
        store.state().terminal.last_text(),
        Some("wrote 2 lines to file-7")
    );

    store.dispatch(Action::TerminalSubmit("cat file-7".to_string()));
    let lines = terminal_texts(&store);
    assert_eq!(&lines[lines.len() - 2..], &["hello", "world"]);

    store.dispatch(Action::TerminalSubmit("mv file-7 root-2".to_string()));
    assert_eq!(
        store.state().files.parent_of("file-7"),
        Some(Parent::Folder(NodeId::from("root-2")))
    );

    store.dispatch(Action::TerminalSubmit("rm file-7".to_string()));
    assert!(!store.state().files.contains("file-7"));

    store.dispatch(Action::TerminalSubmit("rm file-7".to_string()));
    assert_eq!(
        store.state().terminal.last_text(),
        Some("rm: node not found: file-7")
    );
}

#[test]
fn test_terminal_names_with_spaces() {
    let mut store = new_store();
    store.dispatch(Action::TerminalSubmit("touch root my notes.md".to_string()));
    assert_eq!(
        store.state().files.find("file-7").map(|n| n.name()),
        Some("my notes.md")
    );
    assert_eq!(
        store.state().terminal.last_text(),
        Some("created my notes.md [file-7]")
    );

    store.dispatch(Action::TerminalSubmit("rename root-3 READ ME.md".to_string()));
    assert_eq!(
        store.state().files.find("root-3").map(|n| n.name()),
        Some("READ ME.md")
    );
}

#[test]
fn test_terminal_tab_lists_and_switches() {
    let mut store = new_store();
    store.dispatch(Action::TerminalSubmit("tab".to_string()));
    let lines = terminal_texts(&store);
    assert_eq!(
        &lines[lines.len() - 6..],
        &[
            "* Home",
            "  Explorer",
            "  Editor",
            "  Analytics",
            "  Terminal",
            "  Settings"
        ]
    );

    let result = store.dispatch(Action::TerminalSubmit("tab analytics".to_string()));
    assert!(result.state_changed);
    assert_eq!(store.state().active_tab, SidebarTab::Analytics);
    assert_eq!(
        store.state().terminal.last_text(),
        Some("switched to Analytics")
    );

    store.dispatch(Action::TerminalSubmit("tab debugger".to_string()));
    assert_eq!(store.state().active_tab, SidebarTab::Analytics);
    assert_eq!(
        store.state().terminal.last_text(),
        Some("tab: unknown tab debugger")
    );
}

#[test]
fn test_terminal_usage_and_clear() {
    let mut store = new_store();
    store.dispatch(Action::TerminalSubmit("cat".to_string()));
    assert_eq!(store.state().terminal.last_text(), Some("usage: cat <id>"));

    store.dispatch(Action::TerminalSubmit("clear".to_string()));
    assert_eq!(store.state().terminal.lines().count(), 0);
}

#[test]
fn test_terminal_prompt_and_index_emit_effects() {
    let mut store = new_store();
    let result = store.dispatch(Action::TerminalSubmit("prompt refactor db".to_string()));
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::ProcessPrompt { .. }]
    ));

    let result = store.dispatch(Action::TerminalSubmit("index /srv/app".to_string()));
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::IndexProject { path, .. }] if path == "/srv/app"
    ));

    let result = store.dispatch(Action::TerminalSubmit("cancel".to_string()));
    assert_eq!(result.effects.len(), 2);
}

#[test]
fn test_log_lines_are_bounded() {
    let mut store = Store::new(AppState::new(
        DocTree::new(),
        WorkbenchConfig {
            log_capacity: 3,
            ..WorkbenchConfig::immediate()
        },
    ));
    for i in 0..5 {
        store.dispatch(Action::LogLine(format!("l{i}")));
    }
    store.dispatch(Action::TerminalSubmit("logs 2".to_string()));
    let lines = terminal_texts(&store);
    assert_eq!(&lines[lines.len() - 2..], &["l3", "l4"]);
}
