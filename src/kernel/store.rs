use compact_str::CompactString;

use crate::models::{file_extension, DocTree, DocTreeError, Node, NodeId, Parent, ProjectStats};

use super::{Action, AppState, Effect, SidebarTab, TaskKind};

mod terminal;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }

    fn with_effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            state_changed: true,
        }
    }

    fn merge(&mut self, other: DispatchResult) {
        self.state_changed |= other.state_changed;
        self.effects.extend(other.effects);
    }
}

/// Single owner of `AppState`: every mutation goes through `dispatch`.
pub struct Store {
    state: AppState,
}

fn language_for(name: &str) -> Option<&'static str> {
    let lang = match file_extension(name) {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "json" => "json",
        "md" => "markdown",
        "html" => "html",
        "css" | "scss" => "css",
        "rs" => "rust",
        "py" => "python",
        "go" => "go",
        _ => return None,
    };
    Some(lang)
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::SetActiveTab(tab) => {
                let changed = self.state.active_tab != tab;
                self.state.active_tab = tab;
                DispatchResult::changed(changed)
            }
            Action::DismissWelcome => {
                let changed = self.state.show_welcome;
                self.state.show_welcome = false;
                DispatchResult::changed(changed)
            }
            Action::DismissNotifications => {
                let changed = !self.state.notifications.is_empty();
                self.state.notifications.clear();
                DispatchResult::changed(changed)
            }
            Action::SelectFile(id) => DispatchResult::changed(self.select_file(id)),
            Action::ToggleFolder(id) => {
                DispatchResult::changed(self.state.explorer.toggle(&self.state.files, &id))
            }
            Action::EditContent { id, content } => {
                let next = self.state.files.update_content(id.as_str(), content);
                DispatchResult::changed(self.replace_files(next))
            }
            Action::NewFile { parent, name } => self.reduce_create(&parent, &name, false),
            Action::NewFolder { parent, name } => self.reduce_create(&parent, &name, true),
            Action::DeleteNode(id) => match self.delete_node(&id) {
                Ok(()) => DispatchResult::changed(true),
                Err(e) => {
                    self.state.notify_error("Delete Failed", e.to_string());
                    DispatchResult::changed(true)
                }
            },
            Action::DeleteSelected => match self.state.selected_file.clone() {
                Some(id) => self.dispatch(Action::DeleteNode(id)),
                None => {
                    self.state.notify_error("No file selected", "Please select a file to delete.");
                    DispatchResult::changed(true)
                }
            },
            Action::RenameNode { id, name } => {
                if let Err(e) = self.rename_node(&id, &name) {
                    self.state.notify_error("Rename Failed", e.to_string());
                }
                DispatchResult::changed(true)
            }
            Action::MoveNode { id, parent } => {
                if let Err(e) = self.move_node(&id, &parent) {
                    self.state.notify_error("Move Failed", e.to_string());
                }
                DispatchResult::changed(true)
            }
            Action::SaveChanges => {
                self.state.notify("Changes Saved", "All changes have been saved successfully.");
                DispatchResult::changed(true)
            }
            Action::RunSelected => {
                let name = self
                    .state
                    .selected_node()
                    .map(|n| CompactString::from(n.name()));
                match name {
                    Some(name) => {
                        self.state.terminal.write_line(format!("$ run {name}"));
                        self.state
                            .terminal
                            .write_line(format!("(simulated) {name} was not executed"));
                        self.state.notify("Run Code", format!("Simulated run of {name}"));
                    }
                    None => self
                        .state
                        .notify_error("No file selected", "Please select a file to run."),
                }
                DispatchResult::changed(true)
            }
            Action::SubmitPrompt(prompt) => self.reduce_submit_prompt(prompt),
            Action::PromptProcessed { request_id, reply } => {
                let agent = &mut self.state.agent;
                if !agent.processing || agent.request_id != request_id {
                    tracing::debug!(request_id, "dropping stale agent reply");
                    return DispatchResult::unchanged();
                }
                agent.processing = false;
                agent.response = reply.response;
                agent.actions = reply.actions;

                self.state.terminal.write_lines(&self.state.agent.response);
                for action in &self.state.agent.actions {
                    self.state.terminal.write_line(format!(
                        "  [{}] {}: {}",
                        action.status.label(),
                        action.title,
                        action.output.as_deref().unwrap_or(&action.description)
                    ));
                }
                self.state.notify(
                    "Analysis Complete",
                    "The AI has finished analyzing your prompt.",
                );
                DispatchResult::changed(true)
            }
            Action::PromptFailed { request_id, error } => {
                let agent = &mut self.state.agent;
                if !agent.processing || agent.request_id != request_id {
                    return DispatchResult::unchanged();
                }
                agent.processing = false;
                self.state.notify_error("Processing Error", error);
                DispatchResult::changed(true)
            }
            Action::CancelPrompt => {
                if !self.state.agent.processing {
                    return DispatchResult::unchanged();
                }
                self.state.agent.processing = false;
                self.state.terminal.write_line("prompt cancelled");
                DispatchResult::with_effect(Effect::CancelTask(TaskKind::Prompt))
            }
            Action::SelectIndexFolder(path) => {
                let path = path.trim().to_string();
                if path.is_empty() {
                    return DispatchResult::unchanged();
                }
                // The running scan reports against the folder it was started with.
                if self.state.indexer.indexing {
                    self.state.notify_error(
                        "Indexing In Progress",
                        format!("Cannot select {path} while indexing is running"),
                    );
                    return DispatchResult::changed(true);
                }
                self.state.notify("Folder Selected", format!("Ready to index {path}"));
                self.state.indexer.path = Some(path);
                DispatchResult::changed(true)
            }
            Action::StartIndexing => self.reduce_start_indexing(),
            Action::IndexProgress { run, percent } => {
                if !self.is_current_index_run(run) {
                    return DispatchResult::unchanged();
                }
                let percent = percent.min(100);
                let changed = self.state.indexer.progress != percent;
                self.state.indexer.progress = percent;
                DispatchResult::changed(changed)
            }
            Action::IndexCompleted {
                run,
                nodes,
                finished_at,
            } => {
                if !self.is_current_index_run(run) {
                    tracing::debug!(run, "dropping stale index result");
                    return DispatchResult::unchanged();
                }
                let count = nodes.len();
                let next = self.state.files.merge(nodes);
                self.replace_files(next);

                let indexer = &mut self.state.indexer;
                indexer.indexing = false;
                indexer.progress = 100;
                indexer.last_indexed = Some(finished_at);
                let path = indexer.path.clone().unwrap_or_default();

                self.state
                    .terminal
                    .write_line(format!("index: merged {count} top-level nodes from {path}"));
                self.state.notify(
                    "Project Indexed",
                    format!("Successfully indexed project at {path}"),
                );
                DispatchResult::changed(true)
            }
            Action::IndexFailed { run, error } => {
                if !self.is_current_index_run(run) {
                    return DispatchResult::unchanged();
                }
                self.state.indexer.indexing = false;
                self.state.notify_error("Indexing Failed", error);
                DispatchResult::changed(true)
            }
            Action::CancelIndexing => {
                if !self.state.indexer.indexing {
                    return DispatchResult::unchanged();
                }
                self.state.indexer.indexing = false;
                self.state.terminal.write_line("indexing cancelled");
                DispatchResult::with_effect(Effect::CancelTask(TaskKind::Index))
            }
            Action::AddServer { name, host, port } => {
                let port = port.unwrap_or(self.state.config.default_server_port);
                match self.state.servers.add(&name, &host, port) {
                    Ok(_) => self.state.notify(
                        "Server Added",
                        format!("{} has been added to your servers list", name.trim()),
                    ),
                    Err(_) => self
                        .state
                        .notify_error("Validation Error", "Server name and host are required"),
                }
                DispatchResult::changed(true)
            }
            Action::DeleteServer(id) => {
                match self.state.servers.remove(id) {
                    Ok(_) => self
                        .state
                        .notify("Server Removed", "The server has been removed from your list"),
                    Err(e) => self.state.notify_error("Server Not Found", e.to_string()),
                }
                DispatchResult::changed(true)
            }
            Action::CheckServerStatus => {
                if !self.state.servers.set_checking(true) {
                    return DispatchResult::unchanged();
                }
                DispatchResult::with_effect(Effect::CheckServers {
                    servers: self.state.servers.servers().to_vec(),
                })
            }
            Action::ServerStatusChecked { statuses } => {
                if !self.state.servers.set_checking(false) {
                    return DispatchResult::unchanged();
                }
                self.state.servers.apply_statuses(&statuses);
                self.state.notify(
                    "Status Check Complete",
                    "All server statuses have been updated",
                );
                DispatchResult::changed(true)
            }
            Action::ServerCheckFailed { error } => {
                if !self.state.servers.set_checking(false) {
                    return DispatchResult::unchanged();
                }
                self.state.notify_error("Status Check Failed", error);
                DispatchResult::changed(true)
            }
            Action::TerminalSubmit(line) => self.reduce_terminal_submit(&line),
            Action::LogLine(line) => {
                self.state.push_log(line);
                DispatchResult::changed(true)
            }
        }
    }

    /// Publishes a new root. Returns false when the operation was a no-op.
    fn replace_files(&mut self, next: DocTree) -> bool {
        if next.ptr_eq(&self.state.files) {
            return false;
        }
        self.state.files = next;
        self.state.stats = ProjectStats::collect(&self.state.files);
        self.state.explorer.prune(&self.state.files);
        if self.state.selected_file.is_some() && self.state.selected_node().is_none() {
            self.state.selected_file = None;
        }
        true
    }

    fn select_file(&mut self, id: NodeId) -> bool {
        let is_file = self
            .state
            .files
            .find(id.as_str())
            .is_some_and(|n| !n.is_folder());
        if !is_file {
            return false;
        }

        self.state.selected_file = Some(id);
        if matches!(
            self.state.active_tab,
            SidebarTab::Home | SidebarTab::Explorer
        ) {
            self.state.active_tab = SidebarTab::Editor;
        }
        true
    }

    fn create_node(
        &mut self,
        parent: &Parent,
        name: &str,
        folder: bool,
    ) -> Result<NodeId, DocTreeError> {
        let id = self
            .state
            .fresh_node_id(if folder { "folder" } else { "file" });
        let node = if folder {
            Node::folder(id.clone(), name, Vec::new())
        } else {
            let node = Node::file(id.clone(), name).with_content("");
            match language_for(name) {
                Some(lang) => node.with_language(lang),
                None => node,
            }
        };

        let next = self.state.files.try_insert(parent, node.into_ref())?;
        self.replace_files(next);
        tracing::debug!(%id, %parent, "node created");
        Ok(id)
    }

    fn reduce_create(&mut self, parent: &Parent, name: &str, folder: bool) -> DispatchResult {
        let name = name.trim();
        if name.is_empty() {
            self.state.notify_error("Create Failed", "A name is required");
            return DispatchResult::changed(true);
        }

        match self.create_node(parent, name, folder) {
            Ok(id) => {
                if !folder {
                    self.select_file(id);
                }
                self.state.notify("Created", format!("{name} has been created"));
            }
            Err(e) => self.state.notify_error("Create Failed", e.to_string()),
        }
        DispatchResult::changed(true)
    }

    fn delete_node(&mut self, id: &NodeId) -> Result<(), DocTreeError> {
        let next = self.state.files.try_remove(id.as_str())?;
        self.replace_files(next);
        Ok(())
    }

    fn rename_node(&mut self, id: &NodeId, name: &str) -> Result<(), DocTreeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DocTreeError::InvalidTarget(id.clone()));
        }
        let next = self.state.files.try_rename(id.as_str(), name)?;
        self.replace_files(next);
        Ok(())
    }

    fn move_node(&mut self, id: &NodeId, parent: &Parent) -> Result<(), DocTreeError> {
        let next = self.state.files.try_move_to(id.as_str(), parent)?;
        self.replace_files(next);
        Ok(())
    }

    fn reduce_submit_prompt(&mut self, prompt: String) -> DispatchResult {
        let prompt = prompt.trim().to_string();
        if prompt.is_empty() || self.state.agent.processing {
            return DispatchResult::unchanged();
        }

        let agent = &mut self.state.agent;
        agent.processing = true;
        agent.request_id += 1;
        tracing::info!(request_id = agent.request_id, "prompt submitted");

        DispatchResult::with_effect(Effect::ProcessPrompt {
            request_id: agent.request_id,
            prompt,
            files: self.state.files.clone(),
        })
    }

    fn reduce_start_indexing(&mut self) -> DispatchResult {
        let Some(path) = self.state.indexer.path.clone() else {
            self.state.notify_error(
                "No folder selected",
                "Please select a folder to index first",
            );
            return DispatchResult::changed(true);
        };
        if self.state.indexer.indexing {
            return DispatchResult::unchanged();
        }

        let indexer = &mut self.state.indexer;
        indexer.indexing = true;
        indexer.progress = 0;
        indexer.run += 1;
        tracing::info!(run = indexer.run, %path, "indexing started");

        DispatchResult::with_effect(Effect::IndexProject {
            run: indexer.run,
            path,
        })
    }

    fn is_current_index_run(&self, run: u64) -> bool {
        self.state.indexer.indexing && self.state.indexer.run == run
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
