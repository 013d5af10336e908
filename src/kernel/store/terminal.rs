use crate::kernel::terminal::{TerminalCommand, HELP_LINES, VERSION_LINE};
use crate::kernel::{Action, SidebarTab};
use crate::models::{line_count, NodeId, NodeRef};

use super::DispatchResult;

fn node_label(node: &NodeRef) -> String {
    if node.is_folder() {
        format!("{}/  [{}]", node.name(), node.id())
    } else {
        format!("{}  [{}]", node.name(), node.id())
    }
}

impl super::Store {
    pub(super) fn reduce_terminal_submit(&mut self, line: &str) -> DispatchResult {
        let Some(cmd) = TerminalCommand::parse(line) else {
            return DispatchResult::unchanged();
        };
        self.state.terminal.write_line(format!("$ {}", line.trim()));

        let mut result = DispatchResult::changed(true);
        result.merge(self.run_terminal_command(cmd));
        result
    }

    fn run_terminal_command(&mut self, cmd: TerminalCommand) -> DispatchResult {
        match cmd {
            TerminalCommand::Help => {
                self.print("Available commands:");
                for (usage, about) in HELP_LINES {
                    self.print(format!("  {usage:<34}{about}"));
                }
            }
            TerminalCommand::Clear => self.state.terminal.clear(),
            TerminalCommand::Version => self.print(VERSION_LINE),
            TerminalCommand::Ls(None) => {
                let lines: Vec<String> = self.state.files.roots().iter().map(node_label).collect();
                self.print_all(lines);
            }
            TerminalCommand::Ls(Some(id)) => match self.state.files.find(id.as_str()) {
                Some(node) if node.is_folder() => {
                    let lines: Vec<String> = node.children().iter().map(node_label).collect();
                    self.print_all(lines);
                }
                Some(node) => {
                    let line = node_label(node);
                    self.print(line);
                }
                None => self.print_not_found(&id),
            },
            TerminalCommand::Tree => {
                let lines: Vec<String> = self
                    .state
                    .explorer
                    .rows(&self.state.files)
                    .into_iter()
                    .map(|row| {
                        let marker = match (row.is_folder, row.is_expanded) {
                            (true, true) => "v ",
                            (true, false) => "> ",
                            (false, _) => "  ",
                        };
                        format!("{}{}{}", "  ".repeat(row.depth as usize), marker, row.name)
                    })
                    .collect();
                self.print_all(lines);
            }
            TerminalCommand::Echo(text) => self.print(text),
            TerminalCommand::Cat(id) => match self.state.files.find(id.as_str()) {
                Some(node) if node.is_folder() => {
                    self.print(format!("cat: {id}: is a folder"));
                }
                Some(node) => {
                    let content = node.content().unwrap_or_default().to_string();
                    self.state.terminal.write_lines(&content);
                }
                None => self.print_not_found(&id),
            },
            TerminalCommand::Open(id) => {
                if self.select_file(id.clone()) {
                    self.print(format!("opened {id}"));
                } else {
                    self.print(format!("open: {id}: not a file"));
                }
            }
            TerminalCommand::Write { id, text } => {
                match self.state.files.try_update_content(id.as_str(), text) {
                    Ok(next) => {
                        self.replace_files(next);
                        let lines = line_count(
                            self.state.files.find(id.as_str()).and_then(|n| n.content()),
                        );
                        self.print(format!("wrote {lines} lines to {id}"));
                    }
                    Err(e) => self.print(format!("write: {e}")),
                }
            }
            TerminalCommand::Touch { parent, name } => {
                match self.create_node(&parent, &name, false) {
                    Ok(id) => self.print(format!("created {name} [{id}]")),
                    Err(e) => self.print(format!("touch: {e}")),
                }
            }
            TerminalCommand::Mkdir { parent, name } => {
                match self.create_node(&parent, &name, true) {
                    Ok(id) => self.print(format!("created {name}/ [{id}]")),
                    Err(e) => self.print(format!("mkdir: {e}")),
                }
            }
            TerminalCommand::Rm(id) => match self.delete_node(&id) {
                Ok(()) => self.print(format!("removed {id}")),
                Err(e) => self.print(format!("rm: {e}")),
            },
            TerminalCommand::Mv { id, parent } => match self.move_node(&id, &parent) {
                Ok(()) => self.print(format!("moved {id} to {parent}")),
                Err(e) => self.print(format!("mv: {e}")),
            },
            TerminalCommand::Rename { id, name } => match self.rename_node(&id, &name) {
                Ok(()) => self.print(format!("renamed {id} to {name}")),
                Err(e) => self.print(format!("rename: {e}")),
            },
            TerminalCommand::Index(path) => {
                let mut result = DispatchResult::changed(true);
                if let Some(path) = path {
                    result.merge(self.dispatch(Action::SelectIndexFolder(path)));
                }
                let started = self.dispatch(Action::StartIndexing);
                if started.effects.is_empty() {
                    self.print("index: nothing to do");
                } else {
                    self.print("indexing...");
                }
                result.merge(started);
                return result;
            }
            TerminalCommand::Prompt(prompt) => {
                let submitted = self.dispatch(Action::SubmitPrompt(prompt));
                if submitted.effects.is_empty() {
                    self.print("prompt: agent is busy");
                } else {
                    self.print("processing prompt...");
                }
                return submitted;
            }
            TerminalCommand::Cancel => {
                let mut result = self.dispatch(Action::CancelPrompt);
                result.merge(self.dispatch(Action::CancelIndexing));
                if result.effects.is_empty() {
                    self.print("cancel: nothing is running");
                }
                return result;
            }
            TerminalCommand::Stats => {
                let stats = &self.state.stats;
                let mut lines = vec![
                    format!("files:  {}", stats.total_files),
                    format!("lines:  {}", stats.total_lines),
                    format!("issues: {}", stats.issues_count),
                ];
                lines.extend(
                    stats
                        .file_types
                        .iter()
                        .map(|t| format!("  .{:<10}{}", t.name, t.count)),
                );
                self.print_all(lines);
            }
            TerminalCommand::Servers => {
                let lines: Vec<String> = self
                    .state
                    .servers
                    .servers()
                    .iter()
                    .map(|s| {
                        format!(
                            "[{}] {} {} ({})",
                            s.id,
                            s.name,
                            s.address(),
                            if s.is_online { "online" } else { "offline" }
                        )
                    })
                    .collect();
                if lines.is_empty() {
                    self.print("no servers configured");
                }
                self.print_all(lines);
            }
            TerminalCommand::ServerAdd { name, host, port } => {
                return self.dispatch(Action::AddServer { name, host, port });
            }
            TerminalCommand::ServerRm(id) => return self.dispatch(Action::DeleteServer(id)),
            TerminalCommand::Check => {
                let checked = self.dispatch(Action::CheckServerStatus);
                if checked.effects.is_empty() {
                    self.print("check: already in progress");
                } else {
                    self.print("checking servers...");
                }
                return checked;
            }
            TerminalCommand::Run(id) => {
                if let Some(id) = id {
                    if !self.select_file(id.clone()) {
                        self.print(format!("run: {id}: not a file"));
                        return DispatchResult::changed(true);
                    }
                }
                return self.dispatch(Action::RunSelected);
            }
            TerminalCommand::Save => return self.dispatch(Action::SaveChanges),
            TerminalCommand::Tab(None) => {
                let active = self.state.active_tab;
                let lines: Vec<String> = SidebarTab::ALL
                    .into_iter()
                    .map(|tab| {
                        let marker = if tab == active { "*" } else { " " };
                        format!("{marker} {}", tab.label())
                    })
                    .collect();
                self.print_all(lines);
            }
            TerminalCommand::Tab(Some(name)) => match SidebarTab::from_label(&name) {
                Some(tab) => {
                    let mut result = DispatchResult::changed(true);
                    result.merge(self.dispatch(Action::SetActiveTab(tab)));
                    self.print(format!("switched to {}", tab.label()));
                    return result;
                }
                None => self.print(format!("tab: unknown tab {name}")),
            },
            TerminalCommand::Logs(n) => {
                let skip = self.state.logs.len().saturating_sub(n);
                let lines: Vec<String> = self.state.logs.iter().skip(skip).cloned().collect();
                if lines.is_empty() {
                    self.print("no log lines yet");
                }
                self.print_all(lines);
            }
            TerminalCommand::Usage(usage) => self.print(format!("usage: {usage}")),
            TerminalCommand::Unknown(line) => self.print(format!("Command not found: {line}")),
        }
        DispatchResult::changed(true)
    }

    fn print(&mut self, line: impl Into<String>) {
        self.state.terminal.write_line(line);
    }

    fn print_all(&mut self, lines: Vec<String>) {
        for line in lines {
            self.state.terminal.write_line(line);
        }
    }

    fn print_not_found(&mut self, id: &NodeId) {
        self.print(format!("no such node: {id}"));
    }
}
