//! 模拟终端：行缓冲 + 命令解析（不执行任何进程）

use std::collections::VecDeque;

use crate::kernel::servers::ServerId;
use crate::models::{NodeId, Parent};

pub const VERSION_LINE: &str = concat!("Agent Workbench v", env!("CARGO_PKG_VERSION"));

pub const HELP_LINES: &[(&str, &str)] = &[
    ("help", "Show this help message"),
    ("clear", "Clear the terminal"),
    ("version", "Show workbench version"),
    ("ls [id]", "List top-level nodes or a folder's children"),
    ("tree", "Show the explorer tree"),
    ("echo <text>", "Echo a message"),
    ("cat <id>", "Print a file's content"),
    ("open <id>", "Select a file in the editor"),
    ("write <id> <text>", "Replace a file's content (\\n for newlines)"),
    ("touch <parent|root> <name>", "Create a file"),
    ("mkdir <parent|root> <name>", "Create a folder"),
    ("rm <id>", "Delete a node and its subtree"),
    ("mv <id> <parent|root>", "Move a node"),
    ("rename <id> <name>", "Rename a node"),
    ("index [path]", "Index a project folder (simulated)"),
    ("prompt <text>", "Ask the agent (simulated)"),
    ("cancel", "Cancel the running prompt or indexing"),
    ("stats", "Show project statistics"),
    ("servers", "List model servers"),
    ("server add <name> <host> [port]", "Add a model server"),
    ("server rm <id>", "Remove a model server"),
    ("check", "Refresh server status"),
    ("run [id]", "Run the selected file (simulated)"),
    ("save", "Save all changes"),
    ("tab [name]", "List sidebar tabs or switch to one"),
    ("logs [n]", "Show recent log lines"),
];

const DEFAULT_LOG_LINES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalLine {
    pub seq: u64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct TerminalState {
    lines: VecDeque<TerminalLine>,
    next_seq: u64,
    scrollback: usize,
}

impl TerminalState {
    pub fn new(scrollback: usize) -> Self {
        let mut state = Self {
            lines: VecDeque::new(),
            next_seq: 0,
            scrollback: scrollback.max(1),
        };
        state.write_line("Agent Workbench Terminal");
        state.write_line("Type `help` for available commands.");
        state
    }

    pub fn write_line(&mut self, text: impl Into<String>) {
        self.lines.push_back(TerminalLine {
            seq: self.next_seq,
            text: text.into(),
        });
        self.next_seq += 1;
        while self.lines.len() > self.scrollback {
            self.lines.pop_front();
        }
    }

    pub fn write_lines(&mut self, text: &str) {
        for line in text.split('\n') {
            self.write_line(line);
        }
    }

    /// Sequence numbers keep increasing across `clear`.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &TerminalLine> {
        self.lines.iter()
    }

    pub fn lines_since(&self, seq: u64) -> impl Iterator<Item = &TerminalLine> {
        self.lines.iter().filter(move |l| l.seq >= seq)
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn last_text(&self) -> Option<&str> {
        self.lines.back().map(|l| l.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Help,
    Clear,
    Version,
    Ls(Option<NodeId>),
    Tree,
    Echo(String),
    Cat(NodeId),
    Open(NodeId),
    Write { id: NodeId, text: String },
    Touch { parent: Parent, name: String },
    Mkdir { parent: Parent, name: String },
    Rm(NodeId),
    Mv { id: NodeId, parent: Parent },
    Rename { id: NodeId, name: String },
    Index(Option<String>),
    Prompt(String),
    Cancel,
    Stats,
    Servers,
    ServerAdd {
        name: String,
        host: String,
        port: Option<u16>,
    },
    ServerRm(ServerId),
    Check,
    Run(Option<NodeId>),
    Save,
    Tab(Option<String>),
    Logs(usize),
    Usage(&'static str),
    Unknown(String),
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (s, ""),
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

impl TerminalCommand {
    /// `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (head, rest) = split_word(line);
        let (arg1, tail) = split_word(rest);
        let (arg2, _) = split_word(tail);
        // Names keep inner spaces: everything after the first argument.
        let name = tail.trim_end();

        let cmd = match head {
            "help" => Self::Help,
            "clear" => Self::Clear,
            "version" => Self::Version,
            "ls" => Self::Ls((!arg1.is_empty()).then(|| NodeId::from(arg1))),
            "tree" => Self::Tree,
            "echo" => Self::Echo(rest.to_string()),
            "cat" | "open" | "rm" if arg1.is_empty() => Self::Usage(match head {
                "cat" => "cat <id>",
                "open" => "open <id>",
                _ => "rm <id>",
            }),
            "cat" => Self::Cat(NodeId::from(arg1)),
            "open" => Self::Open(NodeId::from(arg1)),
            "rm" => Self::Rm(NodeId::from(arg1)),
            "write" if arg1.is_empty() => Self::Usage("write <id> <text>"),
            "write" => Self::Write {
                id: NodeId::from(arg1),
                text: unescape(tail),
            },
            "touch" | "mkdir" if name.is_empty() => Self::Usage(if head == "touch" {
                "touch <parent|root> <name>"
            } else {
                "mkdir <parent|root> <name>"
            }),
            "touch" => Self::Touch {
                parent: Parent::from(arg1),
                name: name.to_string(),
            },
            "mkdir" => Self::Mkdir {
                parent: Parent::from(arg1),
                name: name.to_string(),
            },
            "mv" if arg2.is_empty() => Self::Usage("mv <id> <parent|root>"),
            "mv" => Self::Mv {
                id: NodeId::from(arg1),
                parent: Parent::from(arg2),
            },
            "rename" if name.is_empty() => Self::Usage("rename <id> <name>"),
            "rename" => Self::Rename {
                id: NodeId::from(arg1),
                name: name.to_string(),
            },
            "index" => Self::Index((!rest.is_empty()).then(|| rest.to_string())),
            "prompt" if rest.is_empty() => Self::Usage("prompt <text>"),
            "prompt" => Self::Prompt(rest.to_string()),
            "cancel" => Self::Cancel,
            "stats" => Self::Stats,
            "servers" => Self::Servers,
            "server" => Self::parse_server(arg1, tail),
            "check" => Self::Check,
            "run" => Self::Run((!arg1.is_empty()).then(|| NodeId::from(arg1))),
            "save" => Self::Save,
            "tab" => Self::Tab((!rest.is_empty()).then(|| rest.to_string())),
            "logs" => match arg1 {
                "" => Self::Logs(DEFAULT_LOG_LINES),
                n => n
                    .parse()
                    .map(Self::Logs)
                    .unwrap_or(Self::Usage("logs [n]")),
            },
            _ => Self::Unknown(line.to_string()),
        };
        Some(cmd)
    }

    fn parse_server(sub: &str, args: &str) -> Self {
        let mut parts = args.split_whitespace();
        match sub {
            "add" => {
                let (Some(name), Some(host)) = (parts.next(), parts.next()) else {
                    return Self::Usage("server add <name> <host> [port]");
                };
                let port = match parts.next().map(str::parse::<u16>) {
                    None => None,
                    Some(Ok(port)) => Some(port),
                    Some(Err(_)) => return Self::Usage("server add <name> <host> [port]"),
                };
                Self::ServerAdd {
                    name: name.to_string(),
                    host: host.to_string(),
                    port,
                }
            }
            "rm" => match parts.next().map(str::parse::<ServerId>) {
                Some(Ok(id)) => Self::ServerRm(id),
                _ => Self::Usage("server rm <id>"),
            },
            _ => Self::Usage("server add|rm ..."),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/terminal.rs"]
mod tests;
