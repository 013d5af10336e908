//! Headless application core (state/action/effect).

pub mod action;
pub mod effect;
pub mod servers;
pub mod services;
pub mod state;
pub mod store;
pub mod terminal;

pub use action::Action;
pub use effect::{Effect, TaskKind};
pub use servers::{ServerConfig, ServerError, ServerId, ServersState};
pub use state::{
    AgentState, AppState, ExplorerState, IndexerState, Notification, NotificationKind,
    SidebarTab,
};
pub use store::{DispatchResult, Store};
pub use terminal::{TerminalCommand, TerminalLine, TerminalState};
