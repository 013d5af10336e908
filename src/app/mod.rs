//! 应用层：把 kernel store 与异步运行时接在一起

mod workbench;

pub use workbench::{message_to_action, Workbench};
