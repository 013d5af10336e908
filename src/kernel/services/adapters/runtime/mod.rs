//! Async runtime adapter: executes effects and sends messages back to the workbench.

mod async_runtime;
mod message;

pub use async_runtime::AsyncRuntime;
pub use message::AppMessage;
