//! Service adapters: runtime specific implementations (async tasks, settings IO).

pub mod agent;
pub mod health;
pub mod paths;
pub mod runtime;
pub mod settings;

pub use agent::MockAgent;
pub use health::{probe_from_kind, FixedHealthProbe, RandomHealthProbe};
pub use paths::{ensure_log_dir, get_cache_dir, get_log_dir};
pub use runtime::{AppMessage, AsyncRuntime};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, SettingsError};
