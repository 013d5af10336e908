use crate::kernel::servers::ServerConfig;

/// Decides whether a configured server answers. Implementations must not block
/// for long; they run on the async runtime's worker threads.
pub trait HealthProbe: Send + Sync {
    fn is_online(&self, server: &ServerConfig) -> bool;
}
