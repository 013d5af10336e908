use std::sync::Arc;

use rand::Rng;

use crate::kernel::servers::ServerConfig;
use crate::kernel::services::ports::{HealthProbe, HealthProbeKind};

/// Placeholder probe: each server is online with probability `online_ratio`.
pub struct RandomHealthProbe {
    online_ratio: f64,
}

impl RandomHealthProbe {
    pub fn new(online_ratio: f64) -> Self {
        let online_ratio = if online_ratio.is_finite() {
            online_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { online_ratio }
    }
}

impl HealthProbe for RandomHealthProbe {
    fn is_online(&self, _server: &ServerConfig) -> bool {
        rand::rng().random_bool(self.online_ratio)
    }
}

pub struct FixedHealthProbe(pub bool);

impl HealthProbe for FixedHealthProbe {
    fn is_online(&self, _server: &ServerConfig) -> bool {
        self.0
    }
}

pub fn probe_from_kind(kind: HealthProbeKind, online_ratio: f64) -> Arc<dyn HealthProbe> {
    match kind {
        HealthProbeKind::Random => Arc::new(RandomHealthProbe::new(online_ratio)),
        HealthProbeKind::AlwaysOnline => Arc::new(FixedHealthProbe(true)),
        HealthProbeKind::AlwaysOffline => Arc::new(FixedHealthProbe(false)),
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/health.rs"]
mod tests;
