use std::time::Duration;

/// Call engine configuration.
#[derive(Debug, Clone)]
pub struct DeviceCallConfig {
    /// Timeout applied when a call does not pass one explicitly
    /// (default: 30 seconds)
    pub default_timeout_ms: u64,
}

impl Default for DeviceCallConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 30_000,
        }
    }
}

impl DeviceCallConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}
