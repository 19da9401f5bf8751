use serde::Deserialize;
use std::time::Duration;

/// MQTT transport settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttTransportConfig {
    /// Broker URL, `mqtt://host:port`, `tcp://host:port` or `host:port`.
    pub broker_url: String,
    /// Client id of the platform session; agents address replies to it.
    pub client_id: String,
    pub keep_alive_secs: u64,
    /// Capacity of the rumqttc request channel.
    pub channel_capacity: usize,
    /// Delay before re-polling after an event loop error.
    pub retry_delay_ms: u64,
}

impl Default for MqttTransportConfig {
    fn default() -> Self {
        Self {
            broker_url: "mqtt://localhost:1883".to_string(),
            client_id: "fleetlink-platform".to_string(),
            keep_alive_secs: 30,
            channel_capacity: 100,
            retry_delay_ms: 5_000,
        }
    }
}

impl MqttTransportConfig {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
