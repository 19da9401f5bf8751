use crate::config::MqttTransportConfig;
use async_trait::async_trait;
use fleetlink_domain::{CallError, CallResult, DeviceTransport};
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tracing::debug;

/// Outbound half of the MQTT session.
///
/// Publishes wire messages at QoS 1; a publish failure surfaces as
/// [`CallError::TransportSendFailure`] so the call engine treats it as fatal
/// before any correlation slot exists.
#[derive(Clone)]
pub struct MqttDeviceTransport {
    client: AsyncClient,
}

impl MqttDeviceTransport {
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AsyncClient {
        &self.client
    }
}

#[async_trait]
impl DeviceTransport for MqttDeviceTransport {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> CallResult<()> {
        debug!(topic = %topic, payload_size = payload.len(), "publishing device message");
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| CallError::TransportSendFailure(e.to_string()))
    }
}

/// Open the broker session. The returned transport publishes through the
/// session; the event loop must be driven by the inbound dispatcher.
pub fn connect(config: &MqttTransportConfig) -> CallResult<(MqttDeviceTransport, EventLoop)> {
    let (host, port) = parse_broker_url(&config.broker_url)?;

    let mut options = MqttOptions::new(&config.client_id, host, port);
    options.set_keep_alive(config.keep_alive());
    options.set_clean_session(true);

    let (client, event_loop) = AsyncClient::new(options, config.channel_capacity);
    Ok((MqttDeviceTransport::new(client), event_loop))
}

/// Parse a broker URL of the form `mqtt://host:port`, `tcp://host:port` or
/// `host:port`; the port defaults to 1883.
fn parse_broker_url(url: &str) -> CallResult<(&str, u16)> {
    let stripped = url.trim_start_matches("mqtt://").trim_start_matches("tcp://");

    let parts: Vec<&str> = stripped.split(':').collect();
    match parts.len() {
        1 => Ok((parts[0], 1883)),
        2 => {
            let port = parts[1].parse::<u16>().map_err(|_| {
                CallError::TransportSendFailure(format!("invalid port in broker URL: {}", url))
            })?;
            Ok((parts[0], port))
        }
        _ => Err(CallError::TransportSendFailure(format!(
            "invalid broker URL: {}",
            url
        ))),
    }
}
