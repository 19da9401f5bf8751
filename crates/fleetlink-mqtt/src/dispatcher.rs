//! Inbound side of the MQTT session: drives the event loop, feeds received
//! publishes to the call engine and routes decoded unsolicited events.

use crate::config::MqttTransportConfig;
use chrono::Utc;
use fleetlink_codec::kinds::lifecycle;
use fleetlink_codec::topic::{REPLY_VERB, TOPIC_PREFIX};
use fleetlink_domain::{CallError, CallResult, DeviceCallService, Message};
use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Topic filters the platform session subscribes to: its own reply topics
/// plus the lifecycle announcements of every device in every scope.
pub fn subscription_filters(platform_client_id: &str) -> Vec<String> {
    let mut filters = vec![format!(
        "{}/+/{}/+/{}/+",
        TOPIC_PREFIX, platform_client_id, REPLY_VERB
    )];
    for event in [
        lifecycle::EVENT_BIRTH,
        lifecycle::EVENT_DEATH,
        lifecycle::EVENT_MISSING,
        lifecycle::EVENT_APPS,
    ] {
        filters.push(format!(
            "{}/+/+/{}-{}/{}",
            TOPIC_PREFIX,
            lifecycle::APP_NAME,
            lifecycle::APP_VERSION,
            event
        ));
    }
    filters
}

/// Run the inbound dispatcher until shutdown.
///
/// Replies resolve pending calls inside the engine; decoded lifecycle events
/// are forwarded on `event_tx`. Event loop errors are logged and polling
/// resumes after the configured delay (rumqttc reconnects on the next poll).
pub async fn run_inbound_dispatcher(
    engine: Arc<DeviceCallService>,
    client: AsyncClient,
    mut event_loop: EventLoop,
    config: MqttTransportConfig,
    shutdown_token: CancellationToken,
    event_tx: mpsc::Sender<Message>,
) -> CallResult<()> {
    subscribe_all(&client, &config).await?;

    info!(client_id = %config.client_id, "inbound dispatcher started");

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                debug!("shutdown signal received");
                let _ = client.disconnect().await;
                return Ok(());
            }
            event = event_loop.poll() => {
                match event {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        handle_publish(&engine, &event_tx, &publish.topic, &publish.payload).await;
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("connected to MQTT broker");
                        // Re-establish subscriptions after a reconnect.
                        subscribe_all(&client, &config).await?;
                    }
                    Ok(Event::Incoming(Packet::SubAck(_))) => {
                        debug!("subscription acknowledged");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "MQTT event loop error");
                        tokio::select! {
                            _ = shutdown_token.cancelled() => {
                                return Ok(());
                            }
                            _ = tokio::time::sleep(config.retry_delay()) => {}
                        }
                    }
                }
            }
        }
    }
}

async fn subscribe_all(client: &AsyncClient, config: &MqttTransportConfig) -> CallResult<()> {
    for filter in subscription_filters(&config.client_id) {
        client
            .subscribe(&filter, QoS::AtLeastOnce)
            .await
            .map_err(|e| {
                CallError::TransportSendFailure(format!("failed to subscribe to {}: {}", filter, e))
            })?;
        debug!(filter = %filter, "subscribed");
    }
    Ok(())
}

/// Feed one received publish to the call engine. Undecodable traffic is
/// logged and skipped; a single bad message never takes the dispatcher down.
pub(crate) async fn handle_publish(
    engine: &DeviceCallService,
    event_tx: &mpsc::Sender<Message>,
    topic: &str,
    payload: &[u8],
) {
    match engine.handle_inbound(topic, payload, Utc::now()).await {
        Ok(Some(event)) => {
            if event_tx.send(event).await.is_err() {
                warn!(topic = %topic, "event receiver closed, dropping device event");
            }
        }
        Ok(None) => {}
        Err(e) => {
            warn!(topic = %topic, error = %e, "failed to handle inbound message, skipping");
        }
    }
}
