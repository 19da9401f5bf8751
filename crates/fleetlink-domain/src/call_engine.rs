use crate::config::DeviceCallConfig;
use crate::correlation::{CorrelationKey, CorrelationRegistry};
use crate::error::{CallError, CallResult};
use crate::message::Message;
use crate::request::RequestMessage;
use crate::translator::{InboundMessage, ProtocolTranslator};
use crate::transport::DeviceTransport;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Turns an asynchronous, topic-addressed publish into a synchronous-looking
/// call with timeout.
///
/// Flow:
/// 1. Translate the request to wire form
/// 2. Publish via the transport (a send failure is fatal, no slot registered)
/// 3. Register a correlation slot keyed by (scope, device, request id)
/// 4. Await the matching response, the timeout, or shutdown
/// 5. Remove the slot on every exit path
///
/// Auditing and operation bookkeeping are explicit, separate calls made by
/// the orchestrating service around `call`, never hidden inside it.
pub struct DeviceCallService {
    transport: Arc<dyn DeviceTransport>,
    translator: Arc<dyn ProtocolTranslator>,
    registry: CorrelationRegistry,
    config: DeviceCallConfig,
    shutdown_token: CancellationToken,
}

impl DeviceCallService {
    pub fn new(
        transport: Arc<dyn DeviceTransport>,
        translator: Arc<dyn ProtocolTranslator>,
        config: DeviceCallConfig,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            transport,
            translator,
            registry: CorrelationRegistry::new(),
            config,
            shutdown_token,
        }
    }

    pub fn registry(&self) -> &CorrelationRegistry {
        &self.registry
    }

    /// Issue `request` and suspend until the correlated response arrives or
    /// `timeout` elapses (the configured default when omitted).
    pub async fn call(
        &self,
        request: &RequestMessage,
        timeout: Option<Duration>,
    ) -> CallResult<crate::response::ResponseMessage> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout());
        let wire = self.translator.to_wire(request)?;

        debug!(
            scope_id = %request.message.scope_id,
            device_id = %request.message.device_id,
            request_id = %request.message.id,
            topic = %wire.topic,
            "issuing device call"
        );

        self.transport.publish(&wire.topic, wire.payload).await?;

        let key = CorrelationKey::new(
            request.message.scope_id.clone(),
            request.message.device_id.clone(),
            request.message.id.clone(),
        );
        let slot = self.registry.register(key.clone()).await?;

        let result = tokio::select! {
            received = slot => match received {
                Ok(response) => {
                    debug!(
                        correlation_key = %key,
                        response_code = response.response_code.as_u32(),
                        "device call completed"
                    );
                    Ok(response)
                }
                // Slot dropped without a response: the registry was torn down
                // while we were waiting.
                Err(_) => Err(CallError::Cancelled),
            },
            _ = tokio::time::sleep(timeout) => {
                warn!(correlation_key = %key, timeout_ms = timeout.as_millis() as u64, "device call timed out");
                Err(CallError::ResponseTimeout(timeout))
            }
            _ = self.shutdown_token.cancelled() => {
                debug!(correlation_key = %key, "device call cancelled by shutdown");
                Err(CallError::Cancelled)
            }
        };

        self.registry.remove(&key).await;
        result
    }

    /// Inbound dispatch hook, invoked by the transport adapter per received
    /// message.
    ///
    /// Correlated responses resolve their pending call and yield `None`;
    /// uncorrelated responses are discarded and logged. Decoded unsolicited
    /// events are handed back to the caller for routing.
    pub async fn handle_inbound(
        &self,
        topic: &str,
        payload: &[u8],
        received_on: DateTime<Utc>,
    ) -> CallResult<Option<Message>> {
        match self.translator.from_wire(topic, payload, received_on)? {
            InboundMessage::Response(response) => {
                let key = CorrelationKey::new(
                    response.message.scope_id.clone(),
                    response.message.device_id.clone(),
                    response.message.id.clone(),
                );
                if !self.registry.complete(&key, response).await {
                    warn!(correlation_key = %key, topic = %topic, "discarding uncorrelated response");
                }
                Ok(None)
            }
            InboundMessage::Event(event) => {
                debug!(
                    scope_id = %event.scope_id,
                    client_id = %event.client_id,
                    topic = %topic,
                    "decoded unsolicited device event"
                );
                Ok(Some(event))
            }
        }
    }
}
