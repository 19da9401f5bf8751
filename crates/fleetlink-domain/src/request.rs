use crate::channel::Channel;
use crate::message::Message;
use crate::payload::Payload;
use chrono::Utc;
use uuid::Uuid;

/// Outbound management request: a message whose channel carries a request verb.
///
/// The envelope id doubles as the correlation request id; it is generated
/// fresh per request so correlation keys are never reused while pending.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMessage {
    pub message: Message,
}

impl RequestMessage {
    pub fn new(
        scope_id: impl Into<String>,
        device_id: impl Into<String>,
        client_id: impl Into<String>,
        channel: Channel,
        payload: Payload,
    ) -> Self {
        Self {
            message: Message {
                id: Uuid::new_v4().to_string(),
                scope_id: scope_id.into(),
                device_id: device_id.into(),
                client_id: client_id.into(),
                sent_on: Utc::now(),
                received_on: None,
                captured_on: None,
                position: None,
                channel,
                payload,
            },
        }
    }

    pub fn request_id(&self) -> &str {
        &self.message.id
    }
}
