use crate::error::CallResult;
use crate::message::Message;
use crate::request::RequestMessage;
use crate::response::ResponseMessage;
use chrono::{DateTime, Utc};

/// Device-native encoding of a message: topic plus opaque body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Decoded inbound traffic.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Reply to an outstanding request. The envelope id carries the
    /// correlated request id.
    Response(ResponseMessage),
    /// Unsolicited device event (e.g. lifecycle birth/death).
    Event(Message),
}

/// Bidirectional protocol translator between the canonical message model and
/// the device-native wire encoding.
///
/// Implemented by fleetlink-codec with one explicit translator per message
/// kind; the call engine only sees this seam.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ProtocolTranslator: Send + Sync {
    fn to_wire(&self, request: &RequestMessage) -> CallResult<WireMessage>;

    fn from_wire(
        &self,
        topic: &str,
        payload: &[u8],
        received_on: DateTime<Utc>,
    ) -> CallResult<InboundMessage>;
}
