//! Wire codec for the device management protocol.
//!
//! Translates between the canonical message model of `fleetlink-domain` and
//! the device-native encoding: `$FLT`-prefixed control topics plus JSON
//! envelopes, with one explicit body translator per message kind.

pub mod envelope;
pub mod error;
pub mod kinds;
pub mod topic;
pub mod translator;

pub use envelope::{
    WireEventEnvelope, WirePosition, WireRequestEnvelope, WireResponseEnvelope, WireSecret,
};
pub use error::{CodecError, CodecResult};
pub use topic::{parse_topic, reply_topic, request_topic, ParsedTopic, TopicKind};
pub use translator::DeviceProtocolTranslator;
