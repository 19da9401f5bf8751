//! Bidirectional translator between the canonical message model and the
//! device-native wire encoding.
//!
//! Outbound: canonical request -> request topic + JSON envelope, with the
//! body encoded by the message kind's translator. Inbound: topic + bytes ->
//! correlated response or unsolicited lifecycle event.

use crate::envelope::{
    millis_to_datetime, WireEventEnvelope, WirePosition, WireRequestEnvelope, WireResponseEnvelope,
};
use crate::error::{CodecError, CodecResult};
use crate::kinds;
use crate::topic::{parse_topic, request_topic, verb_method, ParsedTopic, TopicKind};
use chrono::{DateTime, Utc};
use fleetlink_domain::{
    CallResult, Channel, InboundMessage, Message, Payload, ProtocolTranslator, RequestMessage,
    ResponseCode, ResponseMessage, WireMessage,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

const RESPONSE_SCHEMA: &str = "response-envelope";
const EVENT_SCHEMA: &str = "event-envelope";

/// The platform side of the device management protocol.
///
/// One translator instance serves the whole fleet; `platform_client_id` is
/// the client id agents address their replies to.
#[derive(Debug, Clone)]
pub struct DeviceProtocolTranslator {
    platform_client_id: String,
}

impl DeviceProtocolTranslator {
    pub fn new(platform_client_id: impl Into<String>) -> Self {
        Self {
            platform_client_id: platform_client_id.into(),
        }
    }

    fn encode_body(&self, channel: &Channel, payload: &Payload) -> CodecResult<Value> {
        match channel.app_name.as_str() {
            kinds::configuration::APP_NAME => kinds::configuration::encode_request(payload),
            kinds::asset::APP_NAME => kinds::asset::encode_request(payload),
            kinds::inventory::APP_NAME => kinds::inventory::encode_request(payload),
            kinds::keystore::APP_NAME => kinds::keystore::encode_request(payload),
            kinds::package::APP_NAME => kinds::package::encode_request(payload),
            kinds::command::APP_NAME => kinds::command::encode_request(payload),
            kinds::lifecycle::APP_NAME => Err(CodecError::ChannelTranslation(
                "lifecycle messages are inbound only".to_string(),
            )),
            other => Err(CodecError::ChannelTranslation(format!(
                "no translator for application {}",
                other
            ))),
        }
    }

    fn decode_reply_body(
        &self,
        app_name: &str,
        body: &Value,
        raw: &[u8],
    ) -> CodecResult<Payload> {
        match app_name {
            kinds::configuration::APP_NAME => kinds::configuration::decode_body(body, raw),
            kinds::asset::APP_NAME => kinds::asset::decode_body(body, raw),
            kinds::inventory::APP_NAME => kinds::inventory::decode_body(body, raw),
            kinds::keystore::APP_NAME => kinds::keystore::decode_body(body, raw),
            kinds::package::APP_NAME => kinds::package::decode_body(body, raw),
            kinds::command::APP_NAME => kinds::command::decode_body(body, raw),
            other => Err(CodecError::ChannelTranslation(format!(
                "no translator for application {}",
                other
            ))),
        }
    }

    fn decode_reply(
        &self,
        parsed: ParsedTopic,
        request_id: String,
        raw: &[u8],
        received_on: DateTime<Utc>,
    ) -> CodecResult<ResponseMessage> {
        let envelope: WireResponseEnvelope = parse_envelope(raw, RESPONSE_SCHEMA)?;
        let method = verb_method(&envelope.method).ok_or_else(|| {
            CodecError::ChannelTranslation(format!(
                "unknown wire verb in reply envelope: {}",
                envelope.method
            ))
        })?;
        let sent_on = millis_to_datetime(envelope.sent_on).ok_or_else(|| {
            CodecError::ContentTranslation {
                schema: RESPONSE_SCHEMA,
                reason: format!("sent_on out of range: {}", envelope.sent_on),
                raw: raw.to_vec(),
            }
        })?;

        let mut payload = self.decode_reply_body(&parsed.app_name, &envelope.body, raw)?;
        if let Some(body) = envelope.binary_body {
            payload.set_body(body);
        }

        Ok(ResponseMessage {
            message: Message {
                id: request_id,
                scope_id: parsed.scope_id,
                device_id: envelope.device_id,
                client_id: parsed.client_id,
                sent_on,
                received_on: Some(received_on),
                captured_on: None,
                position: None,
                channel: Channel::new(parsed.app_name, parsed.app_version, method, Vec::new()),
                payload,
            },
            response_code: ResponseCode::from_u32(envelope.response_code),
            exception_message: envelope.exception_message,
        })
    }

    fn decode_event(
        &self,
        parsed: ParsedTopic,
        event: &str,
        raw: &[u8],
        received_on: DateTime<Utc>,
    ) -> CodecResult<Message> {
        let channel = kinds::lifecycle::event_channel(event, &parsed.app_version)?;
        let envelope: WireEventEnvelope = parse_envelope(raw, EVENT_SCHEMA)?;
        let sent_on = millis_to_datetime(envelope.sent_on).ok_or_else(|| {
            CodecError::ContentTranslation {
                schema: EVENT_SCHEMA,
                reason: format!("sent_on out of range: {}", envelope.sent_on),
                raw: raw.to_vec(),
            }
        })?;
        let position = match envelope.position {
            Some(wire) => Some(wire.into_position().ok_or_else(|| {
                CodecError::ContentTranslation {
                    schema: EVENT_SCHEMA,
                    reason: "position timestamp out of range".to_string(),
                    raw: raw.to_vec(),
                }
            })?),
            None => None,
        };
        let payload = kinds::lifecycle::decode_body(&envelope.body, raw)?;

        // Lifecycle topics carry the agent's client id; the device record is
        // resolved upstream from the same identifier.
        Ok(Message {
            id: envelope.message_id,
            scope_id: parsed.scope_id,
            device_id: parsed.client_id.clone(),
            client_id: parsed.client_id,
            sent_on,
            received_on: Some(received_on),
            captured_on: None,
            position,
            channel,
            payload,
        })
    }
}

impl ProtocolTranslator for DeviceProtocolTranslator {
    fn to_wire(&self, request: &RequestMessage) -> CallResult<WireMessage> {
        let message = &request.message;
        let body = self.encode_body(&message.channel, &message.payload)?;

        let topic = request_topic(&message.scope_id, &message.client_id, &message.channel);
        let envelope = WireRequestEnvelope {
            request_id: message.id.clone(),
            requester_client_id: self.platform_client_id.clone(),
            device_id: message.device_id.clone(),
            sent_on: message.sent_on.timestamp_millis(),
            position: message.position.as_ref().map(WirePosition::from_position),
            binary_body: message.payload.body().map(<[u8]>::to_vec),
            body,
        };
        let payload = serde_json::to_vec(&envelope).map_err(|e| {
            CodecError::ContentTranslation {
                schema: "request-envelope",
                reason: e.to_string(),
                raw: Vec::new(),
            }
        })?;

        Ok(WireMessage { topic, payload })
    }

    fn from_wire(
        &self,
        topic: &str,
        payload: &[u8],
        received_on: DateTime<Utc>,
    ) -> CallResult<InboundMessage> {
        let parsed = parse_topic(topic)?;
        let inbound = match parsed.kind.clone() {
            TopicKind::Reply { request_id } => InboundMessage::Response(
                self.decode_reply(parsed, request_id, payload, received_on)?,
            ),
            TopicKind::Lifecycle { event } => {
                InboundMessage::Event(self.decode_event(parsed, &event, payload, received_on)?)
            }
        };
        Ok(inbound)
    }
}

fn parse_envelope<T: DeserializeOwned>(raw: &[u8], schema: &'static str) -> CodecResult<T> {
    serde_json::from_slice(raw).map_err(|e| CodecError::ContentTranslation {
        schema,
        reason: e.to_string(),
        raw: raw.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::configuration;
    use crate::kinds::lifecycle;
    use fleetlink_domain::{CallError, Method, MetricValue};

    fn translator() -> DeviceProtocolTranslator {
        DeviceProtocolTranslator::new("platform")
    }

    fn configuration_request() -> RequestMessage {
        let mut payload = Payload::new();
        payload.set_metric(
            configuration::METRIC_COMPONENT_PID,
            MetricValue::String("org.example.heater".to_string()),
        );
        RequestMessage::new(
            "scope-1",
            "device-1",
            "gw-01",
            Channel::new(
                configuration::APP_NAME,
                configuration::APP_VERSION,
                Method::Read,
                vec!["configurations".to_string()],
            ),
            payload,
        )
    }

    #[test]
    fn request_encodes_topic_and_envelope() {
        let request = configuration_request();

        let wire = translator().to_wire(&request).unwrap();

        assert_eq!(wire.topic, "$FLT/scope-1/gw-01/CONF-V1/GET/configurations");
        let envelope: WireRequestEnvelope = serde_json::from_slice(&wire.payload).unwrap();
        assert_eq!(envelope.request_id, request.request_id());
        assert_eq!(envelope.requester_client_id, "platform");
        assert_eq!(envelope.device_id, "device-1");
        assert_eq!(envelope.body["component_pid"], "org.example.heater");
    }

    #[test]
    fn lifecycle_channel_is_rejected_outbound() {
        let request = RequestMessage::new(
            "scope-1",
            "device-1",
            "gw-01",
            Channel::new("LIFECYCLE", "V1", Method::Create, vec!["birth".to_string()]),
            Payload::new(),
        );

        let result = translator().to_wire(&request);
        assert!(matches!(result, Err(CallError::ChannelTranslation(_))));
    }

    #[test]
    fn unknown_application_is_rejected_outbound() {
        let request = RequestMessage::new(
            "scope-1",
            "device-1",
            "gw-01",
            Channel::new("WIFI", "V1", Method::Read, Vec::new()),
            Payload::new(),
        );

        let result = translator().to_wire(&request);
        assert!(matches!(result, Err(CallError::ChannelTranslation(_))));
    }

    #[test]
    fn reply_decodes_to_correlated_response() {
        let raw = serde_json::to_vec(&serde_json::json!({
            "device_id": "device-1",
            "response_code": 200,
            "method": "GET",
            "sent_on": 1_700_000_000_000i64,
            "body": { "component_pid": "org.example.heater", "snapshot": "<xml/>" }
        }))
        .unwrap();
        let received_on = Utc::now();

        let inbound = translator()
            .from_wire("$FLT/scope-1/platform/CONF-V1/REPLY/req-42", &raw, received_on)
            .unwrap();

        let response = match inbound {
            InboundMessage::Response(response) => response,
            other => panic!("expected a response, got {:?}", other),
        };
        assert_eq!(response.request_id(), "req-42");
        assert_eq!(response.message.scope_id, "scope-1");
        assert_eq!(response.message.device_id, "device-1");
        assert_eq!(response.message.channel.method, Method::Read);
        assert_eq!(response.message.received_on, Some(received_on));
        assert!(response.response_code.is_accepted());
        assert_eq!(
            response
                .message
                .payload
                .string_metric(configuration::METRIC_SNAPSHOT),
            Some("<xml/>")
        );
    }

    #[test]
    fn rejected_reply_carries_code_and_exception_message() {
        let raw = serde_json::to_vec(&serde_json::json!({
            "device_id": "device-1",
            "response_code": 404,
            "method": "GET",
            "exception_message": "no such pid",
            "sent_on": 1_700_000_000_000i64
        }))
        .unwrap();

        let inbound = translator()
            .from_wire("$FLT/scope-1/platform/CONF-V1/REPLY/req-42", &raw, Utc::now())
            .unwrap();

        let response = match inbound {
            InboundMessage::Response(response) => response,
            other => panic!("expected a response, got {:?}", other),
        };
        assert_eq!(response.response_code, ResponseCode::NotFound);
        assert_eq!(response.exception_message.as_deref(), Some("no such pid"));
        // Null body is an empty result, not an error.
        assert!(response.message.payload.is_empty());
    }

    #[test]
    fn malformed_reply_body_carries_raw_bytes() {
        let raw = serde_json::to_vec(&serde_json::json!({
            "device_id": "device-1",
            "response_code": 200,
            "method": "GET",
            "sent_on": 0,
            "body": { "snapshot_id": "not-a-number" }
        }))
        .unwrap();

        let result = translator().from_wire(
            "$FLT/scope-1/platform/CONF-V1/REPLY/req-42",
            &raw,
            Utc::now(),
        );

        match result {
            Err(CallError::ContentTranslation { schema, raw: carried, .. }) => {
                assert_eq!(schema, "configuration");
                assert_eq!(carried, raw);
            }
            other => panic!("expected a content translation failure, got {:?}", other),
        }
    }

    #[test]
    fn birth_event_decodes_to_device_message() {
        let raw = serde_json::to_vec(&serde_json::json!({
            "message_id": "evt-1",
            "sent_on": 1_700_000_000_000i64,
            "position": { "latitude": 45.07, "longitude": 7.68 },
            "body": { "display_name": "Boiler Gateway", "uptime": 42 }
        }))
        .unwrap();

        let inbound = translator()
            .from_wire("$FLT/scope-1/gw-01/LIFECYCLE-V1/BIRTH", &raw, Utc::now())
            .unwrap();

        let event = match inbound {
            InboundMessage::Event(event) => event,
            other => panic!("expected an event, got {:?}", other),
        };
        assert_eq!(event.scope_id, "scope-1");
        assert_eq!(event.client_id, "gw-01");
        assert_eq!(event.channel.method, Method::Create);
        assert_eq!(event.channel.resource, vec!["birth".to_string()]);
        assert_eq!(
            event.payload.string_metric(lifecycle::METRIC_DISPLAY_NAME),
            Some("Boiler Gateway")
        );
        assert_eq!(event.payload.i64_metric(lifecycle::METRIC_UPTIME), Some(42));
        assert_eq!(event.position.as_ref().map(|p| p.latitude), Some(45.07));
    }

    #[test]
    fn binary_reply_body_is_preserved() {
        let raw = serde_json::to_vec(&serde_json::json!({
            "device_id": "device-1",
            "response_code": 200,
            "method": "GET",
            "sent_on": 0,
            "binary_body": [222, 173, 190, 239]
        }))
        .unwrap();

        let inbound = translator()
            .from_wire("$FLT/scope-1/platform/INVENTORY-V1/REPLY/req-9", &raw, Utc::now())
            .unwrap();

        let response = match inbound {
            InboundMessage::Response(response) => response,
            other => panic!("expected a response, got {:?}", other),
        };
        assert_eq!(response.message.payload.body(), Some(&[0xde, 0xad, 0xbe, 0xef][..]));
    }
}
