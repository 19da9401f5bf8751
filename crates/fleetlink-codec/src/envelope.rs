use chrono::{DateTime, TimeZone, Utc};
use fleetlink_domain::{Position, SecretValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire-side counterpart of [`SecretValue`].
///
/// Serializes transparently (the device needs the raw value) but stays a
/// dedicated type so it is never confused with a plain string and never
/// printed: `Debug` redacts.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct WireSecret(String);

impl WireSecret {
    pub fn from_secret(secret: &SecretValue) -> Self {
        Self(secret.reveal().to_string())
    }

    pub fn into_secret(self) -> SecretValue {
        SecretValue::new(self.0)
    }
}

impl fmt::Debug for WireSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WireSecret(\"******\")")
    }
}

/// Wire form of a device position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WirePosition {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub satellites: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<i32>,
}

impl WirePosition {
    pub fn from_position(position: &Position) -> Self {
        Self {
            latitude: position.latitude,
            longitude: position.longitude,
            altitude: position.altitude,
            speed: position.speed,
            heading: position.heading,
            timestamp: position.timestamp.map(|t| t.timestamp_millis()),
            satellites: position.satellites,
            status: position.status,
        }
    }

    /// `None` when the timestamp millis are out of range; the caller reports
    /// the translation failure with its schema context.
    pub fn into_position(self) -> Option<Position> {
        let timestamp = match self.timestamp {
            Some(ms) => Some(millis_to_datetime(ms)?),
            None => None,
        };
        Some(Position {
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
            speed: self.speed,
            heading: self.heading,
            timestamp,
            satellites: self.satellites,
            status: self.status,
        })
    }
}

/// Millisecond epoch timestamp to UTC datetime; `None` when out of range.
pub fn millis_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// JSON envelope of an outbound request body.
///
/// `device_id` identifies the platform-side device record; agents echo it in
/// their reply envelope so responses carry the full correlation identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireRequestEnvelope {
    pub request_id: String,
    pub requester_client_id: String,
    pub device_id: String,
    pub sent_on: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<WirePosition>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub binary_body: Option<Vec<u8>>,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// JSON envelope of an inbound reply body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireResponseEnvelope {
    pub device_id: String,
    pub response_code: u32,
    /// Wire verb of the request this answers, echoed by the agent.
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exception_message: Option<String>,
    pub sent_on: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub binary_body: Option<Vec<u8>>,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// JSON envelope of an unsolicited lifecycle event body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireEventEnvelope {
    pub message_id: String,
    pub sent_on: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<WirePosition>,
    #[serde(default)]
    pub body: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_secret_redacts_debug_but_serializes_value() {
        let secret = WireSecret::from_secret(&SecretValue::new("hunter2"));

        assert_eq!(format!("{:?}", secret), "WireSecret(\"******\")");
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"hunter2\"");
        assert_eq!(secret.into_secret().reveal(), "hunter2");
    }

    #[test]
    fn request_envelope_round_trips_through_json() {
        let envelope = WireRequestEnvelope {
            request_id: "req-1".to_string(),
            requester_client_id: "platform".to_string(),
            device_id: "device-1".to_string(),
            sent_on: 1_700_000_000_000,
            position: Some(WirePosition {
                latitude: 45.07,
                longitude: 7.68,
                altitude: None,
                speed: None,
                heading: None,
                timestamp: None,
                satellites: Some(7),
                status: None,
            }),
            binary_body: None,
            body: serde_json::json!({ "component_pid": "org.example.heater" }),
        };

        let bytes = serde_json::to_vec(&envelope).unwrap();
        let decoded: WireRequestEnvelope = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn absent_optional_envelope_fields_default() {
        let decoded: WireResponseEnvelope = serde_json::from_slice(
            br#"{"device_id":"device-1","response_code":200,"method":"GET","sent_on":0}"#,
        )
        .unwrap();

        assert!(decoded.exception_message.is_none());
        assert!(decoded.binary_body.is_none());
        assert!(decoded.body.is_null());
    }

    #[test]
    fn out_of_range_millis_are_rejected() {
        assert!(millis_to_datetime(i64::MAX).is_none());
    }
}
