use crate::channel::Channel;
use crate::payload::Payload;
use chrono::{DateTime, Utc};

/// Reported device position at capture time.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub satellites: Option<u32>,
    pub status: Option<i32>,
}

/// Message envelope: identity, addressing, timestamps, channel and payload.
///
/// Immutable once sent; created by the caller and read by the translator and
/// call engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub scope_id: String,
    pub device_id: String,
    pub client_id: String,
    pub sent_on: DateTime<Utc>,
    pub received_on: Option<DateTime<Utc>>,
    pub captured_on: Option<DateTime<Utc>>,
    pub position: Option<Position>,
    pub channel: Channel,
    pub payload: Payload,
}
