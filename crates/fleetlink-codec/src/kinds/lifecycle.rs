//! Lifecycle message kind: device-originated birth/death announcements.
//!
//! These only flow inbound; the platform never issues lifecycle requests.

use super::parse_body;
use crate::error::{CodecError, CodecResult};
use fleetlink_domain::{Channel, Method, MetricValue, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APP_NAME: &str = "LIFECYCLE";
pub const APP_VERSION: &str = "V1";
pub const SCHEMA: &str = "lifecycle";

pub const EVENT_BIRTH: &str = "BIRTH";
pub const EVENT_DEATH: &str = "DEATH";
pub const EVENT_MISSING: &str = "MISSING";
pub const EVENT_APPS: &str = "APPS";

pub const METRIC_UPTIME: &str = "device.uptime";
pub const METRIC_DISPLAY_NAME: &str = "device.display.name";
pub const METRIC_MODEL_ID: &str = "device.model.id";
pub const METRIC_FIRMWARE_VERSION: &str = "device.firmware.version";
pub const METRIC_OS: &str = "device.os";
pub const METRIC_OS_VERSION: &str = "device.os.version";
pub const METRIC_CONNECTION_INTERFACE: &str = "device.connection.interface";
pub const METRIC_CONNECTION_IP: &str = "device.connection.ip";
pub const METRIC_APPLICATION_IDS: &str = "device.application.ids";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LifecycleBody {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uptime: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub firmware_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub os_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub connection_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub connection_ip: Option<String>,
    /// Comma-separated ids of the management applications the agent exposes.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub application_ids: Option<String>,
}

/// Canonical channel for a lifecycle event verb.
pub fn event_channel(event: &str, app_version: &str) -> CodecResult<Channel> {
    let (method, resource) = match event {
        EVENT_BIRTH => (Method::Create, "birth"),
        EVENT_APPS => (Method::Write, "applications"),
        EVENT_DEATH => (Method::Delete, "death"),
        EVENT_MISSING => (Method::Delete, "missing"),
        other => {
            return Err(CodecError::ChannelTranslation(format!(
                "unknown lifecycle event: {}",
                other
            )))
        }
    };
    Ok(Channel::new(
        APP_NAME,
        app_version,
        method,
        vec![resource.to_string()],
    ))
}

pub fn decode_body(value: &Value, raw: &[u8]) -> CodecResult<Payload> {
    let body: LifecycleBody = parse_body(value, SCHEMA, raw)?;
    let mut payload = Payload::new();
    if let Some(v) = body.uptime {
        payload.set_metric(METRIC_UPTIME, MetricValue::I64(v));
    }
    if let Some(v) = body.display_name {
        payload.set_metric(METRIC_DISPLAY_NAME, MetricValue::String(v));
    }
    if let Some(v) = body.model_id {
        payload.set_metric(METRIC_MODEL_ID, MetricValue::String(v));
    }
    if let Some(v) = body.firmware_version {
        payload.set_metric(METRIC_FIRMWARE_VERSION, MetricValue::String(v));
    }
    if let Some(v) = body.os {
        payload.set_metric(METRIC_OS, MetricValue::String(v));
    }
    if let Some(v) = body.os_version {
        payload.set_metric(METRIC_OS_VERSION, MetricValue::String(v));
    }
    if let Some(v) = body.connection_interface {
        payload.set_metric(METRIC_CONNECTION_INTERFACE, MetricValue::String(v));
    }
    if let Some(v) = body.connection_ip {
        payload.set_metric(METRIC_CONNECTION_IP, MetricValue::String(v));
    }
    if let Some(v) = body.application_ids {
        payload.set_metric(METRIC_APPLICATION_IDS, MetricValue::String(v));
    }
    Ok(payload)
}
