//! Configuration message kind: snapshot read/write and component pids.

use super::{body_value, parse_body};
use crate::error::CodecResult;
use fleetlink_domain::{MetricValue, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APP_NAME: &str = "CONF";
pub const APP_VERSION: &str = "V1";
pub const SCHEMA: &str = "configuration";

pub const METRIC_COMPONENT_PID: &str = "configuration.component.pid";
pub const METRIC_SNAPSHOT: &str = "configuration.snapshot";
pub const METRIC_SNAPSHOT_ID: &str = "configuration.snapshot.id";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigurationBody {
    /// Target component pid; absent means the whole configuration.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub component_pid: Option<String>,
    /// Serialized configuration snapshot.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub snapshot: Option<String>,
    /// Snapshot id to roll back to; absent means the latest.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub snapshot_id: Option<i64>,
}

pub fn encode_request(payload: &Payload) -> CodecResult<Value> {
    let body = ConfigurationBody {
        component_pid: payload.string_metric(METRIC_COMPONENT_PID).map(str::to_string),
        snapshot: payload.string_metric(METRIC_SNAPSHOT).map(str::to_string),
        snapshot_id: payload.i64_metric(METRIC_SNAPSHOT_ID),
    };
    body_value(&body, SCHEMA)
}

pub fn decode_body(value: &Value, raw: &[u8]) -> CodecResult<Payload> {
    let body: ConfigurationBody = parse_body(value, SCHEMA, raw)?;
    let mut payload = Payload::new();
    if let Some(pid) = body.component_pid {
        payload.set_metric(METRIC_COMPONENT_PID, MetricValue::String(pid));
    }
    if let Some(snapshot) = body.snapshot {
        payload.set_metric(METRIC_SNAPSHOT, MetricValue::String(snapshot));
    }
    if let Some(snapshot_id) = body.snapshot_id {
        payload.set_metric(METRIC_SNAPSHOT_ID, MetricValue::I64(snapshot_id));
    }
    Ok(payload)
}
