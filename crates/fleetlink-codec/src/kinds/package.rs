//! Package message kind: deployment package download/install/uninstall.

use super::{body_value, parse_body};
use crate::error::CodecResult;
use fleetlink_domain::{MetricValue, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APP_NAME: &str = "DEPLOY";
pub const APP_VERSION: &str = "V2";
pub const SCHEMA: &str = "package";

pub const METRIC_NAME: &str = "dp.name";
pub const METRIC_VERSION: &str = "dp.version";
pub const METRIC_URI: &str = "dp.uri";
pub const METRIC_REBOOT: &str = "dp.reboot";
pub const METRIC_REBOOT_DELAY: &str = "dp.reboot.delay";
pub const METRIC_JOB_ID: &str = "job.id";
pub const METRIC_DOWNLOAD_PROGRESS: &str = "dp.download.progress";
pub const METRIC_DOWNLOAD_STATUS: &str = "dp.download.status";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PackageBody {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
    /// Download source; absent for install/uninstall of an already-downloaded
    /// package.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uri: Option<String>,
    /// Absent means no reboot after install.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reboot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reboot_delay: Option<i64>,
    /// Platform job driving this operation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub job_id: Option<i64>,
    /// Download progress percent, reported by the device.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub download_progress: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub download_status: Option<String>,
}

pub fn encode_request(payload: &Payload) -> CodecResult<Value> {
    let body = PackageBody {
        name: payload.string_metric(METRIC_NAME).map(str::to_string),
        version: payload.string_metric(METRIC_VERSION).map(str::to_string),
        uri: payload.string_metric(METRIC_URI).map(str::to_string),
        reboot: payload.bool_metric(METRIC_REBOOT),
        reboot_delay: payload.i64_metric(METRIC_REBOOT_DELAY),
        job_id: payload.i64_metric(METRIC_JOB_ID),
        download_progress: payload.i64_metric(METRIC_DOWNLOAD_PROGRESS),
        download_status: payload.string_metric(METRIC_DOWNLOAD_STATUS).map(str::to_string),
    };
    body_value(&body, SCHEMA)
}

pub fn decode_body(value: &Value, raw: &[u8]) -> CodecResult<Payload> {
    let body: PackageBody = parse_body(value, SCHEMA, raw)?;
    let mut payload = Payload::new();
    if let Some(v) = body.name {
        payload.set_metric(METRIC_NAME, MetricValue::String(v));
    }
    if let Some(v) = body.version {
        payload.set_metric(METRIC_VERSION, MetricValue::String(v));
    }
    if let Some(v) = body.uri {
        payload.set_metric(METRIC_URI, MetricValue::String(v));
    }
    if let Some(v) = body.reboot {
        payload.set_metric(METRIC_REBOOT, MetricValue::Bool(v));
    }
    if let Some(v) = body.reboot_delay {
        payload.set_metric(METRIC_REBOOT_DELAY, MetricValue::I64(v));
    }
    if let Some(v) = body.job_id {
        payload.set_metric(METRIC_JOB_ID, MetricValue::I64(v));
    }
    if let Some(v) = body.download_progress {
        payload.set_metric(METRIC_DOWNLOAD_PROGRESS, MetricValue::I64(v));
    }
    if let Some(v) = body.download_status {
        payload.set_metric(METRIC_DOWNLOAD_STATUS, MetricValue::String(v));
    }
    Ok(payload)
}
