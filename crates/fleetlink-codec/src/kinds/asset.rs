//! Asset message kind: reading and writing driver channel values.

use super::{body_value, parse_body};
use crate::error::CodecResult;
use fleetlink_domain::{MetricValue, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APP_NAME: &str = "ASSET";
pub const APP_VERSION: &str = "V1";
pub const SCHEMA: &str = "asset";

pub const METRIC_ASSET_NAME: &str = "asset.name";
pub const METRIC_CHANNEL_NAME: &str = "asset.channel.name";
pub const METRIC_CHANNEL_TYPE: &str = "asset.channel.type";
pub const METRIC_CHANNEL_VALUE: &str = "asset.channel.value";
pub const METRIC_CHANNEL_TIMESTAMP: &str = "asset.channel.timestamp";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AssetBody {
    /// Target asset; absent means all assets.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub asset_name: Option<String>,
    /// Target channel; absent means all channels of the asset.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub channel_type: Option<String>,
    /// Stringified channel value (writes carry it, reads return it).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub channel_value: Option<String>,
    /// Sample time in epoch millis.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub channel_timestamp: Option<i64>,
}

pub fn encode_request(payload: &Payload) -> CodecResult<Value> {
    let body = AssetBody {
        asset_name: payload.string_metric(METRIC_ASSET_NAME).map(str::to_string),
        channel_name: payload.string_metric(METRIC_CHANNEL_NAME).map(str::to_string),
        channel_type: payload.string_metric(METRIC_CHANNEL_TYPE).map(str::to_string),
        channel_value: payload.string_metric(METRIC_CHANNEL_VALUE).map(str::to_string),
        channel_timestamp: payload.i64_metric(METRIC_CHANNEL_TIMESTAMP),
    };
    body_value(&body, SCHEMA)
}

pub fn decode_body(value: &Value, raw: &[u8]) -> CodecResult<Payload> {
    let body: AssetBody = parse_body(value, SCHEMA, raw)?;
    let mut payload = Payload::new();
    if let Some(v) = body.asset_name {
        payload.set_metric(METRIC_ASSET_NAME, MetricValue::String(v));
    }
    if let Some(v) = body.channel_name {
        payload.set_metric(METRIC_CHANNEL_NAME, MetricValue::String(v));
    }
    if let Some(v) = body.channel_type {
        payload.set_metric(METRIC_CHANNEL_TYPE, MetricValue::String(v));
    }
    if let Some(v) = body.channel_value {
        payload.set_metric(METRIC_CHANNEL_VALUE, MetricValue::String(v));
    }
    if let Some(v) = body.channel_timestamp {
        payload.set_metric(METRIC_CHANNEL_TIMESTAMP, MetricValue::I64(v));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_metrics_round_trip() {
        let mut payload = Payload::new();
        payload.set_metric(
            METRIC_ASSET_NAME,
            MetricValue::String("boiler".to_string()),
        );
        payload.set_metric(
            METRIC_CHANNEL_NAME,
            MetricValue::String("temperature".to_string()),
        );
        payload.set_metric(
            METRIC_CHANNEL_VALUE,
            MetricValue::String("42.5".to_string()),
        );
        payload.set_metric(METRIC_CHANNEL_TIMESTAMP, MetricValue::I64(1_700_000_000_000));

        let value = encode_request(&payload).unwrap();
        let decoded = decode_body(&value, b"").unwrap();

        assert_eq!(decoded, payload);
    }

    #[test]
    fn absent_fields_mean_all_assets() {
        let value = encode_request(&Payload::new()).unwrap();
        let decoded = decode_body(&value, b"").unwrap();
        assert!(decoded.is_empty());
    }
}
