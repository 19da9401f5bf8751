//! Inventory message kind: bundles/packages installed on the device.
//!
//! Requests carry no body fields (the resource path selects the inventory
//! slice); responses return the serialized inventory.

use super::{body_value, parse_body};
use crate::error::CodecResult;
use fleetlink_domain::{MetricValue, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APP_NAME: &str = "INVENTORY";
pub const APP_VERSION: &str = "V1";
pub const SCHEMA: &str = "inventory";

pub const METRIC_INVENTORY_JSON: &str = "inventory.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InventoryBody {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inventory_json: Option<String>,
}

pub fn encode_request(payload: &Payload) -> CodecResult<Value> {
    let body = InventoryBody {
        inventory_json: payload
            .string_metric(METRIC_INVENTORY_JSON)
            .map(str::to_string),
    };
    body_value(&body, SCHEMA)
}

pub fn decode_body(value: &Value, raw: &[u8]) -> CodecResult<Payload> {
    let body: InventoryBody = parse_body(value, SCHEMA, raw)?;
    let mut payload = Payload::new();
    if let Some(v) = body.inventory_json {
        payload.set_metric(METRIC_INVENTORY_JSON, MetricValue::String(v));
    }
    Ok(payload)
}
