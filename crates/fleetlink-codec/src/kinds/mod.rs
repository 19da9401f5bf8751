//! One explicit, closed body translator per message kind.
//!
//! Each module declares exactly which canonical metric names map to which
//! wire-body fields; absent optional fields mean the device-side default
//! applies. There is deliberately no generic metric mapper.

pub mod asset;
pub mod command;
pub mod configuration;
pub mod inventory;
pub mod keystore;
pub mod lifecycle;
pub mod package;

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Decode a per-kind body value. A null/absent body is an empty result, not
/// an error; anything else must parse per the kind's schema.
pub(crate) fn parse_body<T>(value: &Value, schema: &'static str, raw: &[u8]) -> CodecResult<T>
where
    T: DeserializeOwned + Default,
{
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value.clone()).map_err(|e| CodecError::ContentTranslation {
        schema,
        reason: e.to_string(),
        raw: raw.to_vec(),
    })
}

pub(crate) fn body_value<T: Serialize>(body: &T, schema: &'static str) -> CodecResult<Value> {
    serde_json::to_value(body).map_err(|e| CodecError::ContentTranslation {
        schema,
        reason: e.to_string(),
        raw: Vec::new(),
    })
}
