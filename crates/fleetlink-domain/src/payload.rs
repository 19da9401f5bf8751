use std::collections::BTreeMap;
use std::fmt;

/// Wrapper for secret-valued metrics (passwords, private key material).
///
/// Secrets are never carried as plain strings; `Debug` and `Display` redact
/// the value so it cannot leak through logs. Call [`SecretValue::reveal`] at
/// the single point where the raw value is actually needed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying secret.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(\"******\")")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("******")
    }
}

/// Typed scalar value of a payload metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Secret(SecretValue),
}

impl MetricValue {
    /// Declared type name, as recorded on management operation input properties.
    pub fn type_name(&self) -> &'static str {
        match self {
            MetricValue::String(_) => "string",
            MetricValue::I64(_) => "int",
            MetricValue::F64(_) => "float",
            MetricValue::Bool(_) => "bool",
            MetricValue::Bytes(_) => "bytes",
            MetricValue::Secret(_) => "secret",
        }
    }

    /// Stringified form for audit records. Secrets stay redacted, bytes are
    /// summarized by length.
    pub fn display_value(&self) -> String {
        match self {
            MetricValue::String(v) => v.clone(),
            MetricValue::I64(v) => v.to_string(),
            MetricValue::F64(v) => v.to_string(),
            MetricValue::Bool(v) => v.to_string(),
            MetricValue::Bytes(v) => format!("<{} bytes>", v.len()),
            MetricValue::Secret(v) => v.to_string(),
        }
    }
}

/// Metric map plus optional opaque binary body carried by a message.
///
/// An empty map with no body is a valid "no body" payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload {
    metrics: BTreeMap<String, MetricValue>,
    body: Option<Vec<u8>>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_metric(&mut self, name: impl Into<String>, value: MetricValue) {
        let _ = self.metrics.insert(name.into(), value);
    }

    pub fn metric(&self, name: &str) -> Option<&MetricValue> {
        self.metrics.get(name)
    }

    pub fn metrics(&self) -> impl Iterator<Item = (&String, &MetricValue)> {
        self.metrics.iter()
    }

    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    pub fn string_metric(&self, name: &str) -> Option<&str> {
        match self.metrics.get(name) {
            Some(MetricValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn i64_metric(&self, name: &str) -> Option<i64> {
        match self.metrics.get(name) {
            Some(MetricValue::I64(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn f64_metric(&self, name: &str) -> Option<f64> {
        match self.metrics.get(name) {
            Some(MetricValue::F64(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn bool_metric(&self, name: &str) -> Option<bool> {
        match self.metrics.get(name) {
            Some(MetricValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn bytes_metric(&self, name: &str) -> Option<&[u8]> {
        match self.metrics.get(name) {
            Some(MetricValue::Bytes(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn secret_metric(&self, name: &str) -> Option<&SecretValue> {
        match self.metrics.get(name) {
            Some(MetricValue::Secret(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = Some(body);
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.body.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_valid_no_body() {
        let payload = Payload::new();
        assert!(payload.is_empty());
        assert_eq!(payload.metric_count(), 0);
        assert!(payload.body().is_none());
    }

    #[test]
    fn typed_accessors_reject_mismatched_types() {
        let mut payload = Payload::new();
        payload.set_metric("count", MetricValue::I64(3));

        assert_eq!(payload.i64_metric("count"), Some(3));
        assert_eq!(payload.string_metric("count"), None);
        assert_eq!(payload.bool_metric("count"), None);
    }

    #[test]
    fn secret_value_redacts_debug_and_display() {
        let secret = SecretValue::new("hunter2");

        assert_eq!(format!("{:?}", secret), "SecretValue(\"******\")");
        assert_eq!(secret.to_string(), "******");
        assert_eq!(secret.reveal(), "hunter2");
    }

    #[test]
    fn display_value_redacts_secrets_and_summarizes_bytes() {
        assert_eq!(
            MetricValue::Secret(SecretValue::new("pk")).display_value(),
            "******"
        );
        assert_eq!(
            MetricValue::Bytes(vec![1, 2, 3]).display_value(),
            "<3 bytes>"
        );
    }
}
