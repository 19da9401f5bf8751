use crate::response::ResponseCode;
use chrono::{DateTime, Utc};

/// Audit record of one completed call attempt. Created once, never updated.
///
/// `response_code` is `None` when no response was received (the request was
/// only sent); recorded as the SENT disposition.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEvent {
    pub scope_id: String,
    pub device_id: String,
    pub occurred_on: DateTime<Utc>,
    pub action: String,
    pub response_code: Option<ResponseCode>,
    pub message: String,
}
