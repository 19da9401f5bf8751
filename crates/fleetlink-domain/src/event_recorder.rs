use crate::device_event::DeviceEvent;
use crate::error::CallResult;
use crate::repository::DeviceEventRepository;
use crate::response::ResponseMessage;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Writes one audit record per completed call attempt, success or failure.
pub struct DeviceEventRecorder {
    repository: Arc<dyn DeviceEventRepository>,
}

impl DeviceEventRecorder {
    pub fn new(repository: Arc<dyn DeviceEventRepository>) -> Self {
        Self { repository }
    }

    /// Record the outcome of one call attempt.
    ///
    /// With a response, the event carries its code and exception message;
    /// without one, the event carries no code (the SENT disposition).
    pub async fn record(
        &self,
        scope_id: &str,
        device_id: &str,
        action: &str,
        response: Option<&ResponseMessage>,
    ) -> CallResult<()> {
        let event = DeviceEvent {
            scope_id: scope_id.to_string(),
            device_id: device_id.to_string(),
            occurred_on: response
                .and_then(|r| r.message.received_on)
                .unwrap_or_else(Utc::now),
            action: action.to_string(),
            response_code: response.map(|r| r.response_code),
            message: response
                .and_then(|r| r.exception_message.clone())
                .unwrap_or_default(),
        };

        self.repository.create(event).await?;
        debug!(
            scope_id = %scope_id,
            device_id = %device_id,
            action = %action,
            "recorded device event"
        );
        Ok(())
    }
}
