use crate::classifier::classify;
use crate::error::{CallError, CallResult};
use crate::operation::{InputProperty, ManagementOperation, OperationStatus};
use crate::repository::OperationRepository;
use crate::request::RequestMessage;
use crate::response::ResponseMessage;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Opens and closes the durable record describing a long-running device
/// operation.
///
/// Repository writes happen in their own short calls taken before/after the
/// network wait, never spanning it.
pub struct OperationLifecycleService {
    repository: Arc<dyn OperationRepository>,
}

impl OperationLifecycleService {
    pub fn new(repository: Arc<dyn OperationRepository>) -> Self {
        Self { repository }
    }

    /// Create a `Running` operation record for `request`, returning the
    /// generated operation id.
    ///
    /// App id, action and resource come from the request channel; input
    /// properties are stringified from the payload metrics (secrets stay
    /// redacted).
    pub async fn open(
        &self,
        scope_id: &str,
        device_id: &str,
        request: &RequestMessage,
    ) -> CallResult<String> {
        let channel = &request.message.channel;
        let operation_id = Uuid::new_v4().to_string();

        let input_properties = request
            .message
            .payload
            .metrics()
            .map(|(name, value)| InputProperty {
                name: name.clone(),
                property_type: value.type_name().to_string(),
                value: value.display_value(),
            })
            .collect();

        let operation = ManagementOperation {
            id: None,
            scope_id: scope_id.to_string(),
            device_id: device_id.to_string(),
            operation_id: operation_id.clone(),
            app_id: channel.app_name.clone(),
            action: channel.method.to_string(),
            resource: channel.resource_path(),
            started_on: Utc::now(),
            ended_on: None,
            status: OperationStatus::Running,
            input_properties,
        };

        let storage_id = self.repository.create(operation).await?;
        info!(
            scope_id = %scope_id,
            device_id = %device_id,
            operation_id = %operation_id,
            storage_id = %storage_id,
            "opened management operation"
        );
        Ok(operation_id)
    }

    /// Close the operation identified by `operation_id`.
    ///
    /// `Completed` iff a response is present and classified accepted, else
    /// `Failed`; `ended_on` is the response's received-on timestamp when
    /// available, now otherwise. A second close is rejected with
    /// `AlreadyClosed` and leaves the record untouched.
    pub async fn close(
        &self,
        scope_id: &str,
        device_id: &str,
        operation_id: &str,
        response: Option<&ResponseMessage>,
    ) -> CallResult<()> {
        let mut operation = self
            .repository
            .find_by_id(scope_id, operation_id)
            .await?
            .ok_or_else(|| CallError::OperationNotFound(operation_id.to_string()))?;

        if operation.status.is_terminal() {
            return Err(CallError::AlreadyClosed(operation_id.to_string()));
        }

        operation.status = match response {
            Some(response) if classify(response).is_ok() => OperationStatus::Completed,
            _ => OperationStatus::Failed,
        };
        operation.ended_on = Some(
            response
                .and_then(|r| r.message.received_on)
                .unwrap_or_else(Utc::now),
        );

        let status = operation.status;
        self.repository.update(operation).await?;
        debug!(
            scope_id = %scope_id,
            device_id = %device_id,
            operation_id = %operation_id,
            status = ?status,
            "closed management operation"
        );
        Ok(())
    }
}
