use crate::call_engine::DeviceCallService;
use crate::error::{CallError, CallResult};
use crate::event_recorder::DeviceEventRecorder;
use crate::operation_service::OperationLifecycleService;
use crate::repository::DeviceRegistry;
use crate::request::RequestMessage;
use crate::response::ResponseMessage;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Orchestrates one management call end to end.
///
/// Flow:
/// 1. Check the device registry: the target must exist and be connected
/// 2. Open the management operation (own short repository write)
/// 3. Issue the call and await the response
/// 4. Close the operation and record the audit event around the outcome
///
/// Bookkeeping failures after the call are logged, not surfaced; they never
/// change an otherwise-successful call result.
pub struct DeviceCommandService {
    device_registry: Arc<dyn DeviceRegistry>,
    call_service: Arc<DeviceCallService>,
    operations: Arc<OperationLifecycleService>,
    events: Arc<DeviceEventRecorder>,
}

impl DeviceCommandService {
    pub fn new(
        device_registry: Arc<dyn DeviceRegistry>,
        call_service: Arc<DeviceCallService>,
        operations: Arc<OperationLifecycleService>,
        events: Arc<DeviceEventRecorder>,
    ) -> Self {
        Self {
            device_registry,
            call_service,
            operations,
            events,
        }
    }

    pub async fn execute(
        &self,
        request: RequestMessage,
        timeout: Option<Duration>,
    ) -> CallResult<ResponseMessage> {
        let scope_id = request.message.scope_id.clone();
        let device_id = request.message.device_id.clone();
        let action = request.message.channel.method.to_string();

        // 1. Reachability check
        let device = self
            .device_registry
            .find(&scope_id, &device_id)
            .await?
            .ok_or_else(|| CallError::DeviceNotFound(device_id.clone()))?;
        if !device.connected {
            return Err(CallError::DeviceNotConnected(device_id.clone()));
        }

        // 2. Open the operation before the wait
        let operation_id = self.operations.open(&scope_id, &device_id, &request).await?;

        // 3. Issue the call
        let result = self.call_service.call(&request, timeout).await;

        // 4. Bookkeeping after the wait, in its own short writes
        let response = result.as_ref().ok();
        if let Err(e) = self
            .operations
            .close(&scope_id, &device_id, &operation_id, response)
            .await
        {
            error!(
                scope_id = %scope_id,
                device_id = %device_id,
                operation_id = %operation_id,
                error = %e,
                "failed to close management operation"
            );
        }
        if let Err(e) = self
            .events
            .record(&scope_id, &device_id, &action, response)
            .await
        {
            error!(
                scope_id = %scope_id,
                device_id = %device_id,
                error = %e,
                "failed to record device event"
            );
        }

        match &result {
            Ok(response) => info!(
                scope_id = %scope_id,
                device_id = %device_id,
                operation_id = %operation_id,
                response_code = response.response_code.as_u32(),
                "device command completed"
            ),
            Err(e) => info!(
                scope_id = %scope_id,
                device_id = %device_id,
                operation_id = %operation_id,
                error = %e,
                "device command failed"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, Method};
    use crate::config::DeviceCallConfig;
    use crate::device::Device;
    use crate::device_event::DeviceEvent;
    use crate::message::Message;
    use crate::operation::{ManagementOperation, OperationStatus};
    use crate::payload::Payload;
    use crate::repository::{
        MockDeviceEventRepository, MockDeviceRegistry, MockOperationRepository,
    };
    use crate::response::ResponseCode;
    use crate::translator::{InboundMessage, MockProtocolTranslator, WireMessage};
    use crate::transport::MockDeviceTransport;
    use chrono::Utc;
    use tokio_util::sync::CancellationToken;

    fn test_request() -> RequestMessage {
        RequestMessage::new(
            "scope-1",
            "device-1",
            "client-1",
            Channel::new("CONF", "V1", Method::Read, vec!["snapshots".to_string()]),
            Payload::new(),
        )
    }

    fn test_device(connected: bool) -> Device {
        Device {
            scope_id: "scope-1".to_string(),
            device_id: "device-1".to_string(),
            client_id: "client-1".to_string(),
            display_name: "Test Device".to_string(),
            connected,
        }
    }

    fn response_for(request: &RequestMessage) -> ResponseMessage {
        ResponseMessage {
            message: Message {
                id: request.message.id.clone(),
                scope_id: "scope-1".to_string(),
                device_id: "device-1".to_string(),
                client_id: "client-1".to_string(),
                sent_on: Utc::now(),
                received_on: Some(Utc::now()),
                captured_on: None,
                position: None,
                channel: request.message.channel.clone(),
                payload: Payload::new(),
            },
            response_code: ResponseCode::Accepted,
            exception_message: None,
        }
    }

    fn running_operation() -> ManagementOperation {
        ManagementOperation {
            id: Some("storage-1".to_string()),
            scope_id: "scope-1".to_string(),
            device_id: "device-1".to_string(),
            operation_id: "op-1".to_string(),
            app_id: "CONF".to_string(),
            action: "READ".to_string(),
            resource: "snapshots".to_string(),
            started_on: Utc::now(),
            ended_on: None,
            status: OperationStatus::Running,
            input_properties: vec![],
        }
    }

    fn call_service(
        translator: MockProtocolTranslator,
        transport: MockDeviceTransport,
    ) -> Arc<DeviceCallService> {
        Arc::new(DeviceCallService::new(
            Arc::new(transport),
            Arc::new(translator),
            DeviceCallConfig::default(),
            CancellationToken::new(),
        ))
    }

    #[tokio::test]
    async fn execute_runs_full_flow_on_accepted_response() {
        // Arrange
        let request = test_request();
        let response = response_for(&request);

        let mut registry = MockDeviceRegistry::new();
        registry
            .expect_find()
            .withf(|scope, device| scope == "scope-1" && device == "device-1")
            .times(1)
            .return_once(|_, _| Ok(Some(test_device(true))));

        let mut op_repo = MockOperationRepository::new();
        op_repo
            .expect_create()
            .times(1)
            .return_once(|_| Ok("storage-1".to_string()));
        op_repo
            .expect_find_by_id()
            .times(1)
            .return_once(|_, _| Ok(Some(running_operation())));
        op_repo
            .expect_update()
            .withf(|op: &ManagementOperation| op.status == OperationStatus::Completed)
            .times(1)
            .return_once(|_| Ok(()));

        let mut event_repo = MockDeviceEventRepository::new();
        event_repo
            .expect_create()
            .withf(|event: &DeviceEvent| {
                event.action == "READ" && event.response_code == Some(ResponseCode::Accepted)
            })
            .times(1)
            .return_once(|_| Ok(()));

        let mut translator = MockProtocolTranslator::new();
        translator.expect_to_wire().times(1).return_once(|_| {
            Ok(WireMessage {
                topic: "$FLT/scope-1/client-1/CONF-V1/GET/snapshots".to_string(),
                payload: b"{}".to_vec(),
            })
        });
        let response_clone = response.clone();
        translator
            .expect_from_wire()
            .times(1)
            .return_once(move |_, _, _| Ok(InboundMessage::Response(response_clone)));

        let mut transport = MockDeviceTransport::new();
        transport.expect_publish().times(1).return_once(|_, _| Ok(()));

        let engine = call_service(translator, transport);
        let service = DeviceCommandService::new(
            Arc::new(registry),
            engine.clone(),
            Arc::new(OperationLifecycleService::new(Arc::new(op_repo))),
            Arc::new(DeviceEventRecorder::new(Arc::new(event_repo))),
        );

        // Act
        let task = tokio::spawn({
            let request = request.clone();
            async move { service.execute(request, Some(Duration::from_secs(2))).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        engine
            .handle_inbound("reply", b"{}", Utc::now())
            .await
            .unwrap();
        let result = task.await.unwrap();

        // Assert
        assert!(result.unwrap().response_code.is_accepted());
    }

    #[tokio::test]
    async fn execute_rejects_unknown_device() {
        // Arrange
        let mut registry = MockDeviceRegistry::new();
        registry.expect_find().times(1).return_once(|_, _| Ok(None));

        let service = DeviceCommandService::new(
            Arc::new(registry),
            call_service(MockProtocolTranslator::new(), MockDeviceTransport::new()),
            Arc::new(OperationLifecycleService::new(Arc::new(
                MockOperationRepository::new(),
            ))),
            Arc::new(DeviceEventRecorder::new(Arc::new(
                MockDeviceEventRepository::new(),
            ))),
        );

        // Act
        let result = service.execute(test_request(), None).await;

        // Assert
        assert!(matches!(result, Err(CallError::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn execute_rejects_disconnected_device() {
        // Arrange
        let mut registry = MockDeviceRegistry::new();
        registry
            .expect_find()
            .times(1)
            .return_once(|_, _| Ok(Some(test_device(false))));

        let service = DeviceCommandService::new(
            Arc::new(registry),
            call_service(MockProtocolTranslator::new(), MockDeviceTransport::new()),
            Arc::new(OperationLifecycleService::new(Arc::new(
                MockOperationRepository::new(),
            ))),
            Arc::new(DeviceEventRecorder::new(Arc::new(
                MockDeviceEventRepository::new(),
            ))),
        );

        // Act
        let result = service.execute(test_request(), None).await;

        // Assert
        assert!(matches!(result, Err(CallError::DeviceNotConnected(_))));
    }

    #[tokio::test]
    async fn timeout_still_closes_operation_and_records_sent_event() {
        // Arrange
        let request = test_request();

        let mut registry = MockDeviceRegistry::new();
        registry
            .expect_find()
            .times(1)
            .return_once(|_, _| Ok(Some(test_device(true))));

        let mut op_repo = MockOperationRepository::new();
        op_repo
            .expect_create()
            .times(1)
            .return_once(|_| Ok("storage-1".to_string()));
        op_repo
            .expect_find_by_id()
            .times(1)
            .return_once(|_, _| Ok(Some(running_operation())));
        op_repo
            .expect_update()
            .withf(|op: &ManagementOperation| op.status == OperationStatus::Failed)
            .times(1)
            .return_once(|_| Ok(()));

        let mut event_repo = MockDeviceEventRepository::new();
        event_repo
            .expect_create()
            .withf(|event: &DeviceEvent| event.response_code.is_none())
            .times(1)
            .return_once(|_| Ok(()));

        let mut translator = MockProtocolTranslator::new();
        translator.expect_to_wire().times(1).return_once(|_| {
            Ok(WireMessage {
                topic: "$FLT/scope-1/client-1/CONF-V1/GET/snapshots".to_string(),
                payload: b"{}".to_vec(),
            })
        });
        let mut transport = MockDeviceTransport::new();
        transport.expect_publish().times(1).return_once(|_, _| Ok(()));

        let service = DeviceCommandService::new(
            Arc::new(registry),
            call_service(translator, transport),
            Arc::new(OperationLifecycleService::new(Arc::new(op_repo))),
            Arc::new(DeviceEventRecorder::new(Arc::new(event_repo))),
        );

        // Act
        let result = service
            .execute(request, Some(Duration::from_millis(50)))
            .await;

        // Assert
        assert!(matches!(result, Err(CallError::ResponseTimeout(_))));
    }
}
