use crate::device::Device;
use crate::device_event::DeviceEvent;
use crate::error::CallResult;
use crate::operation::ManagementOperation;
use async_trait::async_trait;

/// Repository for management operation records.
/// Infrastructure (e.g. a SQL store) implements this trait; writes are
/// short-lived and never span a network wait.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait OperationRepository: Send + Sync {
    /// Persist a new operation record, returning its storage id.
    async fn create(&self, operation: ManagementOperation) -> CallResult<String>;

    /// Load an operation by scope and operation id.
    async fn find_by_id(
        &self,
        scope_id: &str,
        operation_id: &str,
    ) -> CallResult<Option<ManagementOperation>>;

    /// Replace an existing operation record.
    async fn update(&self, operation: ManagementOperation) -> CallResult<()>;
}

/// Repository for device event audit records.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DeviceEventRepository: Send + Sync {
    async fn create(&self, event: DeviceEvent) -> CallResult<()>;
}

/// Read-side device registry, consulted for reachability before a call.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    async fn find(&self, scope_id: &str, device_id: &str) -> CallResult<Option<Device>>;
}
