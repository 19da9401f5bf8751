use chrono::{DateTime, Utc};

/// Lifecycle state of a management operation. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Running,
    Completed,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Completed | OperationStatus::Failed)
    }
}

/// One request input, stringified for the durable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputProperty {
    pub name: String,
    pub property_type: String,
    pub value: String,
}

/// Durable record tracking a long-running device command's lifecycle.
///
/// Created at call start with status `Running`; mutated exactly once at
/// close, when the status becomes terminal and `ended_on` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagementOperation {
    /// Storage id, assigned by the repository on create.
    pub id: Option<String>,
    pub scope_id: String,
    pub device_id: String,
    pub operation_id: String,
    pub app_id: String,
    pub action: String,
    pub resource: String,
    pub started_on: DateTime<Utc>,
    pub ended_on: Option<DateTime<Utc>>,
    pub status: OperationStatus,
    pub input_properties: Vec<InputProperty>,
}
