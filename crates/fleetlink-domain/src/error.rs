use crate::correlation::CorrelationKey;
use std::time::Duration;
use thiserror::Error;

/// Device-side rejection of an otherwise well-formed request.
///
/// Carries the exception message reported by the device agent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceRejection {
    #[error("device rejected request as bad request: {0}")]
    BadRequest(String),

    #[error("device could not find the target resource: {0}")]
    NotFound(String),

    #[error("device internal error: {0}")]
    InternalError(String),

    #[error("device returned unknown response code {code}: {message}")]
    UnknownCode { code: u32, message: String },
}

#[derive(Error, Debug)]
pub enum CallError {
    #[error("transport send failure: {0}")]
    TransportSendFailure(String),

    #[error("no response received within {0:?}")]
    ResponseTimeout(Duration),

    #[error("call cancelled")]
    Cancelled,

    #[error("correlation key already in flight: {0}")]
    DuplicateCorrelationKey(CorrelationKey),

    #[error(transparent)]
    DeviceRejected(#[from] DeviceRejection),

    #[error("channel translation error: {0}")]
    ChannelTranslation(String),

    #[error("content translation failure for schema {schema}: {reason} ({} raw bytes)", raw.len())]
    ContentTranslation {
        schema: String,
        reason: String,
        raw: Vec<u8>,
    },

    #[error("result extraction failed: {0}")]
    ContentExtraction(String),

    #[error("management operation not found: {0}")]
    OperationNotFound(String),

    #[error("management operation already closed: {0}")]
    AlreadyClosed(String),

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("device not connected: {0}")]
    DeviceNotConnected(String),

    #[error("repository error: {0}")]
    Repository(#[from] anyhow::Error),
}

pub type CallResult<T> = Result<T, CallError>;
