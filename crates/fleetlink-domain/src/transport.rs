use crate::error::CallResult;
use async_trait::async_trait;

/// Outbound half of the pub/sub transport.
///
/// The broker and its delivery guarantees are external; implementations
/// (e.g. fleetlink-mqtt) map their library errors to
/// `CallError::TransportSendFailure` so callers never see a raw transport
/// exception.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Publish `payload` under `topic`.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> CallResult<()>;
}
