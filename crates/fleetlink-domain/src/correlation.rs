use crate::error::{CallError, CallResult};
use crate::response::ResponseMessage;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::debug;

/// Identity of one outstanding call: (scope, device, request id).
///
/// Request ids are generated fresh per request, so a key is never reused
/// while a call with that key is pending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationKey {
    pub scope_id: String,
    pub device_id: String,
    pub request_id: String,
}

impl CorrelationKey {
    pub fn new(
        scope_id: impl Into<String>,
        device_id: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            scope_id: scope_id.into(),
            device_id: device_id.into(),
            request_id: request_id.into(),
        }
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.scope_id, self.device_id, self.request_id
        )
    }
}

/// Receiving end of a registered call slot; resolves when the matching
/// response is dispatched.
pub type CallSlot = oneshot::Receiver<ResponseMessage>;

/// Thread-safe map of in-flight calls.
///
/// `complete` consumes the slot entry on match, so a given key resolves at
/// most once; `remove` stays idempotent and is invoked by the call engine on
/// every exit path, keeping the map bounded by the number of pending calls.
#[derive(Clone, Default)]
pub struct CorrelationRegistry {
    slots: Arc<Mutex<HashMap<CorrelationKey, oneshot::Sender<ResponseMessage>>>>,
}

impl CorrelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new in-flight call.
    ///
    /// Fails with `DuplicateCorrelationKey` if a slot already exists for `key`.
    pub async fn register(&self, key: CorrelationKey) -> CallResult<CallSlot> {
        let mut slots = self.slots.lock().await;
        if slots.contains_key(&key) {
            return Err(CallError::DuplicateCorrelationKey(key));
        }

        let (tx, rx) = oneshot::channel();
        let _ = slots.insert(key, tx);
        Ok(rx)
    }

    /// Resolve the slot registered for `key` with `response`.
    ///
    /// Returns false if no slot exists (late, duplicate or already timed-out
    /// response); such responses are discarded, never surfaced to a caller.
    pub async fn complete(&self, key: &CorrelationKey, response: ResponseMessage) -> bool {
        let sender = {
            let mut slots = self.slots.lock().await;
            slots.remove(key)
        };

        match sender {
            Some(tx) => {
                // The receiver may have been dropped between removal and send
                // (timeout raced the response); that counts as unmatched.
                tx.send(response).is_ok()
            }
            None => {
                debug!(correlation_key = %key, "no pending slot for response");
                false
            }
        }
    }

    /// Drop the slot for `key`, if any. Idempotent.
    pub async fn remove(&self, key: &CorrelationKey) {
        let mut slots = self.slots.lock().await;
        let _ = slots.remove(key);
    }

    /// Number of in-flight calls.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }
}
