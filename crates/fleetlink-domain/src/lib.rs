//! Device management call/response protocol core.
//!
//! Canonical message model, the correlation engine that turns a
//! topic-addressed publish into a synchronous-looking call with timeout,
//! response classification, and the operation/audit bookkeeping contract.
//! Transport, translation and persistence are trait seams implemented by the
//! sibling crates and the surrounding platform.

pub mod call_engine;
pub mod channel;
pub mod classifier;
pub mod config;
pub mod correlation;
pub mod device;
pub mod device_command_service;
pub mod device_event;
pub mod error;
pub mod event_recorder;
pub mod message;
pub mod operation;
pub mod operation_service;
pub mod payload;
pub mod repository;
pub mod request;
pub mod response;
pub mod translator;
pub mod transport;

pub use call_engine::DeviceCallService;
pub use channel::{Channel, Method};
pub use classifier::{classify, classify_with};
pub use config::DeviceCallConfig;
pub use correlation::{CallSlot, CorrelationKey, CorrelationRegistry};
pub use device::Device;
pub use device_command_service::DeviceCommandService;
pub use device_event::DeviceEvent;
pub use error::{CallError, CallResult, DeviceRejection};
pub use event_recorder::DeviceEventRecorder;
pub use message::{Message, Position};
pub use operation::{InputProperty, ManagementOperation, OperationStatus};
pub use operation_service::OperationLifecycleService;
pub use payload::{MetricValue, Payload, SecretValue};
pub use repository::{DeviceEventRepository, DeviceRegistry, OperationRepository};
pub use request::RequestMessage;
pub use response::{ResponseCode, ResponseMessage};
pub use translator::{InboundMessage, ProtocolTranslator, WireMessage};
pub use transport::DeviceTransport;

#[cfg(feature = "testing")]
pub use repository::{MockDeviceEventRepository, MockDeviceRegistry, MockOperationRepository};
#[cfg(feature = "testing")]
pub use translator::MockProtocolTranslator;
#[cfg(feature = "testing")]
pub use transport::MockDeviceTransport;
