//! MQTT transport adapter for the device call engine.
//!
//! One broker session carries both directions: [`transport::MqttDeviceTransport`]
//! publishes outbound wire messages, [`dispatcher::run_inbound_dispatcher`]
//! drives the event loop and feeds replies and lifecycle events back in.

pub mod config;
pub mod dispatcher;
pub mod transport;

pub use config::MqttTransportConfig;
pub use dispatcher::{run_inbound_dispatcher, subscription_filters};
pub use transport::{connect, MqttDeviceTransport};
