//! # Async MQTT client for embedded systems
//!
//! A `no_std`, allocation-free MQTT v3.1.1 client built on the Embassy
//! async ecosystem. Buffers are fixed-size arrays and `heapless`
//! collections, sized through const generics.
//!
//! - QoS 0 and QoS 1 publishing, retained messages
//! - Subscriptions acknowledged before [`MqttClient::subscribe`] returns
//! - Non-blocking [`MqttClient::poll`] that sends keep-alive pings and
//!   acknowledges inbound QoS 1 messages
//! - Any ordered byte stream via [`MqttTransport`]; [`IoTransport`] wraps
//!   `embedded-io-async` streams such as `embassy-net` TCP sockets
//!
//! ```no_run
//! # use embassy_time::Duration;
//! # use myrtio_mqtt::{MqttClient, MqttEvent, MqttOptions, QoS};
//! # use myrtio_mqtt::transport::MqttTransport;
//! # async fn run<T: MqttTransport>(transport: T) -> Result<(), myrtio_mqtt::MqttError<T::Error>> {
//! let options = MqttOptions::new("device-01").with_keep_alive(Duration::from_secs(15));
//! let mut client = MqttClient::<_, 4, 512>::new(transport, options);
//!
//! client.connect().await?;
//! client.subscribe("device/set", QoS::AtMostOnce).await?;
//! client.publish("device/state", b"ON", QoS::AtMostOnce).await?;
//!
//! loop {
//!     if let Some(MqttEvent::Publish(msg)) = client.poll().await? {
//!         let _ = (msg.topic, msg.payload);
//!     }
//! }
//! # }
//! ```

#![no_std]

mod fmt;

pub mod client;
pub mod error;
pub mod packet;
pub mod transport;

pub use client::{MqttClient, MqttEvent, MqttOptions};
pub use error::MqttError;
pub use packet::{Publish, QoS};
pub use transport::{IoTransport, IoTransportError, MqttTransport, TransportError};
