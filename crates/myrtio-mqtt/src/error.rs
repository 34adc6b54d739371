//! Error types of the MQTT client

use core::fmt;

use crate::packet::PacketError;

/// Error returned by [`MqttClient`](crate::client::MqttClient) operations
#[derive(Debug, PartialEq, Eq)]
pub enum MqttError<E> {
    /// The underlying transport failed
    Transport(E),
    /// The broker rejected the CONNECT with the given return code
    ConnectionRefused(u8),
    /// The broker rejected a subscription
    SubscriptionRefused,
    /// The peer closed the stream
    ConnectionClosed,
    /// An unexpected or malformed packet was received
    Protocol,
    /// A packet did not fit the client buffers
    BufferTooSmall,
    /// Subscription limit reached
    TooManyTopics,
}

impl<E: fmt::Debug> fmt::Display for MqttError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MqttError::Transport(e) => write!(f, "transport error: {:?}", e),
            MqttError::ConnectionRefused(code) => write!(f, "connection refused (code {})", code),
            MqttError::SubscriptionRefused => write!(f, "subscription refused"),
            MqttError::ConnectionClosed => write!(f, "connection closed"),
            MqttError::Protocol => write!(f, "protocol error"),
            MqttError::BufferTooSmall => write!(f, "buffer too small"),
            MqttError::TooManyTopics => write!(f, "too many topics"),
        }
    }
}

impl<E> From<PacketError> for MqttError<E> {
    fn from(e: PacketError) -> Self {
        match e {
            PacketError::BufferTooSmall => MqttError::BufferTooSmall,
            PacketError::Malformed => MqttError::Protocol,
        }
    }
}
