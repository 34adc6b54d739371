//! Faults that end a connection cycle

use core::fmt;

/// A failure caught by the supervisor. Every fault is retried.
#[derive(Debug, PartialEq, Eq)]
pub enum Fault<E> {
    /// Opening the channel failed
    Connect(E),
    /// Publishing discovery or status failed
    Publish(E),
    /// Subscribing to the command topic failed
    Subscribe(E),
    /// Polling for inbound messages failed
    Poll(E),
    /// The discovery payload did not fit its buffer
    Encode(myrtio_homeassistant::Error),
}

impl<E: fmt::Debug> fmt::Display for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Connect(e) => write!(f, "connect failed: {:?}", e),
            Fault::Publish(e) => write!(f, "publish failed: {:?}", e),
            Fault::Subscribe(e) => write!(f, "subscribe failed: {:?}", e),
            Fault::Poll(e) => write!(f, "poll failed: {:?}", e),
            Fault::Encode(e) => write!(f, "discovery encoding failed: {}", e),
        }
    }
}
