//! Transport abstraction
//!
//! The client runs over any reliable, ordered byte stream. [`IoTransport`]
//! adapts anything implementing the `embedded-io-async` traits, such as an
//! `embassy-net` TCP socket.

use core::fmt::Debug;

use embassy_time::{Duration, with_timeout};
use embedded_io_async::{Read, ReadReady, Write};

/// Marker for transport error types
pub trait TransportError: Debug {}

/// Byte stream the MQTT client talks over
#[allow(async_fn_in_trait)]
pub trait MqttTransport {
    type Error: TransportError;

    /// Write the whole buffer
    async fn send(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Read at least one byte into `buf`. `Ok(0)` means the peer closed the stream.
    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Whether `recv` would complete without waiting
    fn recv_ready(&mut self) -> Result<bool, Self::Error>;
}

/// Error of an [`IoTransport`]
#[derive(Debug, PartialEq, Eq)]
pub enum IoTransportError<E> {
    Io(E),
    Timeout,
}

impl<E: Debug> TransportError for IoTransportError<E> {}

/// Transport over an `embedded-io-async` stream with an I/O timeout
pub struct IoTransport<S> {
    stream: S,
    timeout: Duration,
}

impl<S> IoTransport<S> {
    pub fn new(stream: S, timeout: Duration) -> Self {
        Self { stream, timeout }
    }

    /// Give the stream back, e.g. to close or abort it
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write + ReadReady> MqttTransport for IoTransport<S> {
    type Error = IoTransportError<<S as embedded_io_async::ErrorType>::Error>;

    async fn send(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        with_timeout(self.timeout, self.stream.write_all(buf))
            .await
            .map_err(|_| IoTransportError::Timeout)?
            .map_err(IoTransportError::Io)?;
        with_timeout(self.timeout, self.stream.flush())
            .await
            .map_err(|_| IoTransportError::Timeout)?
            .map_err(IoTransportError::Io)
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        with_timeout(self.timeout, self.stream.read(buf))
            .await
            .map_err(|_| IoTransportError::Timeout)?
            .map_err(IoTransportError::Io)
    }

    fn recv_ready(&mut self) -> Result<bool, Self::Error> {
        self.stream.read_ready().map_err(IoTransportError::Io)
    }
}
