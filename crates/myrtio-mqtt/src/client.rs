//! MQTT client state machine

use core::ops::Range;

use embassy_time::{Duration, Instant};
use heapless::{String, Vec};

use crate::error::MqttError;
use crate::packet::{self, ConnectParams, Packet, PacketError, Publish, QoS};
use crate::transport::MqttTransport;

/// Longest topic filter the client remembers after subscribing
pub const MAX_TOPIC_LEN: usize = 128;

const SUBACK_FAILURE: u8 = 0x80;

/// Connection options
#[derive(Debug, Clone)]
pub struct MqttOptions<'a> {
    client_id: &'a str,
    keep_alive: Duration,
    clean_session: bool,
    username: Option<&'a str>,
    password: Option<&'a [u8]>,
}

impl<'a> MqttOptions<'a> {
    pub const fn new(client_id: &'a str) -> Self {
        Self {
            client_id,
            keep_alive: Duration::from_secs(60),
            clean_session: true,
            username: None,
            password: None,
        }
    }

    /// Interval after which an idle client sends PINGREQ. Zero disables pings.
    #[must_use]
    pub const fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    #[must_use]
    pub const fn with_credentials(mut self, username: &'a str, password: &'a [u8]) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    #[must_use]
    pub const fn with_clean_session(mut self, clean_session: bool) -> Self {
        self.clean_session = clean_session;
        self
    }

    pub fn client_id(&self) -> &'a str {
        self.client_id
    }

    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }
}

/// Something the broker sent, as reported by [`MqttClient::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MqttEvent<'a> {
    Publish(Publish<'a>),
    PubAck(u16),
    SubAck(u16),
    PingResp,
}

/// MQTT v3.1.1 client over a [`MqttTransport`]
///
/// `MAX_TOPICS` bounds the number of subscriptions, `BUF_SIZE` the size of
/// a single packet in either direction.
pub struct MqttClient<'a, T, const MAX_TOPICS: usize, const BUF_SIZE: usize> {
    transport: T,
    options: MqttOptions<'a>,
    tx_buf: [u8; BUF_SIZE],
    rx_buf: [u8; BUF_SIZE],
    rx_len: usize,
    rx_consumed: usize,
    /// Bytes of an oversized frame still to be discarded
    rx_skip: usize,
    next_packet_id: u16,
    last_sent: Instant,
    subscriptions: Vec<String<MAX_TOPIC_LEN>, MAX_TOPICS>,
}

impl<'a, T, const MAX_TOPICS: usize, const BUF_SIZE: usize> MqttClient<'a, T, MAX_TOPICS, BUF_SIZE>
where
    T: MqttTransport,
{
    pub fn new(transport: T, options: MqttOptions<'a>) -> Self {
        Self {
            transport,
            options,
            tx_buf: [0; BUF_SIZE],
            rx_buf: [0; BUF_SIZE],
            rx_len: 0,
            rx_consumed: 0,
            rx_skip: 0,
            next_packet_id: 1,
            last_sent: Instant::now(),
            subscriptions: Vec::new(),
        }
    }

    /// Send CONNECT and wait for the broker's CONNACK
    pub async fn connect(&mut self) -> Result<(), MqttError<T::Error>> {
        self.rx_len = 0;
        self.rx_consumed = 0;
        self.rx_skip = 0;
        self.subscriptions.clear();

        let keep_alive_secs = u16::try_from(self.options.keep_alive.as_secs()).unwrap_or(u16::MAX);
        let params = ConnectParams {
            client_id: self.options.client_id,
            keep_alive_secs,
            clean_session: self.options.clean_session,
            username: self.options.username,
            password: self.options.password,
        };
        let len = packet::encode_connect(&mut self.tx_buf, &params)?;
        self.send(len).await?;

        let (header, body) = self.read_frame().await?;
        match packet::decode(header, &self.rx_buf[body])? {
            Some(Packet::ConnAck { return_code: 0, .. }) => {
                crate::fmt::debug!("mqtt: connected as {}", self.options.client_id);
                Ok(())
            }
            Some(Packet::ConnAck { return_code, .. }) => {
                Err(MqttError::ConnectionRefused(return_code))
            }
            _ => Err(MqttError::Protocol),
        }
    }

    /// Publish a non-retained message
    pub async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
    ) -> Result<(), MqttError<T::Error>> {
        self.send_publish(topic, payload, qos, false).await
    }

    /// Publish a message the broker keeps for future subscribers
    pub async fn publish_retained(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
    ) -> Result<(), MqttError<T::Error>> {
        self.send_publish(topic, payload, qos, true).await
    }

    /// Subscribe to `topic` and wait for the SUBACK.
    ///
    /// Messages that arrive before the SUBACK are dropped.
    pub async fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), MqttError<T::Error>> {
        let known = self.subscriptions.iter().any(|t| t.as_str() == topic);
        if !known && self.subscriptions.is_full() {
            return Err(MqttError::TooManyTopics);
        }
        let mut owned = String::new();
        owned
            .push_str(topic)
            .map_err(|()| MqttError::BufferTooSmall)?;

        let packet_id = self.next_packet_id();
        let len = packet::encode_subscribe(&mut self.tx_buf, packet_id, topic, qos)?;
        self.send(len).await?;

        loop {
            let (header, body) = self.read_frame().await?;
            if let Some(Packet::SubAck {
                packet_id: acked,
                granted,
            }) = packet::decode(header, &self.rx_buf[body])?
            {
                if acked != packet_id {
                    continue;
                }
                if granted == SUBACK_FAILURE {
                    return Err(MqttError::SubscriptionRefused);
                }
                break;
            }
        }

        if !known {
            self.subscriptions
                .push(owned)
                .map_err(|_| MqttError::TooManyTopics)?;
        }
        crate::fmt::debug!("mqtt: subscribed to {}", topic);
        Ok(())
    }

    /// Drive the connection without blocking on the network.
    ///
    /// Sends PINGREQ when the keep-alive interval has passed, then returns
    /// the next inbound event if one is already available. Only bytes the
    /// transport reports as ready are read; a partial frame stays buffered
    /// for the next call. QoS 1 messages are acknowledged before they are
    /// returned. Frames larger than `BUF_SIZE` are discarded.
    pub async fn poll(&mut self) -> Result<Option<MqttEvent<'_>>, MqttError<T::Error>> {
        self.keep_alive().await?;

        let Some((header, body)) = self.next_frame(false).await? else {
            return Ok(None);
        };
        let Some(packet) = packet::decode(header, &self.rx_buf[body])? else {
            return Ok(None);
        };
        let event = match packet {
            Packet::Publish(publish) => {
                if let Some(packet_id) = publish.packet_id {
                    let len = packet::encode_puback(&mut self.tx_buf, packet_id)?;
                    self.transport
                        .send(&self.tx_buf[..len])
                        .await
                        .map_err(MqttError::Transport)?;
                    self.last_sent = Instant::now();
                }
                MqttEvent::Publish(publish)
            }
            Packet::PubAck(packet_id) => MqttEvent::PubAck(packet_id),
            Packet::SubAck { packet_id, .. } => MqttEvent::SubAck(packet_id),
            Packet::PingResp => MqttEvent::PingResp,
            Packet::ConnAck { .. } => {
                crate::fmt::warning!("mqtt: unexpected CONNACK");
                return Err(MqttError::Protocol);
            }
        };
        Ok(Some(event))
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
        self.subscriptions.iter().map(String::as_str)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    async fn send_publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), MqttError<T::Error>> {
        let packet_id = match qos {
            QoS::AtMostOnce => None,
            QoS::AtLeastOnce => Some(self.next_packet_id()),
        };
        let len = packet::encode_publish(&mut self.tx_buf, topic, payload, qos, retain, packet_id)?;
        self.send(len).await
    }

    async fn keep_alive(&mut self) -> Result<(), MqttError<T::Error>> {
        let interval = self.options.keep_alive;
        if interval.as_ticks() == 0 || self.last_sent.elapsed() < interval {
            return Ok(());
        }
        let len = packet::encode_pingreq(&mut self.tx_buf)?;
        self.send(len).await
    }

    async fn send(&mut self, len: usize) -> Result<(), MqttError<T::Error>> {
        self.transport
            .send(&self.tx_buf[..len])
            .await
            .map_err(MqttError::Transport)?;
        self.last_sent = Instant::now();
        Ok(())
    }

    fn next_packet_id(&mut self) -> u16 {
        let id = self.next_packet_id;
        self.next_packet_id = self.next_packet_id.checked_add(1).unwrap_or(1);
        id
    }

    /// Drop the bytes of the previously returned frame
    fn compact(&mut self) {
        if self.rx_consumed > 0 {
            self.rx_buf.copy_within(self.rx_consumed..self.rx_len, 0);
            self.rx_len -= self.rx_consumed;
            self.rx_consumed = 0;
        }
    }

    /// Discard buffered bytes that belong to an oversized frame
    fn skip_oversized(&mut self) {
        if self.rx_skip == 0 {
            return;
        }
        let n = self.rx_skip.min(self.rx_len);
        self.rx_buf.copy_within(n..self.rx_len, 0);
        self.rx_len -= n;
        self.rx_skip -= n;
    }

    /// Inspect the frame at the buffer start
    fn frame_at_start(&self) -> Result<Frame, PacketError> {
        let bytes = &self.rx_buf[..self.rx_len];
        if bytes.len() < 2 {
            return Ok(Frame::Incomplete);
        }
        let Some((remaining, len_bytes)) = packet::decode_remaining_length(&bytes[1..])? else {
            return Ok(Frame::Incomplete);
        };
        let body_start = 1 + len_bytes;
        let total = body_start + remaining;
        if total > BUF_SIZE {
            return Ok(Frame::Oversized(total));
        }
        if bytes.len() < total {
            return Ok(Frame::Incomplete);
        }
        Ok(Frame::Complete {
            body: body_start..total,
            total,
        })
    }

    /// Next complete frame as its header byte and body range.
    ///
    /// With `wait` unset, returns `None` as soon as the transport has no
    /// bytes ready.
    async fn next_frame(
        &mut self,
        wait: bool,
    ) -> Result<Option<(u8, Range<usize>)>, MqttError<T::Error>> {
        self.compact();
        loop {
            self.skip_oversized();
            match self.frame_at_start()? {
                Frame::Complete { body, total } => {
                    self.rx_consumed = total;
                    return Ok(Some((self.rx_buf[0], body)));
                }
                Frame::Oversized(total) => {
                    crate::fmt::warning!("mqtt: dropping {} byte packet", total);
                    self.rx_skip = total;
                    continue;
                }
                Frame::Incomplete => {}
            }
            if !wait && !self.transport.recv_ready().map_err(MqttError::Transport)? {
                return Ok(None);
            }
            let n = self
                .transport
                .recv(&mut self.rx_buf[self.rx_len..])
                .await
                .map_err(MqttError::Transport)?;
            if n == 0 {
                return Err(MqttError::ConnectionClosed);
            }
            self.rx_len += n;
        }
    }

    /// Wait for one complete frame
    async fn read_frame(&mut self) -> Result<(u8, Range<usize>), MqttError<T::Error>> {
        match self.next_frame(true).await? {
            Some(frame) => Ok(frame),
            None => Err(MqttError::ConnectionClosed),
        }
    }
}

/// State of the bytes at the start of the receive buffer
enum Frame {
    Complete { body: Range<usize>, total: usize },
    Oversized(usize),
    Incomplete,
}
