//! Message channel port
//!
//! The supervisor talks to the broker through [`Connector`] and
//! [`MessageChannel`]. [`MqttChannel`] implements the channel over a
//! connected [`MqttClient`].

use core::fmt::Debug;

use heapless::{String, Vec};
use myrtio_mqtt::{MqttClient, MqttError, MqttEvent, MqttTransport, QoS};

use crate::command::MAX_PAYLOAD_LEN;

/// Longest topic an inbound message may carry
pub const MAX_TOPIC_LEN: usize = 128;

/// A message received on a subscribed topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String<MAX_TOPIC_LEN>,
    /// Payload, truncated to [`MAX_PAYLOAD_LEN`] bytes
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl InboundMessage {
    /// Copy a message into owned storage.
    ///
    /// Returns `None` when the topic is longer than [`MAX_TOPIC_LEN`].
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let mut owned_topic = String::new();
        owned_topic.push_str(topic).ok()?;
        let kept = &payload[..payload.len().min(MAX_PAYLOAD_LEN)];
        Some(Self {
            topic: owned_topic,
            payload: Vec::from_slice(kept).ok()?,
        })
    }
}

/// A connected publish/subscribe session
#[allow(async_fn_in_trait)]
pub trait MessageChannel {
    type Error: Debug;

    async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), Self::Error>;

    async fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error>;

    /// Next inbound message, if one is available without waiting
    async fn poll(&mut self) -> Result<Option<InboundMessage>, Self::Error>;
}

/// Opens a new [`MessageChannel`] for each connection attempt
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Error: Debug;
    type Channel<'c>: MessageChannel<Error = Self::Error>
    where
        Self: 'c;

    async fn connect(&mut self) -> Result<Self::Channel<'_>, Self::Error>;
}

/// [`MessageChannel`] over a connected MQTT client
pub struct MqttChannel<'a, T, const MAX_TOPICS: usize, const BUF_SIZE: usize> {
    client: MqttClient<'a, T, MAX_TOPICS, BUF_SIZE>,
}

impl<'a, T, const MAX_TOPICS: usize, const BUF_SIZE: usize> MqttChannel<'a, T, MAX_TOPICS, BUF_SIZE>
where
    T: MqttTransport,
{
    /// Wrap a client that has completed [`MqttClient::connect`]
    pub fn new(client: MqttClient<'a, T, MAX_TOPICS, BUF_SIZE>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &MqttClient<'a, T, MAX_TOPICS, BUF_SIZE> {
        &self.client
    }
}

impl<T, const MAX_TOPICS: usize, const BUF_SIZE: usize> MessageChannel
    for MqttChannel<'_, T, MAX_TOPICS, BUF_SIZE>
where
    T: MqttTransport,
{
    type Error = MqttError<T::Error>;

    async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), Self::Error> {
        if retain {
            self.client.publish_retained(topic, payload, qos).await
        } else {
            self.client.publish(topic, payload, qos).await
        }
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error> {
        self.client.subscribe(topic, QoS::AtMostOnce).await
    }

    async fn poll(&mut self) -> Result<Option<InboundMessage>, Self::Error> {
        match self.client.poll().await? {
            Some(MqttEvent::Publish(msg)) => {
                let message = InboundMessage::new(msg.topic, msg.payload);
                if message.is_none() {
                    log::warn!("mqtt: dropping message on oversized topic");
                }
                Ok(message)
            }
            _ => Ok(None),
        }
    }
}
