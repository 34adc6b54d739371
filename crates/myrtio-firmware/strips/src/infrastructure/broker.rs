//! Broker connection over an embassy-net TCP socket

use embassy_net::{Stack, tcp};
use embassy_time::Duration;
use myrtio_mqtt::{IoTransport, IoTransportError, MqttClient, MqttError, MqttOptions, QoS};
use myrtio_strips::{Connector, InboundMessage, MessageChannel, MqttChannel};

use crate::config;
use crate::infrastructure::drivers::resolve_host;

const TCP_BUF_SIZE: usize = 1024;
const MQTT_MAX_TOPICS: usize = 2;
const MQTT_BUF_SIZE: usize = 512;

const SOCKET_TIMEOUT: Duration = Duration::from_secs(60);
const IO_TIMEOUT: Duration = Duration::from_secs(30);

type Transport<'c> = IoTransport<tcp::TcpSocket<'c>>;

#[derive(Debug)]
pub(crate) enum BrokerError {
    Resolve,
    Tcp(tcp::ConnectError),
    Mqtt(MqttError<IoTransportError<tcp::Error>>),
}

/// Opens a fresh TCP socket and MQTT session for every attempt
pub(crate) struct TcpConnector {
    stack: Stack<'static>,
    options: MqttOptions<'static>,
    rx_buffer: [u8; TCP_BUF_SIZE],
    tx_buffer: [u8; TCP_BUF_SIZE],
}

impl TcpConnector {
    pub(crate) fn new(stack: Stack<'static>, client_id: &'static str) -> Self {
        let mut options = MqttOptions::new(client_id)
            .with_keep_alive(Duration::from_secs(config::MQTT_KEEP_ALIVE_SECS));
        if let (Some(username), Some(password)) = (config::MQTT_USERNAME, config::MQTT_PASSWORD) {
            options = options.with_credentials(username, password.as_bytes());
        }

        Self {
            stack,
            options,
            rx_buffer: [0; TCP_BUF_SIZE],
            tx_buffer: [0; TCP_BUF_SIZE],
        }
    }
}

impl Connector for TcpConnector {
    type Error = BrokerError;
    type Channel<'c>
        = BrokerChannel<'c>
    where
        Self: 'c;

    async fn connect(&mut self) -> Result<Self::Channel<'_>, Self::Error> {
        let address = resolve_host(self.stack, config::MQTT_HOST)
            .await
            .ok_or(BrokerError::Resolve)?;

        let mut socket = tcp::TcpSocket::new(self.stack, &mut self.rx_buffer, &mut self.tx_buffer);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        log::info!("mqtt: connecting to {}:{}", address, config::MQTT_PORT);
        socket
            .connect((address, config::MQTT_PORT))
            .await
            .map_err(BrokerError::Tcp)?;

        let transport = IoTransport::new(socket, IO_TIMEOUT);
        let mut client = MqttClient::new(transport, self.options.clone());
        client.connect().await.map_err(BrokerError::Mqtt)?;
        log::info!("mqtt: session established");

        Ok(BrokerChannel(MqttChannel::new(client)))
    }
}

/// [`MqttChannel`] with errors lifted into [`BrokerError`]
pub(crate) struct BrokerChannel<'c>(
    MqttChannel<'static, Transport<'c>, MQTT_MAX_TOPICS, MQTT_BUF_SIZE>,
);

impl MessageChannel for BrokerChannel<'_> {
    type Error = BrokerError;

    async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), Self::Error> {
        self.0
            .publish(topic, payload, qos, retain)
            .await
            .map_err(BrokerError::Mqtt)
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error> {
        self.0.subscribe(topic).await.map_err(BrokerError::Mqtt)
    }

    async fn poll(&mut self) -> Result<Option<InboundMessage>, Self::Error> {
        self.0.poll().await.map_err(BrokerError::Mqtt)
    }
}
