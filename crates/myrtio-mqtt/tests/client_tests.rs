use std::collections::VecDeque;

use embassy_futures::block_on;
use embassy_time::{Duration, Timer};
use myrtio_mqtt::{MqttClient, MqttError, MqttEvent, MqttOptions, MqttTransport, QoS, TransportError};

#[derive(Debug, PartialEq, Eq)]
struct MockError;

impl TransportError for MockError {}

/// Transport that replays scripted broker bytes and records what was sent
#[derive(Default)]
struct ScriptedTransport {
    inbound: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
}

impl ScriptedTransport {
    fn with_inbound(chunks: &[&[u8]]) -> Self {
        Self {
            inbound: chunks.iter().map(|c| c.to_vec()).collect(),
            sent: Vec::new(),
        }
    }

    fn push(&mut self, chunk: &[u8]) {
        self.inbound.push_back(chunk.to_vec());
    }
}

impl MqttTransport for ScriptedTransport {
    type Error = MockError;

    async fn send(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.sent.push(buf.to_vec());
        Ok(())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some(mut chunk) = self.inbound.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.inbound.push_front(chunk.split_off(n));
        }
        Ok(n)
    }

    fn recv_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.inbound.is_empty())
    }
}

const CONNACK_OK: &[u8] = &[0x20, 0x02, 0x00, 0x00];

fn client(transport: ScriptedTransport) -> MqttClient<'static, ScriptedTransport, 2, 128> {
    let options = MqttOptions::new("strips").with_keep_alive(Duration::from_secs(15));
    MqttClient::new(transport, options)
}

#[test]
fn connect_sends_connect_and_accepts_connack() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();

        let sent = &mqtt.transport().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0][0], 0x10);
        assert!(sent[0].ends_with(b"strips"));
    });
}

#[test]
fn connect_refused_reports_return_code() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[&[0x20, 0x02, 0x00, 0x05]]));
        assert_eq!(mqtt.connect().await, Err(MqttError::ConnectionRefused(5)));
    });
}

#[test]
fn connect_on_closed_stream_fails() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::default());
        assert_eq!(mqtt.connect().await, Err(MqttError::ConnectionClosed));
    });
}

#[test]
fn subscribe_waits_for_matching_suback() {
    block_on(async {
        // A stray publish arrives before the SUBACK and is dropped
        let mut mqtt = client(ScriptedTransport::with_inbound(&[
            CONNACK_OK,
            &[0x30, 0x05, 0x00, 0x01, b'x', b'O', b'N'],
            &[0x90, 0x03, 0x00, 0x01, 0x00],
        ]));
        mqtt.connect().await.unwrap();
        mqtt.subscribe("a/set", QoS::AtMostOnce).await.unwrap();

        assert_eq!(mqtt.subscriptions().collect::<Vec<_>>(), ["a/set"]);
        assert_eq!(mqtt.poll().await, Ok(None));
    });
}

#[test]
fn subscribe_failure_code_is_refused() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[
            CONNACK_OK,
            &[0x90, 0x03, 0x00, 0x01, 0x80],
        ]));
        mqtt.connect().await.unwrap();
        assert_eq!(
            mqtt.subscribe("a/set", QoS::AtMostOnce).await,
            Err(MqttError::SubscriptionRefused)
        );
    });
}

#[test]
fn subscription_limit_is_enforced() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[
            CONNACK_OK,
            &[0x90, 0x03, 0x00, 0x01, 0x00],
            &[0x90, 0x03, 0x00, 0x02, 0x00],
        ]));
        mqtt.connect().await.unwrap();
        mqtt.subscribe("a", QoS::AtMostOnce).await.unwrap();
        mqtt.subscribe("b", QoS::AtMostOnce).await.unwrap();
        assert_eq!(
            mqtt.subscribe("c", QoS::AtMostOnce).await,
            Err(MqttError::TooManyTopics)
        );
    });
}

#[test]
fn poll_without_data_returns_none() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();
        assert_eq!(mqtt.poll().await, Ok(None));
        assert_eq!(mqtt.transport().sent.len(), 1);
    });
}

#[test]
fn poll_reassembles_split_publish() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();
        mqtt.transport_mut().push(&[0x30, 0x08, 0x00, 0x03, b'a']);
        mqtt.transport_mut().push(&[b'/', b'b', b'O', b'F', b'F']);

        let Some(MqttEvent::Publish(msg)) = mqtt.poll().await.unwrap() else {
            panic!("expected a publish");
        };
        assert_eq!(msg.topic, "a/b");
        assert_eq!(msg.payload, b"OFF");
    });
}

#[test]
fn poll_returns_back_to_back_packets_in_order() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();
        mqtt.transport_mut().push(&[
            0x30, 0x05, 0x00, 0x01, b't', b'O', b'N', 0xD0, 0x00,
        ]);

        assert!(matches!(
            mqtt.poll().await,
            Ok(Some(MqttEvent::Publish(msg))) if msg.payload == b"ON"
        ));
        assert_eq!(mqtt.poll().await, Ok(Some(MqttEvent::PingResp)));
        assert_eq!(mqtt.poll().await, Ok(None));
    });
}

#[test]
fn qos1_publish_is_acknowledged() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();
        mqtt.transport_mut()
            .push(&[0x32, 0x06, 0x00, 0x01, b't', 0x00, 0x2A, b'X']);

        let event = mqtt.poll().await.unwrap();
        assert!(matches!(event, Some(MqttEvent::Publish(msg)) if msg.packet_id == Some(42)));
        assert_eq!(mqtt.transport().sent.last().unwrap(), &[0x40, 0x02, 0x00, 0x2A]);
    });
}

#[test]
fn retained_publish_sets_retain_flag() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();
        mqtt.publish_retained("cfg", b"{}", QoS::AtLeastOnce).await.unwrap();
        mqtt.publish("st", b"ON", QoS::AtMostOnce).await.unwrap();

        let sent = &mqtt.transport().sent;
        assert_eq!(sent[1][0], 0x33);
        assert_eq!(sent[2][0], 0x30);
    });
}

#[test]
fn idle_client_sends_pingreq() {
    block_on(async {
        let options = MqttOptions::new("strips").with_keep_alive(Duration::from_millis(20));
        let mut mqtt: MqttClient<'_, _, 2, 128> =
            MqttClient::new(ScriptedTransport::with_inbound(&[CONNACK_OK]), options);
        mqtt.connect().await.unwrap();

        Timer::after(Duration::from_millis(30)).await;
        assert_eq!(mqtt.poll().await, Ok(None));
        assert_eq!(mqtt.transport().sent.last().unwrap(), &[0xC0, 0x00]);
    });
}

/// PUBLISH on topic `t` with `payload_len` filler bytes
fn large_publish(payload_len: usize) -> Vec<u8> {
    let remaining = 3 + payload_len;
    assert!((128..16_384).contains(&remaining));
    let mut frame = vec![
        0x30,
        u8::try_from(remaining % 128).unwrap() | 0x80,
        u8::try_from(remaining / 128).unwrap(),
        0x00,
        0x01,
        b't',
    ];
    frame.resize(frame.len() + payload_len, b'x');
    frame
}

#[test]
fn oversized_packet_is_skipped() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();
        mqtt.transport_mut().push(&large_publish(300));
        mqtt.transport_mut()
            .push(&[0x30, 0x05, 0x00, 0x01, b't', b'O', b'N']);

        assert!(matches!(
            mqtt.poll().await,
            Ok(Some(MqttEvent::Publish(msg))) if msg.payload == b"ON"
        ));
        assert_eq!(mqtt.poll().await, Ok(None));
    });
}

#[test]
fn oversized_packet_is_skipped_across_polls() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();
        let frame = large_publish(200);
        let (head, tail) = frame.split_at(150);

        mqtt.transport_mut().push(head);
        assert_eq!(mqtt.poll().await, Ok(None));

        mqtt.transport_mut().push(tail);
        mqtt.transport_mut().push(&[0xD0, 0x00]);
        assert_eq!(mqtt.poll().await, Ok(Some(MqttEvent::PingResp)));
    });
}

#[test]
fn partial_frame_does_not_block_poll() {
    block_on(async {
        let mut mqtt = client(ScriptedTransport::with_inbound(&[CONNACK_OK]));
        mqtt.connect().await.unwrap();

        mqtt.transport_mut().push(&[0x30, 0x06, 0x00, 0x01]);
        assert_eq!(mqtt.poll().await, Ok(None));
        assert!(mqtt.transport().inbound.is_empty());

        mqtt.transport_mut().push(&[b't', b'O', b'F', b'F']);
        let Some(MqttEvent::Publish(msg)) = mqtt.poll().await.unwrap() else {
            panic!("expected a publish");
        };
        assert_eq!(msg.topic, "t");
        assert_eq!(msg.payload, b"OFF");
    });
}
