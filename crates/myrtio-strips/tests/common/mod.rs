#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use embassy_time::{Duration, Instant};
use myrtio_homeassistant::{Device, SwitchEntity, SwitchTopics};
use myrtio_mqtt::{MqttTransport, QoS, TransportError};
use myrtio_strips::{
    Clock, Connector, DeviceState, InboundMessage, Interrupt, LedDriver, MessageChannel, Pattern,
    PatternStore, RGB8, StripId, supervisor::TOPIC_LEN,
};

pub const LEN: usize = 12;

/// Driver that keeps every frame written to it
#[derive(Debug, Default)]
pub struct RecordingDriver<const N: usize> {
    pub frames: Vec<[RGB8; N]>,
}

impl<const N: usize> RecordingDriver<N> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn last(&self) -> Option<&[RGB8; N]> {
        self.frames.last()
    }
}

impl<const N: usize> LedDriver<N> for RecordingDriver<N> {
    fn write(&mut self, colors: &[RGB8; N]) {
        self.frames.push(*colors);
    }
}

/// Clock whose sleeps return at once and only advance virtual time.
///
/// Each `now` call also advances time by `work_ms`, standing in for the
/// processing done between two readings.
#[derive(Debug, Default)]
pub struct MockClock {
    now_ms: Cell<u64>,
    work_ms: u64,
    pub sleeps: Vec<Duration>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work(work_ms: u64) -> Self {
        Self {
            work_ms,
            ..Self::default()
        }
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        let now = self.now_ms.get();
        self.now_ms.set(now + self.work_ms);
        Instant::from_millis(now)
    }

    async fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.now_ms.set(self.now_ms.get() + duration.as_millis());
    }
}

/// What the fake broker does when polled
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Message(&'static str, &'static [u8]),
    Nothing,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect,
    Publish {
        topic: String,
        payload: Vec<u8>,
        qos: QoS,
        retain: bool,
    },
    Subscribe(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeError {
    Refused,
    Dropped,
}

/// Connector that plays back one script per connection.
///
/// `None` makes the connection attempt fail. Once every script has been
/// played the interrupt is raised.
pub struct FakeConnector<'i> {
    sessions: VecDeque<Option<VecDeque<Step>>>,
    interrupt: &'i Interrupt,
    pub events: Vec<Event>,
}

impl<'i> FakeConnector<'i> {
    pub fn new(interrupt: &'i Interrupt, sessions: Vec<Option<Vec<Step>>>) -> Self {
        Self {
            sessions: sessions
                .into_iter()
                .map(|s| s.map(VecDeque::from))
                .collect(),
            interrupt,
            events: Vec::new(),
        }
    }

    /// Payloads published to `topic`, in order
    pub fn published_to(&self, topic: &str) -> Vec<&[u8]> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Publish {
                    topic: t, payload, ..
                } if t == topic => Some(payload.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn connects(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Connect).count()
    }
}

pub struct FakeChannel<'c, 'i> {
    connector: &'c mut FakeConnector<'i>,
    steps: VecDeque<Step>,
}

impl<'i> Connector for FakeConnector<'i> {
    type Error = FakeError;
    type Channel<'c>
        = FakeChannel<'c, 'i>
    where
        Self: 'c;

    async fn connect(&mut self) -> Result<Self::Channel<'_>, Self::Error> {
        match self.sessions.pop_front() {
            Some(Some(steps)) => {
                self.events.push(Event::Connect);
                Ok(FakeChannel {
                    connector: self,
                    steps,
                })
            }
            Some(None) => Err(FakeError::Refused),
            None => {
                self.interrupt.signal(());
                Err(FakeError::Refused)
            }
        }
    }
}

impl MessageChannel for FakeChannel<'_, '_> {
    type Error = FakeError;

    async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), Self::Error> {
        self.connector.events.push(Event::Publish {
            topic: topic.to_string(),
            payload: payload.to_vec(),
            qos,
            retain,
        });
        Ok(())
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error> {
        self.connector
            .events
            .push(Event::Subscribe(topic.to_string()));
        Ok(())
    }

    async fn poll(&mut self) -> Result<Option<InboundMessage>, Self::Error> {
        match self.steps.pop_front() {
            Some(Step::Message(topic, payload)) => Ok(InboundMessage::new(topic, payload)),
            Some(Step::Nothing) => Ok(None),
            Some(Step::Fail) => Err(FakeError::Dropped),
            None => {
                self.connector.interrupt.signal(());
                Ok(None)
            }
        }
    }
}

/// Byte stream that replays scripted broker bytes and records what was sent
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub inbound: VecDeque<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TransportClosed;

impl TransportError for TransportClosed {}

impl ScriptedTransport {
    pub fn with_inbound(chunks: &[&[u8]]) -> Self {
        Self {
            inbound: chunks.iter().map(|c| c.to_vec()).collect(),
            sent: Vec::new(),
        }
    }
}

impl MqttTransport for ScriptedTransport {
    type Error = TransportClosed;

    async fn send(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.sent.push(buf.to_vec());
        Ok(())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some(chunk) = self.inbound.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.inbound.push_front(chunk[n..].to_vec());
        }
        Ok(n)
    }

    fn recv_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.inbound.is_empty())
    }
}

pub const DEVICE: Device<'static> = Device::new("a1b2c3d4e5f6", "Strip Controller")
    .with_manufacturer("MyrtIO")
    .with_model("Strips");

pub const SWITCH: SwitchEntity<'static> = SwitchEntity::new("myrtio", "Strips", &DEVICE);

pub const COMMAND_TOPIC: &str = "switch/myrtio/a1b2c3d4e5f6/set";
pub const STATE_TOPIC: &str = "switch/myrtio/a1b2c3d4e5f6/state";
pub const CONFIG_TOPIC: &str = "homeassistant/switch/myrtio/a1b2c3d4e5f6/config";

pub fn topics() -> SwitchTopics<TOPIC_LEN> {
    SwitchTopics::new(&SWITCH).unwrap()
}

/// Four distinct patterns of [`LEN`] pixels
pub fn four_patterns() -> PatternStore<LEN> {
    PatternStore::new()
        .with(0, Pattern::rainbow(0, 255, 128))
        .and_then(|s| s.with(1, Pattern::dot(0, RGB8::new(255, 0, 0), RGB8::new(0, 0, 8))))
        .and_then(|s| s.with(2, Pattern::gradient(RGB8::new(0, 0, 255), RGB8::new(0, 255, 0))))
        .and_then(|s| s.with(3, Pattern::new(numbered())))
        .unwrap()
}

/// Pixel `i` is `(i + 1, 0, 0)`
pub fn numbered() -> [RGB8; LEN] {
    let mut colors = [RGB8::default(); LEN];
    for (i, color) in colors.iter_mut().enumerate() {
        *color = RGB8::new(u8::try_from(i + 1).unwrap(), 0, 0);
    }
    colors
}

pub fn device(store: &PatternStore<LEN>) -> DeviceState<'_, RecordingDriver<LEN>, LEN> {
    let ids: Vec<StripId> = store.ids().collect();
    DeviceState::from_store(store, ids.into_iter().map(|id| (id, RecordingDriver::new()))).unwrap()
}

/// `colors` rotated left by `steps`
pub fn rotated<const N: usize>(colors: &[RGB8; N], steps: usize) -> [RGB8; N] {
    let mut out = *colors;
    if N > 0 {
        out.rotate_left(steps % N);
    }
    out
}

pub const BLACK_FRAME: [RGB8; LEN] = [RGB8 { r: 0, g: 0, b: 0 }; LEN];
