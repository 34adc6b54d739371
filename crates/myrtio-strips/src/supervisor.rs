//! Connection supervisor
//!
//! Owns the control loop. Each connection cycle goes through
//! `Connecting -> Ready -> Running`; any fault, and the external interrupt,
//! leads to `SafeShutdown` where every strip is forced off. Faults are
//! retried after [`SupervisorConfig::retry_delay`], the interrupt ends
//! [`Supervisor::run`] with a [`ResetRequest`].

use embassy_futures::select::{Either, select};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::Duration;
use myrtio_homeassistant::{SwitchEntity, SwitchTopics, encode_switch_discovery};
use myrtio_mqtt::QoS;

use crate::animation;
use crate::budget::TimingBudget;
use crate::channel::{Connector, MessageChannel};
use crate::clock::Clock;
use crate::command::Status;
use crate::config::SupervisorConfig;
use crate::driver::LedDriver;
use crate::error::Fault;
use crate::handler::{MessageHandler, Outcome};
use crate::state::DeviceState;

/// Capacity of each switch topic
pub const TOPIC_LEN: usize = 128;

/// Buffer the discovery JSON is encoded into
pub const DISCOVERY_BUF_SIZE: usize = 512;

/// External interrupt that stops the supervisor
pub type Interrupt = Signal<CriticalSectionRawMutex, ()>;

/// Lifecycle phase of the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Disconnected,
    Connecting,
    Ready,
    Running,
    SafeShutdown,
}

/// Returned by [`Supervisor::run`] once the interrupt fired and the strips
/// are off. The caller is expected to reset the device.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetRequest;

/// The switch announced through discovery
#[derive(Debug, Clone, Copy)]
pub struct Discovery<'a> {
    pub entity: &'a SwitchEntity<'a>,
    pub topics: &'a SwitchTopics<TOPIC_LEN>,
}

pub struct Supervisor<'a, C, K, H, D, const N: usize> {
    connector: C,
    clock: K,
    handler: H,
    device: DeviceState<'a, D, N>,
    discovery: Discovery<'a>,
    config: SupervisorConfig,
    state: SupervisorState,
    connections: u32,
}

impl<'a, C, K, H, D, const N: usize> Supervisor<'a, C, K, H, D, N>
where
    C: Connector,
    K: Clock,
    H: MessageHandler,
    D: LedDriver<N>,
{
    pub fn new(
        connector: C,
        clock: K,
        handler: H,
        device: DeviceState<'a, D, N>,
        discovery: Discovery<'a>,
    ) -> Self {
        Self {
            connector,
            clock,
            handler,
            device,
            discovery,
            config: SupervisorConfig::new(),
            state: SupervisorState::Disconnected,
            connections: 0,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SupervisorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Number of connections that were established
    pub fn connections(&self) -> u32 {
        self.connections
    }

    pub fn device(&self) -> &DeviceState<'a, D, N> {
        &self.device
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Run connection cycles until `interrupt` is signaled
    pub async fn run(&mut self, interrupt: &Interrupt) -> ResetRequest {
        loop {
            enter(&mut self.state, SupervisorState::Connecting);
            let result = self.session(interrupt).await;

            enter(&mut self.state, SupervisorState::SafeShutdown);
            self.safe_shutdown();

            match result {
                Ok(()) => break,
                Err(fault) => {
                    log::error!("supervisor: {}", fault);
                    enter(&mut self.state, SupervisorState::Disconnected);
                    let retry_delay = self.config.retry_delay;
                    if sleep_or_interrupt(&mut self.clock, retry_delay, interrupt).await {
                        break;
                    }
                }
            }
        }

        interrupt.reset();
        log::info!("supervisor: interrupted, requesting reset");
        ResetRequest
    }

    /// Force every strip off. The enabled flag is kept for the next status
    /// publish.
    fn safe_shutdown(&mut self) {
        self.device.clear();
        animation::render_all(&mut self.device);
        log::info!("supervisor: strips forced off");
    }

    /// One connection cycle. Returns `Ok` only when interrupted.
    async fn session(&mut self, interrupt: &Interrupt) -> Result<(), Fault<C::Error>> {
        let Self {
            connector,
            clock,
            handler,
            device,
            discovery,
            config,
            state,
            connections,
        } = self;

        if interrupt.signaled() {
            return Ok(());
        }

        let mut channel = connector.connect().await.map_err(Fault::Connect)?;
        *connections += 1;
        log::info!("supervisor: connected (connection #{})", connections);

        enter(state, SupervisorState::Ready);
        let mut buf = [0u8; DISCOVERY_BUF_SIZE];
        let len = encode_switch_discovery(discovery.entity, discovery.topics, &mut buf)
            .map_err(Fault::Encode)?;
        channel
            .publish(
                discovery.topics.config.as_str(),
                &buf[..len],
                QoS::AtLeastOnce,
                true,
            )
            .await
            .map_err(Fault::Publish)?;

        if device.is_enabled() {
            device.reset_to_patterns();
            animation::render_all(device);
        }
        let status = Status::from_enabled(device.is_enabled());
        publish_status(&mut channel, discovery, status, config.status_retain).await?;

        channel
            .subscribe(discovery.topics.command.as_str())
            .await
            .map_err(Fault::Subscribe)?;

        // Set when this iteration's frame is already on the strips, either
        // from the reset above or from a command. Rotation resumes on the
        // next iteration.
        let mut rendered = device.is_enabled();
        enter(state, SupervisorState::Running);
        loop {
            if interrupt.signaled() {
                return Ok(());
            }
            let started = clock.now();

            if let Some(message) = channel.poll().await.map_err(Fault::Poll)? {
                match handler.handle(message.topic.as_str(), &message.payload, device) {
                    Outcome::Changed(status) => {
                        publish_status(&mut channel, discovery, status, config.status_retain)
                            .await?;
                        rendered = true;
                    }
                    Outcome::Unrecognized => {
                        log::warn!(
                            "supervisor: unrecognized command {:?}",
                            message.payload.as_slice()
                        );
                    }
                    Outcome::ForeignTopic => {
                        log::debug!("supervisor: ignoring message on {}", message.topic);
                    }
                }
            }

            if !rendered {
                animation::tick(device);
            }
            rendered = false;

            let target = config.budget.target(device.is_enabled());
            let elapsed = clock.now().saturating_duration_since(started);
            if sleep_or_interrupt(clock, TimingBudget::residual(target, elapsed), interrupt).await {
                return Ok(());
            }
        }
    }
}

fn enter(state: &mut SupervisorState, next: SupervisorState) {
    log::debug!("supervisor: {:?} -> {:?}", state, next);
    *state = next;
}

async fn publish_status<Ch: MessageChannel>(
    channel: &mut Ch,
    discovery: &Discovery<'_>,
    status: Status,
    retain: bool,
) -> Result<(), Fault<Ch::Error>> {
    channel
        .publish(
            discovery.topics.state.as_str(),
            status.payload(),
            QoS::AtMostOnce,
            retain,
        )
        .await
        .map_err(Fault::Publish)?;
    log::info!("supervisor: status {:?} published", status);
    Ok(())
}

/// Sleep for `duration`. Returns `true` if the interrupt fired first.
async fn sleep_or_interrupt<K: Clock>(
    clock: &mut K,
    duration: Duration,
    interrupt: &Interrupt,
) -> bool {
    matches!(
        select(clock.sleep(duration), interrupt.wait()).await,
        Either::Second(())
    )
}
