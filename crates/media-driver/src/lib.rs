//! UDP receive-path media driver.
//!
//! Production "glue" that wraps [`media_core`]'s Sans-IO [`ReceiverDriver`]
//! with real I/O: a [`UdpTransport`] socket, a [`SystemEnv`] clock/RNG, and
//! the cross-thread proxies that connect the receiver to a conductor.
//!
//! The conductor's own bookkeeping (term-buffer allocation policy, client
//! IPC, subscription authentication) is a named external collaborator, not
//! part of this driver. [`conductor::spawn_reference_conductor`] is a
//! minimal stand-in that answers every `create_term_buffer` request with a
//! fixed-size buffer, enough to drive the receive path end to end without
//! reimplementing a real conductor.
//!
//! # Components
//!
//! - [`ReceiverDriver`]: action-based orchestrator (pure logic, no I/O)
//! - [`Receiver`]: production runtime that executes `ReceiverDriver` actions
//! - [`UdpTransport`]: UDP transport via `tokio::net::UdpSocket`
//! - [`SystemEnv`]: production environment (real time, crypto RNG)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod conductor;
pub mod driver;
mod error;
mod registry;
mod system_env;
mod transport;

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use bytes::BytesMut;
pub use conductor::spawn_reference_conductor;
pub use driver::{
    LogLevel, ReceiverAction, ReceiverConfig, ReceiverDriver, ReceiverEvent,
    DEFAULT_RECEIVER_WINDOW,
};
pub use error::DriverError;
use media_core::{conductor_channel, receiver_channel, Destination};
pub use registry::SubscriptionRegistry;
pub use system_env::SystemEnv;
pub use transport::{UdpTransport, MAX_DATAGRAM_SIZE};

/// How often the receiver polls its loss handlers for unresolved gaps.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Bound on the receiver⇄conductor command/event channels.
const PROXY_CHANNEL_CAPACITY: usize = 256;

/// Runtime configuration for the receiver binary.
#[derive(Debug, Clone)]
pub struct ReceiverRuntimeConfig {
    /// Address to bind the UDP socket to (e.g. `"0.0.0.0:40001"`).
    pub bind_address: String,
    /// Soft cap on concurrently subscribed channels.
    pub max_subscriptions: usize,
    /// Byte capacity of each term buffer the reference conductor provisions.
    pub term_buffer_capacity: usize,
}

impl Default for ReceiverRuntimeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:40001".to_string(),
            max_subscriptions: 4096,
            term_buffer_capacity: 16 * 1024 * 1024,
        }
    }
}

/// Production receiver runtime: a [`ReceiverDriver`] driven by a
/// [`UdpTransport`] and a conductor command inbox.
pub struct Receiver {
    driver: ReceiverDriver<SystemEnv>,
    transport: UdpTransport,
    inbox: media_core::ReceiverCommandInbox,
}

impl Receiver {
    /// Bind the UDP socket and spawn the reference conductor task, returning
    /// a runtime ready to [`Receiver::run`].
    pub async fn bind(config: ReceiverRuntimeConfig) -> Result<Self, DriverError> {
        let transport = UdpTransport::bind(&config.bind_address).await?;
        // Demultiplexing is per-session (each session's own source address is
        // recorded on first data frame); the destination's `remote_addr` is a
        // placeholder, not consulted by the receive path itself.
        let unspecified_remote = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
        let destination = Destination::unicast(transport.local_addr()?, unspecified_remote);

        let (conductor_proxy, conductor_inbox) = conductor_channel(PROXY_CHANNEL_CAPACITY);
        let (receiver_proxy, receiver_inbox) = receiver_channel(PROXY_CHANNEL_CAPACITY);

        spawn_reference_conductor(conductor_inbox, receiver_proxy, config.term_buffer_capacity);

        let env = SystemEnv::new();
        let driver_config = ReceiverConfig { max_subscriptions: config.max_subscriptions };
        let driver = ReceiverDriver::new(destination, conductor_proxy, env, driver_config);

        Ok(Self { driver, transport, inbox: receiver_inbox })
    }

    /// Local address the receiver is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, DriverError> {
        self.transport.local_addr()
    }

    /// Run the receiver until a transport or core error occurs.
    ///
    /// Each iteration first drains every pending conductor command and
    /// buffer-ready event (non-blocking), then waits on whichever of
    /// "datagram arrived" / "tick elapsed" occurs first — the receiver's
    /// single suspension point.
    pub async fn run(mut self) -> Result<(), DriverError> {
        tracing::info!("receiver listening on {}", self.transport.local_addr()?);

        // One receive buffer, reused for every datagram: `recv_from` writes
        // into it and the driver only ever borrows a slice of it, so the hot
        // path never allocates.
        let mut buffer = BytesMut::zeroed(MAX_DATAGRAM_SIZE);
        let mut tick = tokio::time::interval(TICK_INTERVAL);

        loop {
            self.drain_conductor_inbox().await?;

            tokio::select! {
                result = self.transport.recv_from(&mut buffer) => {
                    let (length, src_addr) = result?;
                    let event = ReceiverEvent::Datagram { buffer: &buffer[..length], src_addr };
                    let actions = self.driver.process_event(event)?;
                    self.execute_actions(actions).await?;
                }
                _ = tick.tick() => {
                    let actions = self.driver.process_event(ReceiverEvent::Tick)?;
                    self.execute_actions(actions).await?;
                }
            }
        }
    }

    async fn drain_conductor_inbox(&mut self) -> Result<(), DriverError> {
        while let Some(command) = self.inbox.try_recv_command() {
            let event = match command {
                media_core::ReceiverCommand::AddSubscriber { channel_ids } => {
                    ReceiverEvent::AddSubscriber { channel_ids }
                },
                media_core::ReceiverCommand::RemoveSubscriber { channel_ids } => {
                    ReceiverEvent::RemoveSubscriber { channel_ids }
                },
            };
            let actions = self.driver.process_event(event)?;
            self.execute_actions(actions).await?;
        }

        while let Some(event) = self.inbox.try_recv_buffer() {
            let actions = self.driver.process_event(ReceiverEvent::SubscriptionReady {
                channel_id: event.channel_id,
                session_id: event.session_id,
                term_id: event.term_id,
                buffer: event.buffer,
            })?;
            self.execute_actions(actions).await?;
        }

        Ok(())
    }

    async fn execute_actions(&self, actions: Vec<ReceiverAction>) -> Result<(), DriverError> {
        for action in actions {
            match action {
                ReceiverAction::SendStatusMessage { dest, frame } => {
                    let sent = self.transport.send_to(dest, &frame).await?;
                    if sent < frame.len() {
                        tracing::warn!(
                            "short send of status message to {dest}: sent {sent} of {} bytes",
                            frame.len()
                        );
                    }
                },
                ReceiverAction::SendNak { dest, frame } => {
                    let sent = self.transport.send_to(dest, &frame).await?;
                    if sent < frame.len() {
                        return Err(DriverError::Core(media_core::CoreError::ShortSend {
                            expected: frame.len(),
                            sent,
                        }));
                    }
                },
                ReceiverAction::Log { level, message } => match level {
                    LogLevel::Trace => tracing::trace!("{message}"),
                    LogLevel::Debug => tracing::debug!("{message}"),
                    LogLevel::Warn => tracing::warn!("{message}"),
                },
            }
        }

        Ok(())
    }
}
