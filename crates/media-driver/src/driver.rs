//! The receive-path driver (C6): demultiplexes datagrams via the
//! subscription registry, reassembles payload into term buffers, and
//! produces the SM/NAK frames the runtime must transmit.
//!
//! Follows the Sans-IO pattern: [`ReceiverDriver::process_event`] takes an
//! [`ReceiverEvent`] describing something that happened (a datagram arrived,
//! the conductor handed back a buffer, a tick fired) and returns the
//! [`ReceiverAction`]s the caller must execute. The driver itself never
//! touches a socket; it does reach into [`media_core::ConductorProxy`]
//! directly to request term buffers, since that is a non-blocking channel
//! send rather than I/O, the same way the teacher's driver calls directly
//! into its storage backend.

use std::net::SocketAddr;

use media_core::{
    CoreError, Destination, Environment, GapScanningLossHandler, SubscribedSession, TermBuffer,
};
use mediaproto::{
    data_header::{DataHeader, DATA_HEADER_LENGTH},
    header::{padded_frame_length, CURRENT_VERSION, FRAME_ALIGNMENT},
    nak_header::{NakHeader, NAK_HEADER_LENGTH},
    status_message_header::{StatusMessageHeader, SM_HEADER_LENGTH},
    FrameHeader, FrameType,
};

use crate::registry::SubscriptionRegistry;

/// Initial receiver window advertised on a session's first Status Message.
///
/// Hard-coded placeholder per the source design notes; kept as a named
/// constant so a future pluggable flow-control strategy can reuse it rather
/// than every call site inventing its own literal.
pub const DEFAULT_RECEIVER_WINDOW: u32 = 1000;

/// Receiver driver configuration.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Soft cap on the number of distinct channels this receiver will
    /// admit subscriptions for.
    pub max_subscriptions: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self { max_subscriptions: 4096 }
    }
}

/// Events the receiver driver processes.
///
/// Borrows the datagram's bytes rather than owning them: the runtime reads
/// each datagram into one reused receive buffer and lends a slice of it here,
/// so handling a datagram never allocates.
#[derive(Debug)]
pub enum ReceiverEvent<'a> {
    /// A datagram arrived on the UDP transport.
    Datagram {
        /// Raw datagram bytes (exactly the valid portion, already truncated
        /// to the length `recv_from` reported).
        buffer: &'a [u8],
        /// Address the datagram arrived from.
        src_addr: SocketAddr,
    },
    /// The conductor handed back a provisioned term buffer for a session
    /// previously requested via `create_term_buffer`.
    SubscriptionReady {
        /// Channel the session belongs to.
        channel_id: u64,
        /// Session the buffer is for.
        session_id: u64,
        /// Term epoch the buffer covers.
        term_id: u64,
        /// The provisioned buffer.
        buffer: TermBuffer,
    },
    /// The conductor is adding (or re-referencing) a set of channels.
    AddSubscriber {
        /// Channels to add.
        channel_ids: Vec<u64>,
    },
    /// The conductor is removing a reference from a set of channels.
    RemoveSubscriber {
        /// Channels to remove.
        channel_ids: Vec<u64>,
    },
    /// Periodic tick driving loss-handler polling.
    Tick,
}

/// Actions the runtime must execute on behalf of the driver.
#[derive(Debug, Clone)]
pub enum ReceiverAction {
    /// Send a Status Message frame. A short send here is logged but
    /// non-fatal.
    SendStatusMessage {
        /// Destination address (the session's source address).
        dest: SocketAddr,
        /// Encoded, wire-padded frame bytes.
        frame: Vec<u8>,
    },
    /// Send a NAK frame. A short send here is fatal to the operation.
    SendNak {
        /// Destination address (the session's source address).
        dest: SocketAddr,
        /// Encoded, wire-padded frame bytes.
        frame: Vec<u8>,
    },
    /// Ask the runtime to log a message.
    Log {
        /// Severity.
        level: LogLevel,
        /// Message to log.
        message: String,
    },
}

/// Log severities produced by driver actions, mapped to `tracing` macros by
/// the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Low-volume tracing detail.
    Trace,
    /// Warning.
    Warn,
}

/// The receive-path driver.
pub struct ReceiverDriver<E: Environment> {
    registry: SubscriptionRegistry,
    conductor_proxy: media_core::ConductorProxy,
    config: ReceiverConfig,
    env: E,
}

impl<E: Environment> ReceiverDriver<E> {
    /// Build a driver for `destination`, using `conductor_proxy` to request
    /// term buffers.
    pub fn new(
        destination: Destination,
        conductor_proxy: media_core::ConductorProxy,
        env: E,
        config: ReceiverConfig,
    ) -> Self {
        Self { registry: SubscriptionRegistry::new(destination), conductor_proxy, config, env }
    }

    /// Number of channels with a currently live subscription.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.registry.channel_count()
    }

    /// Process one event, returning the actions the runtime must execute.
    pub fn process_event(
        &mut self,
        event: ReceiverEvent<'_>,
    ) -> Result<Vec<ReceiverAction>, CoreError> {
        match event {
            ReceiverEvent::Datagram { buffer, src_addr } => {
                Ok(self.handle_datagram(buffer, src_addr))
            },
            ReceiverEvent::SubscriptionReady { channel_id, session_id, term_id, buffer } => {
                self.handle_subscription_ready(channel_id, session_id, term_id, buffer)
            },
            ReceiverEvent::AddSubscriber { channel_ids } => {
                Ok(self.handle_add_subscriber(channel_ids))
            },
            ReceiverEvent::RemoveSubscriber { channel_ids } => {
                self.registry.remove_channels(&channel_ids)?;
                Ok(Vec::new())
            },
            ReceiverEvent::Tick => Ok(self.handle_tick()),
        }
    }

    fn handle_add_subscriber(&mut self, channel_ids: Vec<u64>) -> Vec<ReceiverAction> {
        let new_channels =
            channel_ids.iter().filter(|id| self.registry.get(**id).is_none()).count();

        if self.registry.channel_count() + new_channels > self.config.max_subscriptions {
            return vec![ReceiverAction::Log {
                level: LogLevel::Warn,
                message: format!(
                    "rejecting add_channels: would exceed max_subscriptions={}",
                    self.config.max_subscriptions
                ),
            }];
        }

        self.registry.add_channels(&channel_ids);
        Vec::new()
    }

    fn handle_datagram(&mut self, bytes: &[u8], src_addr: SocketAddr) -> Vec<ReceiverAction> {
        let common = match FrameHeader::wrap(bytes, 0) {
            Ok(header) => header,
            Err(_) => {
                return vec![ReceiverAction::Log {
                    level: LogLevel::Warn,
                    message: format!("dropping undersized datagram from {src_addr}"),
                }];
            },
        };

        match common.frame_type() {
            Some(FrameType::Data) => self.handle_data_frame(bytes, src_addr),
            Some(FrameType::StatusMessage) => vec![ReceiverAction::Log {
                level: LogLevel::Trace,
                message: format!("ignoring status message on data endpoint from {src_addr}"),
            }],
            Some(FrameType::Nak) => vec![ReceiverAction::Log {
                level: LogLevel::Trace,
                message: format!("ignoring nak on data endpoint from {src_addr}"),
            }],
            None => vec![ReceiverAction::Log {
                level: LogLevel::Warn,
                message: format!(
                    "dropping datagram with unknown frame type {:#06x} from {src_addr}",
                    common.frame_type_raw()
                ),
            }],
        }
    }

    fn handle_data_frame(&mut self, bytes: &[u8], src_addr: SocketAddr) -> Vec<ReceiverAction> {
        let header = match DataHeader::wrap(bytes, 0) {
            Ok(header) => header,
            Err(_) => {
                return vec![ReceiverAction::Log {
                    level: LogLevel::Warn,
                    message: format!("dropping malformed data frame from {src_addr}"),
                }];
            },
        };

        let channel_id = header.channel_id();
        let session_id = header.session_id();
        let term_id = header.term_id();
        let term_offset = header.term_offset();
        let frame_length = header.frame_length() as usize;

        let Some(subscription) = self.registry.get_mut(channel_id) else {
            return Vec::new();
        };

        if subscription.session(session_id).is_none() {
            let destination = subscription.destination();
            subscription
                .insert_session(SubscribedSession::new_provisioned(session_id, channel_id, src_addr));
            self.conductor_proxy.create_term_buffer(destination, session_id, channel_id, term_id);
            return Vec::new();
        }

        if frame_length <= DATA_HEADER_LENGTH {
            return Vec::new();
        }

        if frame_length > bytes.len() {
            return vec![ReceiverAction::Log {
                level: LogLevel::Warn,
                message: format!(
                    "dropping truncated data frame from {src_addr}: frame_length={frame_length} \
                     exceeds datagram length {}",
                    bytes.len()
                ),
            }];
        }

        let Some(session) = subscription.session_mut(session_id) else {
            return Vec::new();
        };
        let payload = &bytes[DATA_HEADER_LENGTH..frame_length];

        match session.rebuild_buffer(term_id, term_offset, payload) {
            Ok(_highest_contiguous) => Vec::new(),
            Err(CoreError::SessionNotActive { .. }) => vec![ReceiverAction::Log {
                level: LogLevel::Debug,
                message: format!(
                    "dropping data frame for session {session_id}: term buffer not yet bound"
                ),
            }],
            Err(_) => vec![ReceiverAction::Log {
                level: LogLevel::Warn,
                message: format!("dropping data frame for session {session_id}: buffer overflow"),
            }],
        }
    }

    fn handle_subscription_ready(
        &mut self,
        channel_id: u64,
        session_id: u64,
        term_id: u64,
        buffer: TermBuffer,
    ) -> Result<Vec<ReceiverAction>, CoreError> {
        let subscription = self
            .registry
            .get_mut(channel_id)
            .ok_or(CoreError::SubscriptionNotRegistered { channel_id })?;

        let session = subscription
            .session_mut(session_id)
            .ok_or(CoreError::SessionNotFound { session_id })?;

        let dest = session.source_address();
        session.bind_term_buffer(buffer, Box::new(GapScanningLossHandler::new()));

        let frame = encode_status_message(
            session_id,
            channel_id,
            term_id,
            0,
            DEFAULT_RECEIVER_WINDOW,
        );

        Ok(vec![ReceiverAction::SendStatusMessage { dest, frame }])
    }

    fn handle_tick(&mut self) -> Vec<ReceiverAction> {
        // Touches the clock so a future NAK retry/backoff cadence has a
        // timestamp to measure against; no policy consults it yet.
        let _tick_observed_at = self.env.now();
        let mut actions = Vec::new();

        for channel_id in self.channel_ids() {
            let Some(subscription) = self.registry.get_mut(channel_id) else { continue };
            let channel_id = subscription.channel_id();

            for session in subscription.sessions_mut() {
                let session_id = session.session_id();
                let term_id = match session.term_buffer() {
                    Some(buffer) => buffer.term_id(),
                    None => continue,
                };
                let dest = session.source_address();

                if let Some(gap) = session.poll_loss_handler() {
                    let frame = encode_nak(session_id, channel_id, term_id, gap.term_offset, gap.length);
                    actions.push(ReceiverAction::SendNak { dest, frame });
                }
            }
        }

        actions
    }

    fn channel_ids(&self) -> Vec<u64> {
        self.registry.channel_ids()
    }
}

fn encode_status_message(
    session_id: u64,
    channel_id: u64,
    term_id: u64,
    highest_contiguous_term_offset: u32,
    receiver_window: u32,
) -> Vec<u8> {
    let mut buf = vec![0u8; padded_frame_length(SM_HEADER_LENGTH)];
    let Ok(mut view) = StatusMessageHeader::wrap(&mut buf[..], 0) else {
        return buf;
    };
    view.set_version(CURRENT_VERSION);
    view.set_flags(0);
    view.set_frame_type(FrameType::StatusMessage);
    view.set_frame_length(SM_HEADER_LENGTH as u32);
    view.set_term_offset(highest_contiguous_term_offset);
    view.set_session_id(session_id);
    view.set_channel_id(channel_id);
    view.set_term_id(term_id);
    view.set_highest_contiguous_term_offset(highest_contiguous_term_offset);
    view.set_receiver_window(receiver_window);
    debug_assert_eq!(buf.len() % FRAME_ALIGNMENT, 0);
    buf
}

fn encode_nak(
    session_id: u64,
    channel_id: u64,
    term_id: u64,
    term_offset: u32,
    length: u32,
) -> Vec<u8> {
    let mut buf = vec![0u8; padded_frame_length(NAK_HEADER_LENGTH)];
    let Ok(mut view) = NakHeader::wrap(&mut buf[..], 0) else {
        return buf;
    };
    view.set_version(CURRENT_VERSION);
    view.set_flags(0);
    view.set_frame_type(FrameType::Nak);
    view.set_frame_length(NAK_HEADER_LENGTH as u32);
    view.set_term_offset(term_offset);
    view.set_session_id(session_id);
    view.set_channel_id(channel_id);
    view.set_term_id(term_id);
    view.set_nak_term_offset(term_offset);
    view.set_length(length);
    debug_assert_eq!(buf.len() % FRAME_ALIGNMENT, 0);
    buf
}
