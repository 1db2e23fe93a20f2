//! Cross-thread command channels between the receiver and conductor actors.
//!
//! The source material models this as a single-producer/single-consumer
//! ring buffer carrying a wake-up plus a bounded queue carrying large
//! non-POD handles (see `DESIGN.md` for why this is built on
//! `std::sync::mpsc` rather than a hand-rolled shared-memory ring buffer).
//! Both directions are fire-and-forget from the producer's perspective:
//! `try_send` is used exclusively so neither actor's event loop ever blocks.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

use crate::{destination::Destination, term_buffer::TermBuffer};

/// Commands the receiver sends to the conductor.
#[derive(Debug)]
pub enum ConductorCommand {
    /// Request a term buffer be provisioned for a newly seen session.
    CreateTermBuffer {
        /// Destination the session was seen on.
        destination: Destination,
        /// Session requesting a buffer.
        session_id: u64,
        /// Channel the session belongs to.
        channel_id: u64,
        /// Term epoch to provision.
        term_id: u64,
    },
}

/// Commands the conductor sends to the receiver.
#[derive(Debug, Clone)]
pub enum ReceiverCommand {
    /// Subscribe to (or add a reference to) the given channels.
    AddSubscriber {
        /// Channels to add.
        channel_ids: Vec<u64>,
    },
    /// Remove a reference from the given channels.
    RemoveSubscriber {
        /// Channels to remove.
        channel_ids: Vec<u64>,
    },
}

/// A term buffer handed from the conductor to the receiver, notifying it
/// that a previously requested buffer is now available.
#[derive(Debug)]
pub struct NewReceiveBufferEvent {
    /// Channel the session belongs to.
    pub channel_id: u64,
    /// Session the buffer is for.
    pub session_id: u64,
    /// Term epoch this buffer covers.
    pub term_id: u64,
    /// The provisioned buffer itself.
    pub buffer: TermBuffer,
}

/// Receiver-held handle for sending commands to the conductor. Cheap to
/// clone; all sends are non-blocking.
#[derive(Clone)]
pub struct ConductorProxy {
    commands: SyncSender<ConductorCommand>,
}

impl ConductorProxy {
    /// Fire-and-forget request to provision a term buffer. Returns `false`
    /// (and drops the request) if the conductor's command queue is full;
    /// callers are not expected to retry this particular command since a
    /// retry is implicit the next time the triggering data frame arrives.
    pub fn create_term_buffer(
        &self,
        destination: Destination,
        session_id: u64,
        channel_id: u64,
        term_id: u64,
    ) -> bool {
        let command = ConductorCommand::CreateTermBuffer {
            destination,
            session_id,
            channel_id,
            term_id,
        };
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Conductor-held handle for draining commands from the receiver.
pub struct ConductorCommandInbox {
    commands: Receiver<ConductorCommand>,
}

impl ConductorCommandInbox {
    /// Non-blocking receive of the next queued command, if any.
    pub fn try_recv(&self) -> Option<ConductorCommand> {
        self.commands.try_recv().ok()
    }
}

/// Conductor-held handle for sending commands and buffer-ready events to
/// the receiver.
#[derive(Clone)]
pub struct ReceiverProxy {
    commands: SyncSender<ReceiverCommand>,
    buffers: SyncSender<NewReceiveBufferEvent>,
}

impl ReceiverProxy {
    /// Queue an `ADD_SUBSCRIBER` command. Returns `false` if the receiver's
    /// command queue is full.
    pub fn add_subscriber(&self, channel_ids: Vec<u64>) -> bool {
        self.commands.try_send(ReceiverCommand::AddSubscriber { channel_ids }).is_ok()
    }

    /// Queue a `REMOVE_SUBSCRIBER` command. Returns `false` if the
    /// receiver's command queue is full.
    pub fn remove_subscriber(&self, channel_ids: Vec<u64>) -> bool {
        self.commands.try_send(ReceiverCommand::RemoveSubscriber { channel_ids }).is_ok()
    }

    /// Queue a `NEW_RECEIVE_BUFFER_NOTIFICATION` event carrying the
    /// provisioned buffer. Returns `false` when the queue is full; the
    /// caller (conductor) must back off and retry per the `newReceiveBuffer`
    /// contract.
    pub fn new_receive_buffer(&self, event: NewReceiveBufferEvent) -> bool {
        match self.buffers.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Receiver-held handle for draining commands and buffer-ready events sent
/// by the conductor.
pub struct ReceiverCommandInbox {
    commands: Receiver<ReceiverCommand>,
    buffers: Receiver<NewReceiveBufferEvent>,
}

impl ReceiverCommandInbox {
    /// Non-blocking receive of the next queued subscription command, if any.
    pub fn try_recv_command(&self) -> Option<ReceiverCommand> {
        self.commands.try_recv().ok()
    }

    /// Non-blocking receive of the next queued buffer-ready event, if any.
    pub fn try_recv_buffer(&self) -> Option<NewReceiveBufferEvent> {
        self.buffers.try_recv().ok()
    }
}

/// Build the receiver→conductor channel pair. `capacity` bounds the number
/// of in-flight `create_term_buffer` requests.
#[must_use]
pub fn conductor_channel(capacity: usize) -> (ConductorProxy, ConductorCommandInbox) {
    let (tx, rx) = sync_channel(capacity.max(1));
    (ConductorProxy { commands: tx }, ConductorCommandInbox { commands: rx })
}

/// Build the conductor→receiver channel pair. `capacity` bounds both the
/// subscription command queue and the buffer-ready event queue.
#[must_use]
pub fn receiver_channel(capacity: usize) -> (ReceiverProxy, ReceiverCommandInbox) {
    let (command_tx, command_rx) = sync_channel(capacity.max(1));
    let (buffer_tx, buffer_rx) = sync_channel(capacity.max(1));
    (
        ReceiverProxy { commands: command_tx, buffers: buffer_tx },
        ReceiverCommandInbox { commands: command_rx, buffers: buffer_rx },
    )
}
