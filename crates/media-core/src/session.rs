//! Per-(channel, session) receive-path state: the reassembler.
//!
//! A `SubscribedSession` is created in [`SessionState::Provisioned`] the
//! moment a channel's first data frame arrives for a session, before the
//! conductor has handed back a term buffer. It becomes
//! [`SessionState::Active`] once [`SubscribedSession::bind_term_buffer`] is
//! called from `on_subscription_ready`, at which point `rebuild_buffer`
//! starts accepting payload writes.

use std::net::SocketAddr;

use crate::{
    error::CoreError,
    loss::{GapDescriptor, LossHandler},
    received_ranges::ReceivedRanges,
    term_buffer::TermBuffer,
};

/// Lifecycle state of a [`SubscribedSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created on first data frame; no term buffer yet.
    Provisioned,
    /// Term buffer bound; payload writes are accepted.
    Active,
    /// Session has been torn down; no further writes are accepted.
    Closed,
}

/// Per-(channel, session) reassembly state.
pub struct SubscribedSession {
    session_id: u64,
    channel_id: u64,
    source_address: SocketAddr,
    state: SessionState,
    term_buffer: Option<TermBuffer>,
    received: ReceivedRanges,
    loss_handler: Option<Box<dyn LossHandler>>,
}

impl SubscribedSession {
    /// Create a newly provisioned session, as happens on its first data
    /// frame: no term buffer is attached yet.
    #[must_use]
    pub fn new_provisioned(session_id: u64, channel_id: u64, source_address: SocketAddr) -> Self {
        Self {
            session_id,
            channel_id,
            source_address,
            state: SessionState::Provisioned,
            term_buffer: None,
            received: ReceivedRanges::new(),
            loss_handler: None,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Channel this session was created on.
    #[must_use]
    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    /// Remote address data frames for this session arrive from, and SM/NAK
    /// frames are sent back to.
    #[must_use]
    pub fn source_address(&self) -> SocketAddr {
        self.source_address
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The bound term buffer, if the session is `Active`.
    #[must_use]
    pub fn term_buffer(&self) -> Option<&TermBuffer> {
        self.term_buffer.as_ref()
    }

    /// Highest offset `n` such that `[0, n)` of the current term has been
    /// fully observed.
    #[must_use]
    pub fn highest_contiguous_term_offset(&self) -> u32 {
        self.received.highest_contiguous()
    }

    /// Bind a freshly provisioned term buffer and loss handler, transitioning
    /// the session to `Active`. Called from `on_subscription_ready`.
    pub fn bind_term_buffer(
        &mut self,
        term_buffer: TermBuffer,
        loss_handler: Box<dyn LossHandler>,
    ) {
        self.term_buffer = Some(term_buffer);
        self.loss_handler = Some(loss_handler);
        self.received = ReceivedRanges::new();
        self.state = SessionState::Active;
    }

    /// Copy `payload` into the term buffer at `term_offset` for `term_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionNotActive`] if the session is not
    /// `Active`, or if `term_id` does not match the session's currently
    /// bound term. Returns [`CoreError::Header`] if the write would exceed
    /// the buffer's capacity.
    pub fn rebuild_buffer(
        &mut self,
        term_id: u64,
        term_offset: u32,
        payload: &[u8],
    ) -> Result<u32, CoreError> {
        let not_active =
            || CoreError::SessionNotActive { session_id: self.session_id, term_id };

        if self.state != SessionState::Active {
            return Err(not_active());
        }

        let buffer = self.term_buffer.as_mut().ok_or_else(not_active)?;
        if buffer.term_id() != term_id {
            return Err(not_active());
        }

        buffer.write_at(term_offset, payload)?;

        let end = term_offset + payload.len() as u32;
        self.received.mark(term_offset, end);

        if let Some(handler) = self.loss_handler.as_mut() {
            handler.observe(self.received.clone(), buffer.capacity() as u32);
        }

        Ok(self.received.highest_contiguous())
    }

    /// Poll this session's loss handler for the first unresolved gap.
    pub fn poll_loss_handler(&mut self) -> Option<GapDescriptor> {
        self.loss_handler.as_mut().and_then(LossHandler::poll)
    }

    /// Tear the session down. Idempotent.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }
}
