//! Error types for the receive-path core.
//!
//! We keep frame-layout failures (`mediaproto::HeaderError`) distinct from
//! the core's own domain errors, and wrap the former with `#[from]` at the
//! boundary where a handler needs to surface both through one type.

use mediaproto::HeaderError;
use thiserror::Error;

/// Errors raised while processing receive-path state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// `remove_channels` (or a lookup) referenced a channel with no live
    /// subscription. Non-fatal at the process level; surfaced to the caller.
    #[error("subscription not registered for channel {channel_id}")]
    SubscriptionNotRegistered {
        /// The channel that has no subscription.
        channel_id: u64,
    },

    /// A control frame (NAK) could not be fully transmitted. Fatal to the
    /// operation.
    #[error("short send: sent {sent} of {expected} bytes")]
    ShortSend {
        /// Bytes the transport was asked to send.
        expected: usize,
        /// Bytes actually sent.
        sent: usize,
    },

    /// `rebuild_buffer` was called on a session that has no bound term
    /// buffer yet.
    #[error("session {session_id} is not active for term {term_id}")]
    SessionNotActive {
        /// Session that was not active.
        session_id: u64,
        /// Term the write targeted.
        term_id: u64,
    },

    /// A conductor notification (`on_subscription_ready`) named a session
    /// that has no entry in the registry. Treated as a fatal logic error:
    /// the conductor and receiver have drifted out of sync.
    #[error("no session {session_id} registered for subscription ready notification")]
    SessionNotFound {
        /// Session the notification named.
        session_id: u64,
    },

    /// Frame flyweight construction or field access failed.
    #[error(transparent)]
    Header(#[from] HeaderError),
}
