//! Sans-IO receive-path logic for the UDP media driver.
//!
//! This crate holds the pure, I/O-free state that the receive path needs:
//! the [`Environment`](env::Environment) abstraction, per-session reassembly
//! ([`session::SubscribedSession`]), per-channel subscription bookkeeping
//! ([`subscription::Subscription`]), loss detection
//! ([`loss::LossHandler`]), term-buffer storage
//! ([`term_buffer::TermBuffer`]), and the cross-thread proxies
//! ([`proxy::ConductorProxy`], [`proxy::ReceiverProxy`]) that connect the
//! receiver actor to the conductor actor.
//!
//! Actual UDP I/O, CLI wiring, and logging configuration live in the
//! `media-driver` crate, which consumes these types the way a driver
//! consumes a protocol core.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod destination;
pub mod env;
pub mod error;
pub mod loss;
pub mod proxy;
pub mod received_ranges;
pub mod session;
pub mod subscription;
pub mod term_buffer;

pub use destination::Destination;
pub use env::Environment;
pub use error::CoreError;
pub use loss::{GapDescriptor, GapScanningLossHandler, LossHandler};
pub use proxy::{
    conductor_channel, receiver_channel, ConductorCommand, ConductorCommandInbox, ConductorProxy,
    NewReceiveBufferEvent, ReceiverCommand, ReceiverCommandInbox, ReceiverProxy,
};
pub use received_ranges::ReceivedRanges;
pub use session::{SessionState, SubscribedSession};
pub use subscription::Subscription;
pub use term_buffer::TermBuffer;
