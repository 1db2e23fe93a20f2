//! End-to-end scenario tests exercising `ReceiverDriver` only through its
//! public API (`media_driver::driver`), as opposed to the unit-level
//! scenario tests colocated in `driver.rs`, which reach into private fields
//! for assertions. These confirm the crate's public surface composes the
//! same way a real conductor/runtime would drive it.

use std::{net::SocketAddr, time::Duration};

use media_core::{conductor_channel, ConductorCommand, Destination, Environment};
use media_driver::driver::{
    ReceiverAction, ReceiverConfig, ReceiverDriver, ReceiverEvent, DEFAULT_RECEIVER_WINDOW,
};
use mediaproto::{
    data_header::{DataHeader, DATA_HEADER_LENGTH},
    header::CURRENT_VERSION,
    status_message_header::StatusMessageHeader,
    FrameType,
};

#[derive(Clone)]
struct TestEnv;

impl Environment for TestEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        std::future::ready(())
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.fill(0);
    }
}

fn destination() -> Destination {
    Destination::unicast("0.0.0.0:40001".parse().unwrap(), "10.0.0.1:5000".parse().unwrap())
}

fn data_frame(
    channel_id: u64,
    session_id: u64,
    term_id: u64,
    term_offset: u32,
    payload: &[u8],
) -> Vec<u8> {
    let total = DATA_HEADER_LENGTH + payload.len();
    let mut buf = vec![0u8; total];
    let mut header = DataHeader::wrap(&mut buf[..], 0).unwrap();
    header.set_version(CURRENT_VERSION);
    header.set_flags(0xC0);
    header.set_frame_type(FrameType::Data);
    header.set_frame_length(total as u32);
    header.set_term_offset(term_offset);
    header.set_session_id(session_id);
    header.set_channel_id(channel_id);
    header.set_term_id(term_id);
    drop(header);
    buf[DATA_HEADER_LENGTH..].copy_from_slice(payload);
    buf
}

/// A fresh subscription, the first data frame for a never-seen session, and
/// the conductor's buffer-ready reply should together bring a session to the
/// point of sending its first Status Message — the full admission path a
/// real conductor/runtime pair drives.
#[test]
fn subscription_then_first_datagram_then_buffer_ready_sends_status_message() {
    let (proxy, inbox) = conductor_channel(8);
    let mut driver = ReceiverDriver::new(destination(), proxy, TestEnv, ReceiverConfig::default());

    driver.process_event(ReceiverEvent::AddSubscriber { channel_ids: vec![17] }).unwrap();

    let src_addr: SocketAddr = "10.0.0.1:5000".parse().unwrap();
    let datagram = data_frame(17, 42, 7, 0, &[]);
    let actions =
        driver.process_event(ReceiverEvent::Datagram { buffer: &datagram, src_addr }).unwrap();
    assert!(actions.is_empty(), "first frame for a new session only requests a term buffer");

    let ConductorCommand::CreateTermBuffer { session_id, channel_id, term_id, .. } =
        inbox.try_recv().unwrap();
    assert_eq!((session_id, channel_id, term_id), (42, 17, 7));

    let actions = driver
        .process_event(ReceiverEvent::SubscriptionReady {
            channel_id,
            session_id,
            term_id,
            buffer: media_core::TermBuffer::new(term_id, 4096),
        })
        .unwrap();

    assert_eq!(actions.len(), 1);
    let ReceiverAction::SendStatusMessage { dest, frame } = &actions[0] else {
        panic!("expected a Status Message action, got {:?}", actions[0]);
    };
    assert_eq!(*dest, src_addr);

    let view = StatusMessageHeader::wrap(&frame[..], 0).unwrap();
    assert_eq!(view.session_id(), 42);
    assert_eq!(view.channel_id(), 17);
    assert_eq!(view.receiver_window(), DEFAULT_RECEIVER_WINDOW);
}

/// Subscribing to a channel twice and unsubscribing once should leave the
/// channel subscribed; the second unsubscribe tears it down.
#[test]
fn balanced_subscription_lifecycle() {
    let (proxy, _inbox) = conductor_channel(8);
    let mut driver = ReceiverDriver::new(destination(), proxy, TestEnv, ReceiverConfig::default());

    driver.process_event(ReceiverEvent::AddSubscriber { channel_ids: vec![5] }).unwrap();
    driver.process_event(ReceiverEvent::AddSubscriber { channel_ids: vec![5] }).unwrap();
    assert_eq!(driver.channel_count(), 1);

    driver.process_event(ReceiverEvent::RemoveSubscriber { channel_ids: vec![5] }).unwrap();
    assert_eq!(driver.channel_count(), 1);

    driver.process_event(ReceiverEvent::RemoveSubscriber { channel_ids: vec![5] }).unwrap();
    assert_eq!(driver.channel_count(), 0);
}

/// Data frames for a channel with no subscription are dropped silently and
/// never touch the registry.
#[test]
fn datagram_for_unknown_channel_is_a_no_op() {
    let (proxy, _inbox) = conductor_channel(8);
    let mut driver = ReceiverDriver::new(destination(), proxy, TestEnv, ReceiverConfig::default());

    let src_addr: SocketAddr = "10.0.0.1:5000".parse().unwrap();
    let datagram = data_frame(999, 1, 1, 0, &[]);
    let actions =
        driver.process_event(ReceiverEvent::Datagram { buffer: &datagram, src_addr }).unwrap();

    assert!(actions.is_empty());
    assert_eq!(driver.channel_count(), 0);
}
