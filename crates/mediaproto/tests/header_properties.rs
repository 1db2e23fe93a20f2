//! Property-based round-trip tests for the frame flyweights.

use mediaproto::{
    data_header::{DataHeader, DATA_HEADER_LENGTH},
    header::FrameType,
    nak_header::{NakHeader, NAK_HEADER_LENGTH},
    status_message_header::{StatusMessageHeader, SM_HEADER_LENGTH},
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn data_header_round_trips(
        version in any::<u8>(),
        flags in any::<u8>(),
        frame_length in any::<u32>(),
        term_offset in any::<u32>(),
        session_id in any::<u64>(),
        channel_id in any::<u64>(),
        term_id in any::<u64>(),
        payload_len in 0usize..32,
    ) {
        let mut buf = vec![0u8; DATA_HEADER_LENGTH + payload_len];
        let mut view = DataHeader::wrap(&mut buf[..], 0).unwrap();
        view.set_version(version);
        view.set_flags(flags);
        view.set_frame_type(FrameType::Data);
        view.set_frame_length(frame_length);
        view.set_term_offset(term_offset);
        view.set_session_id(session_id);
        view.set_channel_id(channel_id);
        view.set_term_id(term_id);

        prop_assert_eq!(view.version(), version);
        prop_assert_eq!(view.flags(), flags);
        prop_assert_eq!(view.frame_length(), frame_length);
        prop_assert_eq!(view.term_offset(), term_offset);
        prop_assert_eq!(view.session_id(), session_id);
        prop_assert_eq!(view.channel_id(), channel_id);
        prop_assert_eq!(view.term_id(), term_id);
    }

    #[test]
    fn status_message_header_round_trips(
        session_id in any::<u64>(),
        channel_id in any::<u64>(),
        term_id in any::<u64>(),
        highest_contiguous in any::<u32>(),
        window in any::<u32>(),
    ) {
        let mut buf = vec![0u8; SM_HEADER_LENGTH];
        let mut view = StatusMessageHeader::wrap(&mut buf[..], 0).unwrap();
        view.set_frame_type(FrameType::StatusMessage);
        view.set_session_id(session_id);
        view.set_channel_id(channel_id);
        view.set_term_id(term_id);
        view.set_highest_contiguous_term_offset(highest_contiguous);
        view.set_receiver_window(window);

        prop_assert_eq!(view.session_id(), session_id);
        prop_assert_eq!(view.channel_id(), channel_id);
        prop_assert_eq!(view.term_id(), term_id);
        prop_assert_eq!(view.highest_contiguous_term_offset(), highest_contiguous);
        prop_assert_eq!(view.receiver_window(), window);
    }

    #[test]
    fn nak_header_round_trips(
        session_id in any::<u64>(),
        channel_id in any::<u64>(),
        term_id in any::<u64>(),
        term_offset in any::<u32>(),
        length in any::<u32>(),
    ) {
        let mut buf = vec![0u8; NAK_HEADER_LENGTH];
        let mut view = NakHeader::wrap(&mut buf[..], 0).unwrap();
        view.set_frame_type(FrameType::Nak);
        view.set_session_id(session_id);
        view.set_channel_id(channel_id);
        view.set_term_id(term_id);
        view.set_nak_term_offset(term_offset);
        view.set_length(length);

        prop_assert_eq!(view.session_id(), session_id);
        prop_assert_eq!(view.channel_id(), channel_id);
        prop_assert_eq!(view.term_id(), term_id);
        prop_assert_eq!(view.nak_term_offset(), term_offset);
        prop_assert_eq!(view.length(), length);
    }

    #[test]
    fn data_header_wrap_at_arbitrary_offset(offset in 0usize..16, payload_len in 0usize..16) {
        let mut buf = vec![0u8; offset + DATA_HEADER_LENGTH + payload_len];
        let mut view = DataHeader::wrap(&mut buf[..], offset).unwrap();
        view.set_session_id(7);
        prop_assert_eq!(view.session_id(), 7);
        prop_assert_eq!(view.base_offset(), offset);
    }
}

#[test]
fn reject_short_buffer() {
    let buf = vec![0u8; DATA_HEADER_LENGTH - 1];
    assert!(DataHeader::wrap(&buf[..], 0).is_err());
}

#[test]
fn reject_overflowing_offset() {
    let buf = vec![0u8; DATA_HEADER_LENGTH];
    assert!(DataHeader::wrap(&buf[..], 1).is_err());
}
