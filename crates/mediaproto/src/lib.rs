//! Wire frame layouts for the UDP media receive path.
//!
//! Every frame on the wire starts with a 12-byte common header
//! ([`header::FrameHeader`]: version, flags, type, frame length, term
//! offset). Per-type fields begin at the next 8-byte aligned offset and are
//! exposed through typed flyweights: [`data_header::DataHeader`] for
//! payload-carrying frames, [`status_message_header::StatusMessageHeader`]
//! for receiver status advertisements, and [`nak_header::NakHeader`] for
//! retransmission requests.
//!
//! A flyweight never copies its backing bytes. It holds only the storage
//! handle and a base offset, bounds-checks once at `wrap()` time, and reads
//! or writes straight through on every accessor call. This keeps frame
//! parsing and encoding off the allocator entirely.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod data_header;
pub mod errors;
pub mod header;
pub mod nak_header;
pub mod status_message_header;

pub use data_header::{DataHeader, DATA_HEADER_LENGTH};
pub use errors::HeaderError;
pub use header::{
    max_message_length, padded_frame_length, validate_header_length, validate_max_frame_length,
    FrameHeader, FrameType, CURRENT_VERSION, FLAG_BEGIN, FLAG_END, FLAG_UNFRAGMENTED,
    FRAME_ALIGNMENT, HEADER_LENGTH, TYPE_FIELDS_OFFSET, WORD_ALIGNMENT,
};
pub use nak_header::{NakHeader, NAK_HEADER_LENGTH};
pub use status_message_header::{StatusMessageHeader, SM_HEADER_LENGTH};
