//! Flyweight over a NAK frame: common header plus `session_id`,
//! `channel_id`, `term_id`, `term_offset`, `length` (size of the missing
//! range being requested).

use std::ops::{Deref, DerefMut};

use crate::{
    errors::Result,
    header::{read_u32, read_u64, write_u32, write_u64, FrameHeader, TYPE_FIELDS_OFFSET},
};

const SESSION_ID_OFFSET: usize = TYPE_FIELDS_OFFSET;
const CHANNEL_ID_OFFSET: usize = SESSION_ID_OFFSET + 8;
const TERM_ID_OFFSET: usize = CHANNEL_ID_OFFSET + 8;
const NAK_TERM_OFFSET_OFFSET: usize = TERM_ID_OFFSET + 8;
const LENGTH_OFFSET: usize = NAK_TERM_OFFSET_OFFSET + 4;

/// Total header length for a NAK frame, including the common header.
pub const NAK_HEADER_LENGTH: usize = LENGTH_OFFSET + 4;

/// A NAK frame flyweight.
pub struct NakHeader<T> {
    common: FrameHeader<T>,
}

impl<T: AsRef<[u8]>> NakHeader<T> {
    /// Rebind to `storage` at `offset`, bounds-checked against
    /// [`NAK_HEADER_LENGTH`].
    pub fn wrap(storage: T, offset: usize) -> Result<Self> {
        let common = FrameHeader::wrap(storage, offset)?;
        common.check_type_bounds(NAK_HEADER_LENGTH)?;
        Ok(Self { common })
    }

    /// Session the retransmission request concerns.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + SESSION_ID_OFFSET)
    }

    /// Channel the retransmission request concerns.
    #[must_use]
    pub fn channel_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + CHANNEL_ID_OFFSET)
    }

    /// Term epoch the retransmission request concerns.
    #[must_use]
    pub fn term_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + TERM_ID_OFFSET)
    }

    /// Start of the missing range, relative to the term.
    ///
    /// This shadows the common header's `term_offset` with the same meaning
    /// for this frame type; use this accessor for NAK frames.
    #[must_use]
    pub fn nak_term_offset(&self) -> u32 {
        read_u32(self.common.raw(), self.common.base_offset() + NAK_TERM_OFFSET_OFFSET)
    }

    /// Length in bytes of the missing range.
    #[must_use]
    pub fn length(&self) -> u32 {
        read_u32(self.common.raw(), self.common.base_offset() + LENGTH_OFFSET)
    }

    /// Consume the view, returning the backing storage.
    pub fn into_storage(self) -> T {
        self.common.into_storage()
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> NakHeader<T> {
    /// Set the session id.
    pub fn set_session_id(&mut self, session_id: u64) {
        let offset = self.common.base_offset() + SESSION_ID_OFFSET;
        write_u64(self.common.raw_mut(), offset, session_id);
    }

    /// Set the channel id.
    pub fn set_channel_id(&mut self, channel_id: u64) {
        let offset = self.common.base_offset() + CHANNEL_ID_OFFSET;
        write_u64(self.common.raw_mut(), offset, channel_id);
    }

    /// Set the term id.
    pub fn set_term_id(&mut self, term_id: u64) {
        let offset = self.common.base_offset() + TERM_ID_OFFSET;
        write_u64(self.common.raw_mut(), offset, term_id);
    }

    /// Set the start of the missing range.
    pub fn set_nak_term_offset(&mut self, term_offset: u32) {
        let offset = self.common.base_offset() + NAK_TERM_OFFSET_OFFSET;
        write_u32(self.common.raw_mut(), offset, term_offset);
    }

    /// Set the length of the missing range.
    pub fn set_length(&mut self, length: u32) {
        let offset = self.common.base_offset() + LENGTH_OFFSET;
        write_u32(self.common.raw_mut(), offset, length);
    }
}

impl<T> Deref for NakHeader<T> {
    type Target = FrameHeader<T>;

    fn deref(&self) -> &Self::Target {
        &self.common
    }
}

impl<T> DerefMut for NakHeader<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{FrameType, CURRENT_VERSION};

    #[test]
    fn round_trip_nak_fields() {
        let mut buf = vec![0u8; NAK_HEADER_LENGTH];
        let mut view = NakHeader::wrap(&mut buf[..], 0).unwrap();
        view.set_version(CURRENT_VERSION);
        view.set_flags(0);
        view.set_frame_type(FrameType::Nak);
        view.set_frame_length(NAK_HEADER_LENGTH as u32);
        view.set_session_id(42);
        view.set_channel_id(17);
        view.set_term_id(7);
        view.set_nak_term_offset(64);
        view.set_length(128);

        assert_eq!(view.session_id(), 42);
        assert_eq!(view.channel_id(), 17);
        assert_eq!(view.term_id(), 7);
        assert_eq!(view.nak_term_offset(), 64);
        assert_eq!(view.length(), 128);
        assert_eq!(view.frame_type(), Some(FrameType::Nak));
    }

    #[test]
    fn header_length_is_multiple_of_eight() {
        assert_eq!(NAK_HEADER_LENGTH, 48);
        assert_eq!(NAK_HEADER_LENGTH % 8, 0);
    }
}
