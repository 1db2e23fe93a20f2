//! Flyweight over a Data frame: common header plus `session_id`,
//! `channel_id`, `term_id`. Payload bytes follow immediately after
//! [`DATA_HEADER_LENGTH`].

use std::ops::{Deref, DerefMut};

use crate::{
    errors::Result,
    header::{read_u64, write_u64, FrameHeader, TYPE_FIELDS_OFFSET},
};

const SESSION_ID_OFFSET: usize = TYPE_FIELDS_OFFSET;
const CHANNEL_ID_OFFSET: usize = SESSION_ID_OFFSET + 8;
const TERM_ID_OFFSET: usize = CHANNEL_ID_OFFSET + 8;

/// Total header length for a Data frame, including the common header.
pub const DATA_HEADER_LENGTH: usize = TERM_ID_OFFSET + 8;

/// A Data frame flyweight.
pub struct DataHeader<T> {
    common: FrameHeader<T>,
}

impl<T: AsRef<[u8]>> DataHeader<T> {
    /// Rebind to `storage` at `offset`, bounds-checked against
    /// [`DATA_HEADER_LENGTH`].
    pub fn wrap(storage: T, offset: usize) -> Result<Self> {
        let common = FrameHeader::wrap(storage, offset)?;
        common.check_type_bounds(DATA_HEADER_LENGTH)?;
        Ok(Self { common })
    }

    /// Session identifying the producer on this channel.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + SESSION_ID_OFFSET)
    }

    /// Logical channel this frame belongs to.
    #[must_use]
    pub fn channel_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + CHANNEL_ID_OFFSET)
    }

    /// Term epoch this frame's payload belongs to.
    #[must_use]
    pub fn term_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + TERM_ID_OFFSET)
    }

    /// Consume the view, returning the backing storage.
    pub fn into_storage(self) -> T {
        self.common.into_storage()
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> DataHeader<T> {
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
}

impl<T> Deref for DataHeader<T> {
    type Target = FrameHeader<T>;

    fn deref(&self) -> &Self::Target {
        &self.common
    }
}

impl<T> DerefMut for DataHeader<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{FrameType, CURRENT_VERSION, FLAG_UNFRAGMENTED};

    #[test]
    fn round_trip_data_fields() {
        let mut buf = vec![0u8; DATA_HEADER_LENGTH + 5];
        let mut view = DataHeader::wrap(&mut buf[..], 0).unwrap();
        view.set_version(CURRENT_VERSION);
        view.set_flags(FLAG_UNFRAGMENTED);
        view.set_frame_type(FrameType::Data);
        view.set_frame_length(DATA_HEADER_LENGTH as u32 + 5);
        view.set_term_offset(64);
        view.set_session_id(42);
        view.set_channel_id(17);
        view.set_term_id(7);

        assert_eq!(view.session_id(), 42);
        assert_eq!(view.channel_id(), 17);
        assert_eq!(view.term_id(), 7);
        assert_eq!(view.term_offset(), 64);
        assert_eq!(view.frame_type(), Some(FrameType::Data));
    }

    #[test]
    fn header_length_is_multiple_of_eight() {
        assert_eq!(DATA_HEADER_LENGTH, 40);
        assert_eq!(DATA_HEADER_LENGTH % 8, 0);
    }

    #[test]
    fn wrap_rejects_buffer_shorter_than_header() {
        let buf = vec![0u8; DATA_HEADER_LENGTH - 1];
        assert!(DataHeader::wrap(&buf[..], 0).is_err());
    }
}
