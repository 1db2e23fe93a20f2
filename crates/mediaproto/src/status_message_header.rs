//! Flyweight over a Status Message (SM) frame: common header plus
//! `session_id`, `channel_id`, `term_id`, `highest_contiguous_term_offset`,
//! `receiver_window`.

use std::ops::{Deref, DerefMut};

use crate::{
    errors::Result,
    header::{read_u32, read_u64, write_u32, write_u64, FrameHeader, TYPE_FIELDS_OFFSET},
};

const SESSION_ID_OFFSET: usize = TYPE_FIELDS_OFFSET;
const CHANNEL_ID_OFFSET: usize = SESSION_ID_OFFSET + 8;
const TERM_ID_OFFSET: usize = CHANNEL_ID_OFFSET + 8;
const HIGHEST_CONTIGUOUS_TERM_OFFSET_OFFSET: usize = TERM_ID_OFFSET + 8;
const RECEIVER_WINDOW_OFFSET: usize = HIGHEST_CONTIGUOUS_TERM_OFFSET_OFFSET + 4;

/// Total header length for a Status Message frame, including the common
/// header.
pub const SM_HEADER_LENGTH: usize = RECEIVER_WINDOW_OFFSET + 4;

/// A Status Message frame flyweight.
pub struct StatusMessageHeader<T> {
    common: FrameHeader<T>,
}

impl<T: AsRef<[u8]>> StatusMessageHeader<T> {
    /// Rebind to `storage` at `offset`, bounds-checked against
    /// [`SM_HEADER_LENGTH`].
    pub fn wrap(storage: T, offset: usize) -> Result<Self> {
        let common = FrameHeader::wrap(storage, offset)?;
        common.check_type_bounds(SM_HEADER_LENGTH)?;
        Ok(Self { common })
    }

    /// Session this status message concerns.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + SESSION_ID_OFFSET)
    }

    /// Channel this status message concerns.
    #[must_use]
    pub fn channel_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + CHANNEL_ID_OFFSET)
    }

    /// Term epoch this status message concerns.
    #[must_use]
    pub fn term_id(&self) -> u64 {
        read_u64(self.common.raw(), self.common.base_offset() + TERM_ID_OFFSET)
    }

    /// Highest contiguous byte offset observed by the receiver.
    #[must_use]
    pub fn highest_contiguous_term_offset(&self) -> u32 {
        read_u32(
            self.common.raw(),
            self.common.base_offset() + HIGHEST_CONTIGUOUS_TERM_OFFSET_OFFSET,
        )
    }

    /// Receiver window advertised to the source.
    #[must_use]
    pub fn receiver_window(&self) -> u32 {
        read_u32(self.common.raw(), self.common.base_offset() + RECEIVER_WINDOW_OFFSET)
    }

    /// Consume the view, returning the backing storage.
    pub fn into_storage(self) -> T {
        self.common.into_storage()
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> StatusMessageHeader<T> {
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

    /// Set the highest contiguous term offset.
    pub fn set_highest_contiguous_term_offset(&mut self, offset_value: u32) {
        let offset = self.common.base_offset() + HIGHEST_CONTIGUOUS_TERM_OFFSET_OFFSET;
        write_u32(self.common.raw_mut(), offset, offset_value);
    }

    /// Set the receiver window.
    pub fn set_receiver_window(&mut self, window: u32) {
        let offset = self.common.base_offset() + RECEIVER_WINDOW_OFFSET;
        write_u32(self.common.raw_mut(), offset, window);
    }
}

impl<T> Deref for StatusMessageHeader<T> {
    type Target = FrameHeader<T>;

    fn deref(&self) -> &Self::Target {
        &self.common
    }
}

impl<T> DerefMut for StatusMessageHeader<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.common
    }
}
