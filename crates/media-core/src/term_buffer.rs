//! A term buffer: a contiguous byte region supplied by the conductor for one
//! (session, term) epoch. The receive path only ever writes into buffers it
//! was handed via [`crate::proxy::NewReceiveBufferEvent`]; it never
//! allocates or frees them.

use crate::error::CoreError;

/// Owned backing storage for one term epoch of one session's stream.
#[derive(Debug)]
pub struct TermBuffer {
    term_id: u64,
    data: Vec<u8>,
}

impl TermBuffer {
    /// Allocate a zeroed term buffer of `capacity` bytes for `term_id`.
    ///
    /// In production this capacity is dictated by the conductor's term
    /// length configuration; tests typically use a small capacity.
    #[must_use]
    pub fn new(term_id: u64, capacity: usize) -> Self {
        Self { term_id, data: vec![0u8; capacity] }
    }

    /// The term epoch this buffer belongs to.
    #[must_use]
    pub fn term_id(&self) -> u64 {
        self.term_id
    }

    /// Total capacity of the buffer in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Borrow the full backing buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Write `payload` at `offset`, bounds-checked against the buffer's
    /// capacity. Overlapping a prior write with identical bytes is
    /// idempotent by construction: the same bytes are written again.
    pub fn write_at(&mut self, offset: u32, payload: &[u8]) -> Result<(), CoreError> {
        let offset = offset as usize;
        let end = offset.checked_add(payload.len()).ok_or(CoreError::Header(
            mediaproto::HeaderError::BufferOverflow {
                offset,
                length: payload.len(),
                capacity: self.data.len(),
            },
        ))?;
        if end > self.data.len() {
            return Err(CoreError::Header(mediaproto::HeaderError::BufferOverflow {
                offset,
                length: payload.len(),
                capacity: self.data.len(),
            }));
        }
        self.data[offset..end].copy_from_slice(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_at_places_bytes_at_offset() {
        let mut buf = TermBuffer::new(7, 128);
        buf.write_at(64, b"hello").unwrap();
        assert_eq!(&buf.as_slice()[64..69], b"hello");
    }

    #[test]
    fn write_at_rejects_out_of_bounds() {
        let mut buf = TermBuffer::new(7, 16);
        assert!(buf.write_at(10, b"too long for buffer").is_err());
    }

    #[test]
    fn repeated_identical_write_is_idempotent() {
        let mut buf = TermBuffer::new(7, 128);
        buf.write_at(0, b"hello").unwrap();
        buf.write_at(0, b"hello").unwrap();
        assert_eq!(&buf.as_slice()[0..5], b"hello");
    }
}
