//! Error types for frame flyweight construction and validation.

use thiserror::Error;

/// Errors raised while wrapping or validating a frame flyweight.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// A flyweight accessor would read or write past the end of the backing
    /// buffer.
    #[error("buffer overflow: offset {offset} + length {length} exceeds buffer of {capacity}")]
    BufferOverflow {
        /// Base offset the view was wrapped at.
        offset: usize,
        /// Number of bytes the access required.
        length: usize,
        /// Length of the backing buffer.
        capacity: usize,
    },

    /// A configured header length violates the `>= 12, multiple of 8`
    /// invariant.
    #[error("invalid header length {length}: must be >= 12 and a multiple of 8")]
    InvalidHeaderLength {
        /// The rejected length.
        length: usize,
    },

    /// A configured max frame length violates the `multiple of 64` invariant.
    #[error("invalid frame alignment {length}: max frame length must be a multiple of 64")]
    InvalidFrameAlignment {
        /// The rejected length.
        length: usize,
    },

    /// The `type` field did not match a known frame type.
    #[error("unknown frame type: {0:#06x}")]
    UnknownFrameType(u16),
}

/// Convenience alias for results returning [`HeaderError`].
pub type Result<T> = std::result::Result<T, HeaderError>;
