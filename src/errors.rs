//! Error types.

use core::fmt;

/// The error type returned when the result of a conversion to or from a
/// [`Tai64N`](crate::Tai64N) is outside the representable range, or the
/// conversion would cause the result to overflow.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutOfRangeError(pub(crate) ());

impl fmt::Display for OutOfRangeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        "timestamp out of representable range".fmt(fmt)
    }
}

impl std::error::Error for OutOfRangeError {}

/// The error type returned when the buffer handed to the binary storage
/// codec is shorter than the 12 bytes of the canonical layout.
///
/// The codec never reads or writes past the provided buffer; a short buffer
/// fails the whole call and leaves the destination untouched.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferTooSmallError(pub(crate) ());

impl fmt::Display for BufferTooSmallError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        "buffer shorter than the 12-byte storage format".fmt(fmt)
    }
}

impl std::error::Error for BufferTooSmallError {}
