//! Error types for parcel encoding and decoding.

use thiserror::Error;

/// Convenience alias for parcel codec results.
pub type Result<T> = std::result::Result<T, ParcelError>;

/// Errors from assembling or destructuring a ciphertext parcel.
///
/// Decode-side variants carry lengths only. They never identify which byte
/// of a parcel was offending beyond the kind of violation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParcelError {
    /// Additional data exceeds the 16-bit length header (encode side).
    #[error("additional data too large: {len} bytes (maximum 65535)")]
    AdditionalDataTooLarge {
        /// Length of the rejected additional data
        len: usize,
    },

    /// Input is shorter than the smallest structurally valid parcel.
    #[error("parcel too short: {len} bytes (minimum {min})")]
    TooShort {
        /// Actual input length
        len: usize,
        /// Minimum length for this layout
        min: usize,
    },

    /// The declared additional data (plus the IV behind it) does not fit
    /// inside the parcel.
    #[error("additional data overruns the parcel: {ad_len} bytes declared, {available} available")]
    AdditionalDataOverrun {
        /// Additional data length declared in the header
        ad_len: usize,
        /// Bytes actually remaining after the header
        available: usize,
    },

    /// The ciphertext region is empty or not block-aligned.
    #[error("ciphertext length {len} is not a positive multiple of the block size {block_size}")]
    InvalidCiphertextLength {
        /// Actual ciphertext region length
        len: usize,
        /// Cipher block size of this layout
        block_size: usize,
    },
}
