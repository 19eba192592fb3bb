//! Error types for sealing and opening.

use coldseal_parcel::ParcelError;
use hmac::digest::MacError;
use thiserror::Error;

/// Errors from constructing a sealer or opener.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeySetupError {
    /// Encryption key is below the minimum accepted length.
    #[error("encryption key too short: {actual} bytes (minimum 16)")]
    EncryptionKeyTooShort {
        /// Length of the rejected key
        actual: usize,
    },

    /// Integrity key is below the minimum accepted length.
    #[error("integrity key too short: {actual} bytes (minimum 16)")]
    IntegrityKeyTooShort {
        /// Length of the rejected key
        actual: usize,
    },

    /// Encryption and integrity keys are bytewise equal.
    ///
    /// The two keys serve independent roles; sharing material between them
    /// collapses the domain separation the construction relies on.
    #[error("using same key for encryption and integrity is not allowed")]
    MatchingKeys,

    /// Encryption key length selects no AES variant.
    #[error("unsupported AES key length: {actual} bytes (expected 16, 24, or 32)")]
    UnsupportedAesKeyLength {
        /// Length of the rejected key
        actual: usize,
    },

    /// The configured MAC refused the integrity key.
    ///
    /// HMAC accepts any key length; fixed-key MACs may not.
    #[error("the MAC rejected the integrity key: {actual} bytes")]
    IntegrityKeyRejected {
        /// Length of the rejected key
        actual: usize,
    },
}

/// Errors from [`Sealer::seal`](crate::Sealer::seal).
///
/// There is no integrity branch on the seal path; the only failures are
/// caller precondition violations and the randomness source.
#[derive(Debug, Error)]
pub enum SealError {
    /// Additional data does not fit the 16-bit length header.
    #[error("additional data too large: {len} bytes (maximum 65535)")]
    AdditionalDataTooLarge {
        /// Length of the rejected additional data
        len: usize,
    },

    /// The injected randomness source failed while drawing an IV.
    #[error("randomness source failed while drawing an IV")]
    RandomSource(#[source] rand::Error),
}

/// Errors from [`Opener::open`](crate::Opener::open).
///
/// No partial plaintext is ever returned alongside any of these, and none
/// of them identifies the offending byte beyond the kind of violation.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The parcel is structurally invalid (too short, AD overrun, or a
    /// ciphertext region that is not a positive block multiple).
    #[error(transparent)]
    Parcel(#[from] ParcelError),

    /// MAC verification failed. No decryption was attempted.
    #[error("data integrity compromised")]
    Integrity(#[source] MacError),

    /// PKCS#7 unpadding failed after a passing MAC.
    ///
    /// Cannot occur for parcels produced by a sealer under the same keys;
    /// handled defensively all the same.
    #[error(transparent)]
    Padding(#[from] PaddingError),
}

/// Errors from the PKCS#7 padding codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaddingError {
    /// The decrypted payload was empty.
    #[error("padded payload is empty")]
    Empty,

    /// The final padding run is malformed.
    #[error("invalid padding")]
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_setup_display_matches_construction_contract() {
        let err = KeySetupError::EncryptionKeyTooShort { actual: 8 };
        assert_eq!(err.to_string(), "encryption key too short: 8 bytes (minimum 16)");

        assert_eq!(
            KeySetupError::MatchingKeys.to_string(),
            "using same key for encryption and integrity is not allowed"
        );
    }

    #[test]
    fn parcel_errors_pass_through_transparently() {
        let err = OpenError::from(ParcelError::TooShort { len: 3, min: 50 });
        assert_eq!(err.to_string(), "parcel too short: 3 bytes (minimum 50)");
    }

    #[test]
    fn integrity_error_does_not_leak_detail() {
        let err = OpenError::Integrity(MacError);
        assert_eq!(err.to_string(), "data integrity compromised");
    }
}
