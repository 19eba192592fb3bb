//! Keyed-MAC engine.
//!
//! A fresh MAC instance is constructed per operation from the stored
//! integrity key; no MAC state is reused across messages. Verification goes
//! through the MAC's own constant-time comparison, never a short-circuit
//! byte compare.

use hmac::digest::{KeyInit, MacError, Output, OutputSizeUser};
use hmac::Mac;

/// Tag length in bytes of the configured MAC.
pub(crate) fn tag_len<M: Mac>() -> usize {
    <M as OutputSizeUser>::output_size()
}

/// Compute the tag over `message` with a freshly keyed MAC.
pub(crate) fn compute_tag<M: Mac + KeyInit>(integrity_key: &[u8], message: &[u8]) -> Output<M> {
    let Ok(mut mac) = <M as KeyInit>::new_from_slice(integrity_key) else {
        unreachable!("the MAC accepted this key at construction time");
    };
    mac.update(message);
    mac.finalize().into_bytes()
}

/// Verify `tag` over `message` in constant time with respect to the tag
/// bytes. A length mismatch is an authentication failure like any other.
pub(crate) fn verify_tag<M: Mac + KeyInit>(
    integrity_key: &[u8],
    tag: &[u8],
    message: &[u8],
) -> Result<(), MacError> {
    let Ok(mut mac) = <M as KeyInit>::new_from_slice(integrity_key) else {
        unreachable!("the MAC accepted this key at construction time");
    };
    mac.update(message);
    mac.verify_slice(tag)
}

#[cfg(test)]
mod tests {
    use hmac::Hmac;
    use sha2::{Sha256, Sha512};

    use super::*;

    type HmacSha256 = Hmac<Sha256>;

    #[test]
    fn tag_len_matches_hash_output() {
        assert_eq!(tag_len::<HmacSha256>(), 32);
        assert_eq!(tag_len::<Hmac<Sha512>>(), 64);
    }

    #[test]
    fn hmac_sha256_rfc4231_case_2() {
        // RFC 4231 test case 2: short key, short data.
        let tag = compute_tag::<HmacSha256>(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn verify_accepts_computed_tag() {
        let tag = compute_tag::<HmacSha256>(b"integrity key bytes!", b"message");
        assert!(verify_tag::<HmacSha256>(b"integrity key bytes!", &tag, b"message").is_ok());
    }

    #[test]
    fn verify_rejects_flipped_tag() {
        let mut tag = compute_tag::<HmacSha256>(b"integrity key bytes!", b"message");
        tag[0] ^= 0x01;
        assert!(verify_tag::<HmacSha256>(b"integrity key bytes!", &tag, b"message").is_err());
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let tag = compute_tag::<HmacSha256>(b"integrity key bytes!", b"message");
        assert!(verify_tag::<HmacSha256>(b"another key entirely!", &tag, b"message").is_err());
    }

    #[test]
    fn verify_rejects_truncated_tag() {
        let tag = compute_tag::<HmacSha256>(b"integrity key bytes!", b"message");
        assert!(verify_tag::<HmacSha256>(b"integrity key bytes!", &tag[..16], b"message").is_err());
    }

    #[test]
    fn verify_rejects_empty_tag() {
        assert!(verify_tag::<HmacSha256>(b"integrity key bytes!", &[], b"message").is_err());
    }
}
