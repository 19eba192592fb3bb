//! Coldseal Cryptographic Core
//!
//! Authenticated encryption for records at rest: AES-CBC with PKCS#7
//! padding for confidentiality, HMAC in encrypt-then-MAC order for
//! integrity and authenticity. Every sealed parcel carries its own fresh
//! IV, so the construction has no per-message counters or nonce bookkeeping
//! to coordinate.
//!
//! # Why CBC + HMAC instead of an AEAD
//!
//! Stream-based AEADs (GCM, ChaCha20-Poly1305) are catastrophically
//! sensitive to nonce reuse. That is easy to rule out inside one process
//! and hard to rule out for data at rest: high write volumes shrink the
//! collision margin, distributed writers have to coordinate uniqueness, and
//! records that live for years get decrypted and re-encrypted under
//! conditions the original writer never anticipated. A random IV per CBC
//! parcel plus an HMAC over the whole frame trades a little speed for
//! indifference to all of that.
//!
//! # Data flow
//!
//! ```text
//! seal:  plaintext ── pad ──► payload ── CBC(EK, fresh IV) ──► ciphertext
//!        additional data ───────────────────────────┐
//!        [ AD len | AD | IV | ciphertext ] ── HMAC(IK) ──► tag
//!        parcel = [ tag | AD len | AD | IV | ciphertext ]
//!
//! open:  split tag ── verify HMAC(IK) ── parse ── CBC decrypt(EK) ── unpad
//!        (verification failure stops before any decryption)
//! ```
//!
//! # Security
//!
//! - Encrypt-then-MAC: the tag is computed over the ciphertext and the
//!   additional data, and checked in constant time before any cipher work.
//!   Padding errors are unreachable behind a passing MAC, which is what
//!   keeps padding-oracle attacks out of the open path.
//! - Domain separation: the encryption key and the integrity key must be
//!   distinct secrets; construction rejects equal keys. Rotate them
//!   together: either key alone is enough to damage past data if leaked.
//! - The integrity key copy held by a cryptor is zeroized on drop.
//! - The format carries no key or algorithm identifiers. Callers bind a
//!   parcel to the cryptor that opens it.
//!
//! # Example
//!
//! ```
//! use coldseal_crypto::{HmacSha256Opener, HmacSha256Sealer};
//! use rand::rngs::OsRng;
//!
//! let encryption_key = [0x11u8; 32];
//! let integrity_key = [0x22u8; 32];
//!
//! let mut sealer = HmacSha256Sealer::new(&encryption_key, &integrity_key, OsRng)?;
//! let parcel = sealer.seal(b"account record", b"tenant-4")?;
//!
//! let opener = HmacSha256Opener::new(&encryption_key, &integrity_key)?;
//! let (plaintext, additional_data) = opener.open(&parcel)?;
//! assert_eq!(plaintext, b"account record");
//! assert_eq!(additional_data, b"tenant-4");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod cryptor;
mod mac;
mod pkcs7;

pub mod error;

pub use coldseal_parcel::ParcelError;
pub use cryptor::{Opener, Sealer, MIN_KEY_LEN};
pub use error::{KeySetupError, OpenError, PaddingError, SealError};

/// Sealer configured with HMAC-SHA-256 and the operating system CSPRNG.
pub type HmacSha256Sealer = Sealer<hmac::Hmac<sha2::Sha256>, rand::rngs::OsRng>;

/// Opener configured with HMAC-SHA-256.
pub type HmacSha256Opener = Opener<hmac::Hmac<sha2::Sha256>>;
