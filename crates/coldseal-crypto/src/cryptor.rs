//! Sealer and opener: the two modes of the encrypt-then-MAC cryptor.
//!
//! Both modes share one immutable [`Cryptor`] built by a common private
//! constructor: the expanded AES key schedule, an owned copy of the
//! integrity key, and the MAC tag length recorded once. The sealer
//! additionally owns the injected randomness source; the opener carries
//! none. There is deliberately no dual-purpose type.

use std::fmt;
use std::marker::PhantomData;

use coldseal_parcel::{split_tag, ParcelBody, ParcelBuilder, ParcelLayout};
use hmac::digest::KeyInit;
use hmac::Mac;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::cipher::{AesCipher, BLOCK_SIZE};
use crate::error::{KeySetupError, OpenError, SealError};
use crate::{mac, pkcs7};

/// Minimum accepted length for both the encryption and the integrity key.
pub const MIN_KEY_LEN: usize = 16;

/// State shared by both modes. Immutable after construction; holds no
/// per-message state, so one instance serves any number of operations.
struct Cryptor<M> {
    cipher: AesCipher,
    integrity_key: Vec<u8>,
    mac_len: usize,
    _mac: PhantomData<M>,
}

impl<M: Mac + KeyInit> Cryptor<M> {
    /// Validate both keys and expand the cipher and MAC state.
    ///
    /// Check order: encryption key length, integrity key length, key
    /// equality, AES variant selection, MAC probe.
    fn new(encryption_key: &[u8], integrity_key: &[u8]) -> Result<Self, KeySetupError> {
        if encryption_key.len() < MIN_KEY_LEN {
            return Err(KeySetupError::EncryptionKeyTooShort { actual: encryption_key.len() });
        }
        if integrity_key.len() < MIN_KEY_LEN {
            return Err(KeySetupError::IntegrityKeyTooShort { actual: integrity_key.len() });
        }
        if bool::from(encryption_key.ct_eq(integrity_key)) {
            return Err(KeySetupError::MatchingKeys);
        }

        let cipher = AesCipher::new(encryption_key)?;

        // Probe the MAC once: the integrity key must be acceptable, and the
        // tag length is fixed for the lifetime of this cryptor.
        if <M as KeyInit>::new_from_slice(integrity_key).is_err() {
            return Err(KeySetupError::IntegrityKeyRejected { actual: integrity_key.len() });
        }

        Ok(Self {
            cipher,
            integrity_key: integrity_key.to_vec(),
            mac_len: mac::tag_len::<M>(),
            _mac: PhantomData,
        })
    }

    fn layout(&self) -> ParcelLayout {
        ParcelLayout::new(self.mac_len, BLOCK_SIZE)
    }
}

impl<M> Drop for Cryptor<M> {
    fn drop(&mut self) {
        self.integrity_key.zeroize();
    }
}

/// Encryption mode of the cryptor.
///
/// Produces self-contained ciphertext parcels: every parcel carries its own
/// fresh IV and MAC tag, so identical inputs sealed twice yield unrelated
/// bytes. The whole parcel has to fit in memory (the MAC covers all of it);
/// this is not a streaming construction.
///
/// # Security
///
/// - The encryption and integrity keys must be independent secrets. An
///   attacker holding the encryption key can read past data even after an
///   integrity-key rotation; an attacker holding the integrity key can
///   forge parcels even after an encryption-key rotation. Rotate both
///   together.
/// - The randomness source must be cryptographically secure in production
///   (`rand::rngs::OsRng`). Deterministic sources are for tests only: a
///   repeated IV under the same key leaks plaintext-block equality.
pub struct Sealer<M, R> {
    cryptor: Cryptor<M>,
    rng: R,
}

impl<M: Mac + KeyInit, R: RngCore + CryptoRng> Sealer<M, R> {
    /// Create a sealer from the two keys and a randomness source.
    ///
    /// # Errors
    ///
    /// - [`KeySetupError::EncryptionKeyTooShort`] /
    ///   [`KeySetupError::IntegrityKeyTooShort`] below [`MIN_KEY_LEN`].
    /// - [`KeySetupError::MatchingKeys`] if the keys are bytewise equal.
    /// - [`KeySetupError::UnsupportedAesKeyLength`] if the encryption key
    ///   selects no AES variant.
    pub fn new(
        encryption_key: &[u8],
        integrity_key: &[u8],
        rng: R,
    ) -> Result<Self, KeySetupError> {
        Ok(Self { cryptor: Cryptor::new(encryption_key, integrity_key)?, rng })
    }

    /// Seal `plaintext` with `additional_data` bound but not encrypted.
    ///
    /// Both inputs may be empty. The returned parcel is
    /// `mac_len + 2 + additional_data.len() + 16 + padded_len` bytes, where
    /// `padded_len` is `plaintext.len()` rounded up to the next multiple of
    /// 16 (a full extra block when already aligned).
    ///
    /// The caller keeps ownership of both inputs; nothing is retained.
    ///
    /// # Errors
    ///
    /// - [`SealError::AdditionalDataTooLarge`] beyond 65535 bytes.
    /// - [`SealError::RandomSource`] if drawing the IV fails; the error is
    ///   propagated verbatim.
    pub fn seal(&mut self, plaintext: &[u8], additional_data: &[u8]) -> Result<Vec<u8>, SealError> {
        if additional_data.len() > ParcelLayout::MAX_AD_LEN {
            return Err(SealError::AdditionalDataTooLarge { len: additional_data.len() });
        }

        let padding = pkcs7::pad(plaintext.len(), BLOCK_SIZE);
        let payload_len = plaintext.len() + padding.len();

        let Ok(mut builder) =
            ParcelBuilder::new(self.cryptor.layout(), additional_data, payload_len)
        else {
            unreachable!("additional data length checked above");
        };

        self.rng.try_fill_bytes(builder.iv_mut()).map_err(SealError::RandomSource)?;

        let (iv, ciphertext) = builder.payload_slots();
        ciphertext[..plaintext.len()].copy_from_slice(plaintext);
        ciphertext[plaintext.len()..].copy_from_slice(&padding);
        self.cryptor.cipher.encrypt_in_place(iv, ciphertext);

        let tag = mac::compute_tag::<M>(&self.cryptor.integrity_key, builder.authenticated());
        Ok(builder.into_parcel(tag.as_slice()))
    }
}

// Manual Debug implementation (the integrity key must never be formatted)
impl<M, R> fmt::Debug for Sealer<M, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sealer")
            .field("mac_len", &self.cryptor.mac_len)
            .finish_non_exhaustive()
    }
}

/// Decryption mode of the cryptor.
///
/// Verification gates decryption: the MAC over everything after the tag is
/// checked in constant time first, and no cipher or unpadding work happens
/// on a parcel that fails it. This is what keeps padding oracles out of the
/// open path.
pub struct Opener<M> {
    cryptor: Cryptor<M>,
}

impl<M: Mac + KeyInit> Opener<M> {
    /// Create an opener from the two keys.
    ///
    /// Same validation as [`Sealer::new`]; the opener carries no randomness
    /// source.
    pub fn new(encryption_key: &[u8], integrity_key: &[u8]) -> Result<Self, KeySetupError> {
        Ok(Self { cryptor: Cryptor::new(encryption_key, integrity_key)? })
    }

    /// Open a parcel, returning the plaintext and the additional data.
    ///
    /// On success the pair equals the inputs of some prior seal under the
    /// same keys. Both returned buffers are fresh copies; the parcel bytes
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// - [`OpenError::Parcel`] if the parcel is structurally invalid.
    /// - [`OpenError::Integrity`] if MAC verification fails; any single-bit
    ///   modification of a sealed parcel lands here, before any decryption.
    /// - [`OpenError::Padding`] if unpadding fails after a passing MAC
    ///   (unreachable for honestly sealed parcels; handled defensively).
    pub fn open(&self, parcel: &[u8]) -> Result<(Vec<u8>, Vec<u8>), OpenError> {
        let layout = self.cryptor.layout();

        let (tag, authenticated) = split_tag(&layout, parcel)?;
        mac::verify_tag::<M>(&self.cryptor.integrity_key, tag, authenticated)
            .map_err(OpenError::Integrity)?;

        let body = ParcelBody::parse(&layout, authenticated)?;

        let mut payload = body.ciphertext.to_vec();
        self.cryptor.cipher.decrypt_in_place(body.iv, &mut payload);

        let cut = match pkcs7::unpad(&payload) {
            Ok(cut) => cut,
            Err(err) => {
                payload.zeroize();
                return Err(OpenError::Padding(err));
            }
        };

        let plaintext = payload[..cut].to_vec();
        payload.zeroize();

        Ok((plaintext, body.additional_data.to_vec()))
    }
}

// Manual Debug implementation (the integrity key must never be formatted)
impl<M> fmt::Debug for Opener<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opener")
            .field("mac_len", &self.cryptor.mac_len)
            .finish_non_exhaustive()
    }
}
