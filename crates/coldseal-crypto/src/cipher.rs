//! AES block cipher wrapper with CBC chaining.
//!
//! The AES variant is selected at construction from the encryption key
//! length, the way callers with runtime-configured keys expect. The key
//! schedule is expanded once and reused for every operation; per-operation
//! state is limited to the CBC chaining value.

use aes::cipher::consts::U16;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, BlockSizeUser, InnerIvInit, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::error::KeySetupError;

/// AES block size in bytes, and therefore the IV length.
pub(crate) const BLOCK_SIZE: usize = 16;

/// An initialized AES instance of the variant matching the key length.
///
/// The `aes` types keep their `Debug` output opaque, so no key schedule
/// material can leak through formatting.
#[derive(Debug, Clone)]
pub(crate) enum AesCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesCipher {
    /// Expand the key schedule. The key length selects the variant:
    /// 16 bytes AES-128, 24 bytes AES-192, 32 bytes AES-256.
    pub(crate) fn new(key: &[u8]) -> Result<Self, KeySetupError> {
        match key.len() {
            16 => Ok(Self::Aes128(Aes128::new(GenericArray::from_slice(key)))),
            24 => Ok(Self::Aes192(Aes192::new(GenericArray::from_slice(key)))),
            32 => Ok(Self::Aes256(Aes256::new(GenericArray::from_slice(key)))),
            actual => Err(KeySetupError::UnsupportedAesKeyLength { actual }),
        }
    }

    /// CBC-encrypt `buf` in place under the given IV.
    ///
    /// `buf` must be a multiple of the block size; the caller's padding step
    /// guarantees it.
    pub(crate) fn encrypt_in_place(&self, iv: &[u8], buf: &mut [u8]) {
        debug_assert_eq!(iv.len(), BLOCK_SIZE);
        debug_assert_eq!(buf.len() % BLOCK_SIZE, 0);

        let iv = GenericArray::from_slice(iv);
        match self {
            Self::Aes128(aes) => {
                encrypt_blocks(cbc::Encryptor::inner_iv_init(aes.clone(), iv), buf);
            }
            Self::Aes192(aes) => {
                encrypt_blocks(cbc::Encryptor::inner_iv_init(aes.clone(), iv), buf);
            }
            Self::Aes256(aes) => {
                encrypt_blocks(cbc::Encryptor::inner_iv_init(aes.clone(), iv), buf);
            }
        }
    }

    /// CBC-decrypt `buf` in place under the given IV.
    ///
    /// `buf` must be a multiple of the block size; the parcel codec rejects
    /// anything else before decryption is reached.
    pub(crate) fn decrypt_in_place(&self, iv: &[u8], buf: &mut [u8]) {
        debug_assert_eq!(iv.len(), BLOCK_SIZE);
        debug_assert_eq!(buf.len() % BLOCK_SIZE, 0);

        let iv = GenericArray::from_slice(iv);
        match self {
            Self::Aes128(aes) => {
                decrypt_blocks(cbc::Decryptor::inner_iv_init(aes.clone(), iv), buf);
            }
            Self::Aes192(aes) => {
                decrypt_blocks(cbc::Decryptor::inner_iv_init(aes.clone(), iv), buf);
            }
            Self::Aes256(aes) => {
                decrypt_blocks(cbc::Decryptor::inner_iv_init(aes.clone(), iv), buf);
            }
        }
    }
}

fn encrypt_blocks<C>(mut mode: C, buf: &mut [u8])
where
    C: BlockEncryptMut + BlockSizeUser<BlockSize = U16>,
{
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        mode.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}

fn decrypt_blocks<C>(mut mode: C, buf: &mut [u8])
where
    C: BlockDecryptMut + BlockSizeUser<BlockSize = U16>,
{
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        mode.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NIST SP 800-38A CBC examples share this IV and plaintext.
    const NIST_IV: &str = "000102030405060708090a0b0c0d0e0f";
    const NIST_PT: &str = "6bc1bee22e409f96e93d7e117393172a\
                           ae2d8a571e03ac9c9eb76fac45af8e51\
                           30c81c46a35ce411e5fbc1191a0a52ef\
                           f69f2445df4f9b17ad2b417be66c3710";

    fn check_nist_vector(key_hex: &str, ct_hex: &str) {
        let key = hex::decode(key_hex).unwrap();
        let iv = hex::decode(NIST_IV).unwrap();
        let plaintext = hex::decode(NIST_PT).unwrap();

        let cipher = AesCipher::new(&key).unwrap();

        let mut buf = plaintext.clone();
        cipher.encrypt_in_place(&iv, &mut buf);
        assert_eq!(hex::encode(&buf), ct_hex);

        cipher.decrypt_in_place(&iv, &mut buf);
        assert_eq!(buf, plaintext);
    }

    #[test]
    fn cbc_aes128_nist_sp800_38a_f_2_1() {
        check_nist_vector(
            "2b7e151628aed2a6abf7158809cf4f3c",
            "7649abac8119b246cee98e9b12e9197d\
             5086cb9b507219ee95db113a917678b2\
             73bed6b8e3c1743b7116e69e22229516\
             3ff1caa1681fac09120eca307586e1a7",
        );
    }

    #[test]
    fn cbc_aes192_nist_sp800_38a_f_2_3() {
        check_nist_vector(
            "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
            "4f021db243bc633d7178183a9fa071e8\
             b4d9ada9ad7dedf4e5e738763f69145a\
             571b242012fb7ae07fa9baac3df102e9\
             08b0e27988598881d920a9e64f5615cd",
        );
    }

    #[test]
    fn cbc_aes256_nist_sp800_38a_f_2_5() {
        check_nist_vector(
            "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
            "f58c4c04d6e5f1ba779eabfb5f7bfbd6\
             9cfc4e967edb808d679f777bc6702c7d\
             39f23369a9d9bacfa530e26304231461\
             b2eb05e2c39be9fcda6c19078c6a9d1b",
        );
    }

    #[test]
    fn chaining_differs_from_single_block_encryption() {
        let cipher = AesCipher::new(&[0x42; 16]).unwrap();
        let iv = [0u8; 16];

        // Two identical plaintext blocks must produce distinct ciphertext
        // blocks under CBC.
        let mut buf = [0xAB; 32];
        cipher.encrypt_in_place(&iv, &mut buf);
        assert_ne!(buf[..16], buf[16..]);
    }

    #[test]
    fn rejects_unsupported_key_length() {
        assert_eq!(
            AesCipher::new(&[0u8; 20]).unwrap_err(),
            KeySetupError::UnsupportedAesKeyLength { actual: 20 }
        );
    }

    #[test]
    fn accepts_all_aes_key_lengths() {
        assert!(AesCipher::new(&[0u8; 16]).is_ok());
        assert!(AesCipher::new(&[0u8; 24]).is_ok());
        assert!(AesCipher::new(&[0u8; 32]).is_ok());
    }
}
