//! Parcel assembly and destructuring.
//!
//! [`ParcelBuilder`] allocates one exactly-sized buffer up front and exposes
//! the IV and ciphertext regions as mutable slots, so the sealer can draw
//! randomness and encrypt in place with no mid-assembly reallocation. The
//! tag slot is filled last, once the MAC over the rest of the buffer is
//! known.
//!
//! Decoding is the mirror image in two stages: [`split_tag`] then
//! [`ParcelBody::parse`]. The split happens before MAC verification, the
//! body parse after.

use crate::{
    errors::{ParcelError, Result},
    layout::ParcelLayout,
};

/// Incremental writer for one parcel.
///
/// Region order matches the on-disk layout. The AD length header and the
/// additional data itself are written at construction; the IV and ciphertext
/// slots start zeroed and are filled by the caller.
///
/// # Invariants
///
/// - The buffer length is fixed at construction and never changes.
/// - `payload_len` must be a positive multiple of the layout's block size.
///   The padded payload length comes from the sealer's own padding step, not
///   from input data, so this is asserted rather than surfaced as an error.
#[derive(Debug)]
pub struct ParcelBuilder {
    layout: ParcelLayout,
    ad_len: usize,
    buf: Vec<u8>,
}

impl ParcelBuilder {
    /// Allocate a parcel and write the additional data header and bytes.
    ///
    /// # Errors
    ///
    /// - [`ParcelError::AdditionalDataTooLarge`] if `additional_data` does
    ///   not fit the 16-bit length header.
    pub fn new(
        layout: ParcelLayout,
        additional_data: &[u8],
        payload_len: usize,
    ) -> Result<Self> {
        if additional_data.len() > ParcelLayout::MAX_AD_LEN {
            return Err(ParcelError::AdditionalDataTooLarge { len: additional_data.len() });
        }

        debug_assert!(
            payload_len > 0 && payload_len % layout.block_size() == 0,
            "payload length must be a positive multiple of the block size"
        );

        let mut buf = vec![0u8; layout.parcel_len(additional_data.len(), payload_len)];

        // INVARIANT: additional_data.len() <= MAX_AD_LEN was checked above,
        // so the cast to u16 is lossless.
        let ad_len_header = (additional_data.len() as u16).to_be_bytes();

        let ad_start = layout.mac_len() + ParcelLayout::AD_HEADER_LEN;
        buf[layout.mac_len()..ad_start].copy_from_slice(&ad_len_header);
        buf[ad_start..ad_start + additional_data.len()].copy_from_slice(additional_data);

        Ok(Self { layout, ad_len: additional_data.len(), buf })
    }

    fn iv_start(&self) -> usize {
        self.layout.mac_len() + ParcelLayout::AD_HEADER_LEN + self.ad_len
    }

    /// Mutable IV slot, for the sealer to fill with fresh random bytes.
    pub fn iv_mut(&mut self) -> &mut [u8] {
        let start = self.iv_start();
        let end = start + self.layout.block_size();
        &mut self.buf[start..end]
    }

    /// The IV slot (shared) and the ciphertext slot (mutable), together.
    ///
    /// CBC encryption reads the IV while writing the ciphertext, so both
    /// regions are borrowed in one call.
    pub fn payload_slots(&mut self) -> (&[u8], &mut [u8]) {
        let iv_start = self.iv_start();
        let ciphertext_start = iv_start + self.layout.block_size();
        let (head, ciphertext) = self.buf.split_at_mut(ciphertext_start);
        (&head[iv_start..], ciphertext)
    }

    /// The authenticated region: everything after the tag slot.
    ///
    /// This is the exact byte range the MAC must cover.
    #[must_use]
    pub fn authenticated(&self) -> &[u8] {
        &self.buf[self.layout.mac_len()..]
    }

    /// Write the MAC tag into the leading slot and return the finished
    /// parcel.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is not exactly the layout's MAC length. The tag comes
    /// from the MAC whose output length defined the layout, so a mismatch is
    /// a programmer error, not an input condition.
    #[must_use]
    pub fn into_parcel(mut self, tag: &[u8]) -> Vec<u8> {
        self.buf[..self.layout.mac_len()].copy_from_slice(tag);
        self.buf
    }
}

/// Split a parcel into its MAC tag and the authenticated region.
///
/// This is the only inspection allowed before MAC verification. It performs
/// one strict minimum-length check (tag + AD header + IV) and no other
/// parsing.
///
/// # Errors
///
/// - [`ParcelError::TooShort`] if the input cannot hold even an empty-AD
///   header and an IV.
pub fn split_tag<'a>(layout: &ParcelLayout, parcel: &'a [u8]) -> Result<(&'a [u8], &'a [u8])> {
    let min = layout.min_parcel_len();
    if parcel.len() < min {
        return Err(ParcelError::TooShort { len: parcel.len(), min });
    }

    Ok(parcel.split_at(layout.mac_len()))
}

/// Destructured view of the authenticated region of a parcel.
///
/// Borrowed slices into the input; nothing is copied. Only construct this
/// via [`ParcelBody::parse`], and only after the MAC over the region has
/// verified.
#[derive(Debug, PartialEq, Eq)]
pub struct ParcelBody<'a> {
    /// Additional data, bound by the MAC but not encrypted.
    pub additional_data: &'a [u8],
    /// CBC initialization vector.
    pub iv: &'a [u8],
    /// Ciphertext blocks (a positive multiple of the block size).
    pub ciphertext: &'a [u8],
}

impl<'a> ParcelBody<'a> {
    /// Parse the authenticated region into its AD, IV, and ciphertext
    /// slices.
    ///
    /// Every offset is validated against the region length before slicing;
    /// arbitrary bytes produce an error, never a panic.
    ///
    /// # Errors
    ///
    /// - [`ParcelError::TooShort`] if the region cannot hold the AD header
    ///   and an IV.
    /// - [`ParcelError::AdditionalDataOverrun`] if the declared AD length
    ///   (plus the IV behind it) exceeds the region.
    /// - [`ParcelError::InvalidCiphertextLength`] if the remaining
    ///   ciphertext is empty or not block-aligned.
    pub fn parse(layout: &ParcelLayout, authenticated: &'a [u8]) -> Result<Self> {
        let min = ParcelLayout::AD_HEADER_LEN + layout.block_size();
        if authenticated.len() < min {
            return Err(ParcelError::TooShort { len: authenticated.len(), min });
        }

        let ad_len = usize::from(u16::from_be_bytes([authenticated[0], authenticated[1]]));
        let rest = &authenticated[ParcelLayout::AD_HEADER_LEN..];

        // The declared AD and the IV behind it must both fit.
        // No overflow: ad_len <= 65535 and block_size <= 255.
        if rest.len() < ad_len + layout.block_size() {
            return Err(ParcelError::AdditionalDataOverrun { ad_len, available: rest.len() });
        }

        let (additional_data, tail) = rest.split_at(ad_len);
        let (iv, ciphertext) = tail.split_at(layout.block_size());

        if ciphertext.is_empty() || ciphertext.len() % layout.block_size() != 0 {
            return Err(ParcelError::InvalidCiphertextLength {
                len: ciphertext.len(),
                block_size: layout.block_size(),
            });
        }

        Ok(Self { additional_data, iv, ciphertext })
    }
}
