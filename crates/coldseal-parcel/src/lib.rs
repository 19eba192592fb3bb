//! Coldseal Parcel Codec
//!
//! Byte layout for the coldseal ciphertext parcel. This crate assembles and
//! destructures the at-rest format; it performs no cryptographic work. The
//! sibling `coldseal-crypto` crate drives it from both directions (sealing
//! and opening).
//!
//! Layout on disk / on the wire:
//!
//! ```text
//! [ MAC tag | AD length | additional data | IV | ciphertext blocks ]
//!   M bytes   2 bytes BE   0..=65535 bytes  B     k * B bytes, k >= 1
//! ```
//!
//! `M` (MAC length) and `B` (cipher block size) are fixed per configured
//! [`ParcelLayout`]; the format itself carries no version, algorithm, or key
//! identifiers. Binding a parcel to the keys that open it is the caller's
//! responsibility.
//!
//! # Security
//!
//! The MAC covers everything after the tag slot. To preserve the
//! encrypt-then-MAC ordering, decoding is split in two stages:
//!
//! - [`split_tag`] separates the tag from the authenticated region after a
//!   single strict minimum-length check. Nothing else is parsed.
//! - [`ParcelBody::parse`] destructures the authenticated region. Callers
//!   must only invoke it after the MAC over that region has verified.
//!
//! Every parse offset is range-checked before slicing; arbitrary input bytes
//! produce an error, never a panic.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod layout;
pub mod parcel;

pub use errors::{ParcelError, Result};
pub use layout::ParcelLayout;
pub use parcel::{split_tag, ParcelBody, ParcelBuilder};
