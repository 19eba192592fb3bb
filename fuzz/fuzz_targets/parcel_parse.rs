//! Fuzz target for parcel destructuring
//!
//! This fuzzer tests parcel splitting and body parsing with arbitrary byte
//! sequences to find:
//! - Parser crashes or panics
//! - Integer overflows in offset calculations
//! - Buffer over-reads behind the AD length header
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use coldseal_parcel::{split_tag, ParcelBody, ParcelLayout};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Exercise the tag lengths the crypto layer actually configures.
    for mac_len in [20usize, 32, 48, 64] {
        let layout = ParcelLayout::new(mac_len, 16);

        // This should never panic, only return Err for invalid data.
        let _ = split_tag(&layout, data)
            .and_then(|(_, authenticated)| ParcelBody::parse(&layout, authenticated));
    }
});
