// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Self-doubling redundancy used to pick the intended square root.
//!
//! A byte `b` whose minimal binary form is `k` bits long is encoded as that
//! bit string written twice, i.e. `b·2^k + b`. A candidate root is accepted
//! only if its own minimal binary form splits into two equal halves.

use num_bigint_dig::BigUint;
use num_traits::{One, ToPrimitive};

/// Encode a byte as its minimal bit pattern concatenated with itself.
///
/// Zero has the single-digit form `0`, so it encodes to `00`, i.e. the
/// integer zero, which [`decode`] never accepts.
pub fn encode(byte: u8) -> BigUint {
    let width = (u8::BITS - byte.leading_zeros()) as usize;
    let value = BigUint::from(byte);
    (&value << width) | value
}

/// Return the repeated half of `candidate` if its minimal binary form is
/// two identical halves.
///
/// One-digit forms (`0` and `1`) and odd-length forms are rejected. The
/// returned half may exceed a byte; see [`decode_byte`].
pub fn decode(candidate: &BigUint) -> Option<BigUint> {
    let bits = candidate.bits();
    if bits < 2 || bits % 2 != 0 {
        return None;
    }

    let half = bits / 2;
    let high = candidate >> half;
    let mask = (BigUint::one() << half) - BigUint::one();
    let low = candidate & &mask;

    (high == low).then_some(high)
}

/// Outcome of decoding a candidate root down to a plaintext byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The candidate repeats and its half is a valid byte.
    Byte(u8),
    /// The candidate repeats but its half is not a Latin-1 code point.
    OutOfRange(BigUint),
}

/// [`decode`], then narrow the repeated half to a byte.
pub fn decode_byte(candidate: &BigUint) -> Option<Decoded> {
    let half = decode(candidate)?;
    Some(match half.to_u8() {
        Some(byte) => Decoded::Byte(byte),
        None => Decoded::OutOfRange(half),
    })
}
