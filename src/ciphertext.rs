// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::ops::Deref;

use num_bigint_dig::BigUint;
use num_traits::Zero;

use crate::error::{Error, Result};

/// Width of every ciphertext block, in `'0'`/`'1'` characters.
pub const BLOCK_WIDTH: usize = 32;

/// A single ciphertext block: `m² mod n` for one plaintext byte.
///
/// Blocks are persisted as exactly [`BLOCK_WIDTH`] ASCII characters, most
/// significant bit first, left-padded with `'0'`. A stream of blocks has no
/// separators; boundaries are purely positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    value: BigUint,
}

impl Block {
    /// Wrap a ciphertext value, rejecting values wider than the block.
    pub fn new(value: BigUint) -> Result<Self> {
        let bits = value.bits();
        if bits > BLOCK_WIDTH {
            return Err(Error::BlockOverflow { bits, width: BLOCK_WIDTH });
        }
        Ok(Self { value })
    }

    /// Parse one block from exactly [`BLOCK_WIDTH`] binary characters.
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        if bits.len() != BLOCK_WIDTH {
            return Err(Error::InvalidCiphertext(format!(
                "block must be {} characters, got {}",
                BLOCK_WIDTH,
                bits.len()
            )));
        }

        let mut value = BigUint::zero();
        for (pos, &ch) in bits.iter().enumerate() {
            let bit = match ch {
                b'0' => 0u8,
                b'1' => 1u8,
                other => {
                    return Err(Error::InvalidCiphertext(format!(
                        "unexpected byte 0x{other:02x} at offset {pos}"
                    )));
                }
            };
            value = (value << 1usize) + BigUint::from(bit);
        }

        Ok(Self { value })
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Append the zero-padded binary form of this block to `out`.
    pub fn write_bits(&self, out: &mut Vec<u8>) {
        let digits = if self.value.is_zero() { String::new() } else { self.value.to_str_radix(2) };
        out.resize(out.len() + BLOCK_WIDTH - digits.len(), b'0');
        out.extend_from_slice(digits.as_bytes());
    }

    /// Zero-padded binary form of this block.
    pub fn to_bits(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOCK_WIDTH);
        self.write_bits(&mut out);
        out
    }
}

impl Deref for Block {
    type Target = BigUint;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>width$}", self.value.to_str_radix(2), width = BLOCK_WIDTH)
    }
}
