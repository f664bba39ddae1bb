// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

mod decrypt;
mod encrypt;
pub mod redundancy;
mod util;

pub use decrypt::{Decryptor, Resolution};
pub use encrypt::Encryptor;
pub use util::{Bezout, extended_gcd, square_roots};
pub(crate) use util::is_blum_prime;

use crate::ciphertext::Block;
use crate::error::Result;

/// Encrypts a single plaintext byte into one ciphertext block.
pub trait Encrypt {
    /// Square the redundant encoding of `byte` modulo `n`.
    ///
    /// ## Error
    ///
    /// Fails with [`Error::BlockOverflow`](crate::Error::BlockOverflow) if the
    /// result does not fit in [`BLOCK_WIDTH`](crate::BLOCK_WIDTH) bits.
    fn encrypt(&self, byte: u8) -> Result<Block>;
}

/// Encrypts a whole byte sequence into a ciphertext stream.
pub trait EncryptBytes {
    /// One block per input byte, concatenated without separators.
    fn encrypt_bytes<P: AsRef<[u8]>>(&self, data: P) -> Result<Vec<u8>>;
}

/// Recovers the plaintext byte of a single ciphertext block.
pub trait Decrypt {
    /// Compute the four square roots of the block and pick the first one
    /// that carries the redundancy pattern.
    fn decrypt(&self, block: &Block) -> Result<Resolution>;
}

/// Decrypts a ciphertext stream produced by [`EncryptBytes`].
pub trait DecryptBytes {
    /// Decrypt every complete block of `ciphertext` under the default
    /// [`DecodePolicy`](crate::DecodePolicy).
    ///
    /// The output holds exactly `ciphertext.len() / BLOCK_WIDTH` bytes; a
    /// trailing partial block is dropped.
    fn decrypt_bytes<P: AsRef<[u8]>>(&self, ciphertext: P) -> Result<Vec<u8>>;
}

/// Stateful interface for incremental cryptographic processing.
///
/// Implementations accept input in chunks via [`update`](Stream::update) and
/// return any output that is already available. [`finalize`](Stream::finalize)
/// consumes the instance and flushes the rest.
pub trait Stream {
    /// Processes the next chunk of input data.
    ///
    /// Implementations may buffer data internally and return an empty vector.
    fn update<D: AsRef<[u8]>>(&mut self, data: D) -> Result<Vec<u8>>;

    /// Completes processing and returns any remaining output.
    fn finalize(self) -> Result<Vec<u8>>;
}
