// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;

/// Errors that can occur during cryptographic operations.
///
/// Configuration errors abort an operation before any block is processed.
/// A block that fails redundancy disambiguation is only an error under
/// [`DecodePolicy::Strict`](crate::DecodePolicy::Strict).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid prime range: min {min} exceeds max {max}")]
    InvalidPrimeRange { min: u64, max: u64 },

    #[error("Not enough primes ≡ 3 (mod 4) in [{min}, {max}]: need 2, found {found}")]
    InsufficientPrimes { min: u64, max: u64, found: usize },

    #[error("Prime {0} is not congruent to 3 mod 4")]
    NotBlumPrime(BigUint),

    #[error("Primes p and q must be coprime, gcd is {0}")]
    NotCoprime(BigUint),

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Ciphertext block needs {bits} bits, block width is {width}")]
    BlockOverflow { bits: usize, width: usize },

    #[error("Ciphertext is invalid or corrupted: {0}")]
    InvalidCiphertext(String),

    #[error("No candidate root of block {index} decodes to a byte")]
    UnresolvedBlock { index: usize },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error signals bad keys or parameters rather than bad data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidPrimeRange { .. }
                | Error::InsufficientPrimes { .. }
                | Error::NotBlumPrime(_)
                | Error::NotCoprime(_)
                | Error::InvalidPublicKey
                | Error::BlockOverflow { .. }
                | Error::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
