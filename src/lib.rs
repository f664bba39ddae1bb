// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Rabin Cryptosystem Codec
//!
//! Deterministic, byte-oriented encryption under the Rabin trapdoor
//! function: each plaintext byte is squared modulo `n = p·q` and written as
//! a fixed-width block of ASCII `'0'`/`'1'` characters.
//!
//! Squaring is 4-to-1 modulo `n`, so decryption recovers four candidate
//! square roots through the Chinese Remainder Theorem. Encryption doubles
//! each byte's bit pattern (`1000001` becomes `10000011000001`); decryption
//! keeps the first candidate that shows that self-repetition.
//!
//! ## Security
//!
//! This is **not** a production cryptosystem. It is deterministic, has no
//! authentication, and encrypts one byte per block. The private factors are
//! zeroized on drop, but that does not make the scheme safe.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rabin_codec::{Config, Rabin};
//!
//! let config = Config::default();
//! let sealed = Rabin::encrypt(b"hello world", &config).expect("encryption failed");
//!
//! let plaintext = Rabin::decrypt(sealed.ciphertext(), sealed.p(), sealed.q(), &config)
//!     .expect("decryption failed");
//! assert_eq!(plaintext, b"hello world");
//! ```

mod ciphertext;
mod config;
mod crypto;
mod error;
mod keypair;
mod rabin;
mod storage;

pub use ciphertext::*;
pub use config::*;
pub use crypto::*;
pub use error::*;
pub use keypair::*;
pub use rabin::*;
pub use storage::*;
