// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Encrypt, EncryptBytes, Stream, redundancy};
use crate::ciphertext::{BLOCK_WIDTH, Block};
use crate::error::{Error, Result};
use crate::keypair::PublicKey;

use num_bigint_dig::BigUint;

impl Encrypt for PublicKey {
    fn encrypt(&self, byte: u8) -> Result<Block> {
        let m = redundancy::encode(byte);

        // c = m² mod n
        let c = m.modpow(&BigUint::from(2u32), &self.n);

        Block::new(c)
    }
}

impl EncryptBytes for PublicKey {
    fn encrypt_bytes<P: AsRef<[u8]>>(&self, data: P) -> Result<Vec<u8>> {
        let mut encryptor = self.encryptor();
        let mut out = encryptor.update(data)?;
        out.extend(encryptor.finalize()?);
        Ok(out)
    }
}

/// Internal state of the streaming encryptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncryptorState {
    /// Accepting plaintext input.
    Encrypting,
    /// Finalized; no further input is allowed.
    Finalized,
}

/// Streaming encryption context.
///
/// Every plaintext byte maps to exactly one block, so output is emitted as
/// soon as input arrives and nothing is ever buffered.
#[derive(Debug)]
pub struct Encryptor<'a> {
    pub_key: &'a PublicKey,
    state: EncryptorState,
    blocks_written: usize,
}

impl<'a> Encryptor<'a> {
    /// Create a new encryptor bound to the given public key.
    pub(crate) fn new(pub_key: &'a PublicKey) -> Self {
        Self { pub_key, state: EncryptorState::Encrypting, blocks_written: 0 }
    }

    /// Number of blocks emitted so far.
    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }
}

impl<'a> PublicKey {
    /// Create a streaming encryptor for this key.
    pub fn encryptor(&'a self) -> Encryptor<'a> {
        Encryptor::new(self)
    }
}

impl<'a> Stream for Encryptor<'a> {
    fn update<D: AsRef<[u8]>>(&mut self, data: D) -> Result<Vec<u8>> {
        if self.state == EncryptorState::Finalized {
            return Err(Error::EncryptionFailed("Cannot update after finalize".into()));
        }

        let data = data.as_ref();
        let mut out = Vec::with_capacity(data.len() * BLOCK_WIDTH);
        for &byte in data {
            self.pub_key.encrypt(byte)?.write_bits(&mut out);
            self.blocks_written += 1;
        }

        Ok(out)
    }

    fn finalize(mut self) -> Result<Vec<u8>> {
        if self.state == EncryptorState::Finalized {
            return Err(Error::EncryptionFailed("Already finalized".into()));
        }

        tracing::trace!(blocks = self.blocks_written, "encryption stream finalized");
        self.state = EncryptorState::Finalized;
        Ok(Vec::new())
    }
}
