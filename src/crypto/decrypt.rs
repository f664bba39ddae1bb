// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::redundancy::{self, Decoded};
use super::util::{Bezout, square_roots};
use super::{Decrypt, DecryptBytes, Stream};
use crate::ciphertext::{BLOCK_WIDTH, Block};
use crate::config::DecodePolicy;
use crate::error::{Error, Result};
use crate::keypair::PrivateKey;

use num_bigint_dig::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// What redundancy disambiguation made of one ciphertext block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The first self-repeating root halves to this byte.
    Byte(u8),
    /// The first self-repeating root halves to a value above `0xFF`.
    OutOfRange(BigUint),
    /// None of the four roots repeats.
    Unresolved,
}

/// Try the roots in `[x, y, n − x, n − y]` order; the first self-repeating
/// one decides the block, even when its half is out of range.
fn resolve(key: &PrivateKey, bezout: &Bezout, block: &Block) -> Result<Resolution> {
    let roots = square_roots(block.value(), &key.p, &key.q, bezout)?;

    for root in &roots {
        match redundancy::decode_byte(root) {
            Some(Decoded::Byte(byte)) => return Ok(Resolution::Byte(byte)),
            Some(Decoded::OutOfRange(half)) => return Ok(Resolution::OutOfRange(half)),
            None => continue,
        }
    }

    Ok(Resolution::Unresolved)
}

impl Decrypt for PrivateKey {
    fn decrypt(&self, block: &Block) -> Result<Resolution> {
        let bezout = Bezout::new(&self.p, &self.q)?;
        resolve(self, &bezout, block)
    }
}

impl DecryptBytes for PrivateKey {
    fn decrypt_bytes<P: AsRef<[u8]>>(&self, ciphertext: P) -> Result<Vec<u8>> {
        let mut decryptor = self.decryptor()?;
        let mut output = Vec::new();

        output.extend(decryptor.update(ciphertext)?);
        output.extend(decryptor.finalize()?);

        Ok(output)
    }
}

/// Internal state of the streaming decryptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecryptorState {
    /// Reading ciphertext blocks.
    ReadingBlocks,
    /// Finalized; no further input is accepted.
    Finalized,
}

/// Incremental (streaming) decryption context.
///
/// Buffers at most one partial block between calls, so arbitrarily large
/// ciphertexts can be decrypted without holding them in memory. The Bézout
/// coefficients are computed once, when the decryptor is created.
///
/// A failed [`update`](Stream::update) is terminal: output decoded earlier in
/// that call is discarded and every later call fails.
#[allow(missing_debug_implementations)]
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Decryptor<'a> {
    #[zeroize(skip)]
    priv_key: &'a PrivateKey,
    bezout: Bezout,
    #[zeroize(skip)]
    policy: DecodePolicy,
    buffer: Vec<u8>,
    #[zeroize(skip)]
    state: DecryptorState,
    blocks_read: usize,
    substituted: usize,
}

impl<'a> Decryptor<'a> {
    /// Construct a new decryptor bound to the given private key.
    pub(crate) fn new(priv_key: &'a PrivateKey, policy: DecodePolicy) -> Result<Self> {
        let bezout = Bezout::new(&priv_key.p, &priv_key.q)?;

        Ok(Self {
            priv_key,
            bezout,
            policy,
            buffer: Vec::with_capacity(BLOCK_WIDTH),
            state: DecryptorState::ReadingBlocks,
            blocks_read: 0,
            substituted: 0,
        })
    }

    /// Number of complete blocks decrypted so far.
    pub fn blocks_read(&self) -> usize {
        self.blocks_read
    }

    /// Number of blocks that were replaced by the placeholder byte.
    pub fn substituted(&self) -> usize {
        self.substituted
    }

    /// Decrypt every complete block in the buffer.
    fn drain_blocks(&mut self) -> Result<Vec<u8>> {
        let complete = self.buffer.len() - self.buffer.len() % BLOCK_WIDTH;
        let mut blocks = Vec::with_capacity(complete / BLOCK_WIDTH);
        for chunk in self.buffer[..complete].chunks_exact(BLOCK_WIDTH) {
            blocks.push(Block::from_bits(chunk)?);
        }
        self.buffer.drain(..complete);

        let mut output = Vec::with_capacity(blocks.len());
        for block in blocks {
            let index = self.blocks_read;
            let resolution = resolve(self.priv_key, &self.bezout, &block)?;
            output.push(self.settle(index, &block, resolution)?);
            self.blocks_read += 1;
        }

        Ok(output)
    }

    /// Apply the decode policy to one resolved block.
    fn settle(&mut self, index: usize, block: &Block, resolution: Resolution) -> Result<u8> {
        let unresolved = match resolution {
            Resolution::Byte(byte) => return Ok(byte),
            other => other,
        };

        match self.policy {
            DecodePolicy::Strict => Err(Error::UnresolvedBlock { index }),
            DecodePolicy::Substitute { placeholder } => {
                tracing::warn!(
                    index,
                    block = %block.value(),
                    resolution = ?unresolved,
                    "no root decodes to a byte, writing placeholder"
                );
                self.substituted += 1;
                Ok(placeholder)
            }
        }
    }
}

impl<'a> Stream for Decryptor<'a> {
    fn update<D: AsRef<[u8]>>(&mut self, data: D) -> Result<Vec<u8>> {
        if self.state == DecryptorState::Finalized {
            return Err(Error::DecryptionFailed("Cannot update after finalize".into()));
        }

        self.buffer.extend_from_slice(data.as_ref());

        let result = self.drain_blocks();
        if result.is_err() {
            self.buffer.zeroize();
            self.state = DecryptorState::Finalized;
        }
        result
    }

    fn finalize(mut self) -> Result<Vec<u8>> {
        if self.state == DecryptorState::Finalized {
            return Err(Error::DecryptionFailed("Already finalized".into()));
        }

        if !self.buffer.is_empty() {
            tracing::warn!(
                trailing = self.buffer.len(),
                width = BLOCK_WIDTH,
                "ignoring incomplete block at end of ciphertext"
            );
            self.buffer.zeroize();
        }

        tracing::debug!(
            blocks = self.blocks_read,
            substituted = self.substituted,
            "decryption stream finalized"
        );

        self.state = DecryptorState::Finalized;
        Ok(Vec::new())
    }
}

impl<'a> PrivateKey {
    /// Create a streaming decryptor that substitutes `?` for unresolved blocks.
    pub fn decryptor(&'a self) -> Result<Decryptor<'a>> {
        Decryptor::new(self, DecodePolicy::default())
    }

    /// Create a streaming decryptor with an explicit decode policy.
    pub fn decryptor_with_policy(&'a self, policy: DecodePolicy) -> Result<Decryptor<'a>> {
        Decryptor::new(self, policy)
    }
}
