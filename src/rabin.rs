// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;

use crate::config::Config;
use crate::crypto::{EncryptBytes, Stream};
use crate::error::Result;
use crate::keypair::{KeyPair, PrivateKey};

/// Result of [`Rabin::encrypt`]: the ciphertext and the fresh key material
/// it was produced under.
#[allow(missing_debug_implementations)]
pub struct Encrypted {
    ciphertext: Vec<u8>,
    keypair: KeyPair,
}

impl Encrypted {
    /// ASCII `'0'`/`'1'` characters, one 32-character block per input byte.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn into_ciphertext(self) -> Vec<u8> {
        self.ciphertext
    }

    /// The requester's decryption secret.
    pub fn p(&self) -> &BigUint {
        self.keypair.private_key().p()
    }

    /// The secret retained by the storing side.
    pub fn q(&self) -> &BigUint {
        self.keypair.private_key().q()
    }

    pub fn n(&self) -> &BigUint {
        self.keypair.public_key().n()
    }

    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }
}

/// One-call entry points for callers that only need to encrypt and decrypt
/// whole buffers.
pub struct Rabin;

impl Rabin {
    /// Encrypt `plaintext` under a freshly generated prime pair.
    ///
    /// ## Error
    ///
    /// Fails with [`Error::InsufficientPrimes`](crate::Error::InsufficientPrimes)
    /// when the configured range holds fewer than two primes ≡ 3 (mod 4).
    pub fn encrypt<P: AsRef<[u8]>>(plaintext: P, config: &Config) -> Result<Encrypted> {
        config.validate()?;

        let keypair = config.keypair_builder().build()?;
        let ciphertext = keypair.encrypt_bytes(plaintext)?;

        Ok(Encrypted { ciphertext, keypair })
    }

    /// Decrypt a ciphertext stream with the two prime factors.
    ///
    /// Yields `ciphertext.len() / 32` bytes; a trailing partial block is
    /// ignored. Unresolved blocks follow `config.decode`.
    ///
    /// ## Error
    ///
    /// Fails before touching any block if the primes are not ≡ 3 (mod 4) or
    /// not coprime.
    pub fn decrypt<C: AsRef<[u8]>>(ciphertext: C, p: &BigUint, q: &BigUint, config: &Config) -> Result<Vec<u8>> {
        let key = PrivateKey::new(p.clone(), q.clone())?;
        let mut decryptor = key.decryptor_with_policy(config.decode)?;

        let mut plaintext = decryptor.update(ciphertext)?;
        plaintext.extend(decryptor.finalize()?);

        Ok(plaintext)
    }
}
