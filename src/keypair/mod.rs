// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

mod util;

pub use util::{generate_primes, pick_prime_pair};

use crate::ciphertext::Block;
use crate::config::{DEFAULT_MAX_PRIME, DEFAULT_MIN_PRIME, DecodePolicy};
use crate::crypto::{Decrypt, DecryptBytes, Decryptor, Encrypt, EncryptBytes, Encryptor, Resolution, extended_gcd};
use crate::error::{Error, Result};

use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use rand::SeedableRng;
use rand::rngs::StdRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Largest redundant encoding of a byte (`0xFF` doubled).
const MAX_ENCODING: u32 = 0xFFFF;

/// Public half of a key: the modulus `n = p·q`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) n: BigUint,
}

impl PublicKey {
    /// Construct a public key from its modulus. `n` must be non-zero.
    pub fn new(n: BigUint) -> Result<Self> {
        if n.is_zero() {
            return Err(Error::InvalidPublicKey);
        }
        Ok(Self { n })
    }

    /// Return the public modulus `n`.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Return the bit length of the modulus.
    pub fn bit_length(&self) -> usize {
        self.n.bits()
    }

    /// Whether every non-zero byte survives a round trip under this modulus.
    ///
    /// Decryption only ever sees `m mod n`, so a modulus not above the
    /// largest encoding (`0xFFFF`) loses information.
    pub fn is_lossless(&self) -> bool {
        self.n > BigUint::from(MAX_ENCODING)
    }
}

/// The trapdoor: both prime factors of the modulus.
///
/// `p` is handed to the requester and `q` is kept by the storing side; both
/// are needed to decrypt. Prime fields are zeroized on drop.
#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    pub(crate) public_key: PublicKey,
    pub(crate) p: BigUint,
    pub(crate) q: BigUint,
}

impl PrivateKey {
    /// Construct a private key from its prime factors.
    ///
    /// Rejects primes that are not ≡ 3 (mod 4), since the closed-form square
    /// root needs it, and pairs whose gcd is not 1. Primality itself is not
    /// re-checked.
    pub fn new(p: BigUint, q: BigUint) -> Result<Self> {
        for prime in [&p, &q] {
            if !crate::crypto::is_blum_prime(prime) {
                return Err(Error::NotBlumPrime(prime.clone()));
            }
        }

        let (gcd, _, _) = extended_gcd(&p, &q);
        if !gcd.is_one() {
            return Err(Error::NotCoprime(gcd));
        }

        let public_key = PublicKey::new(&p * &q)?;
        if !public_key.is_lossless() {
            tracing::warn!(
                bits = public_key.bit_length(),
                "modulus does not exceed 0xFFFF, some bytes cannot be recovered"
            );
        }

        Ok(Self { public_key, p, q })
    }

    /// Return a reference to the associated public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The requester's share of the secret.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The storing side's share of the secret.
    pub fn q(&self) -> &BigUint {
        &self.q
    }
}

/// A complete key pair consisting of public and private components.
///
/// Secret material is zeroized when dropped.
#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    #[zeroize(skip)]
    public: PublicKey,
    secret: PrivateKey,
}

impl<'a> KeyPair {
    /// Generate a key pair from the default prime range.
    pub fn generate() -> Result<Self> {
        KeyPairBuilder::new().build()
    }

    /// Build a key pair from two known primes.
    pub fn from_primes(p: BigUint, q: BigUint) -> Result<Self> {
        let secret = PrivateKey::new(p, q)?;
        Ok(Self { public: secret.public_key.clone(), secret })
    }

    /// Return the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Return the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.secret
    }

    /// Create a streaming encryptor bound to this public key.
    pub fn encryptor(&'a self) -> Encryptor<'a> {
        self.public.encryptor()
    }

    /// Create a streaming decryptor bound to this private key.
    pub fn decryptor(&'a self) -> Result<Decryptor<'a>> {
        self.secret.decryptor()
    }

    /// Create a streaming decryptor with an explicit decode policy.
    pub fn decryptor_with_policy(&'a self, policy: DecodePolicy) -> Result<Decryptor<'a>> {
        self.secret.decryptor_with_policy(policy)
    }
}

impl Encrypt for KeyPair {
    fn encrypt(&self, byte: u8) -> Result<Block> {
        self.public.encrypt(byte)
    }
}

impl EncryptBytes for KeyPair {
    fn encrypt_bytes<P: AsRef<[u8]>>(&self, data: P) -> Result<Vec<u8>> {
        self.public.encrypt_bytes(data)
    }
}

impl Decrypt for KeyPair {
    fn decrypt(&self, block: &Block) -> Result<Resolution> {
        self.secret.decrypt(block)
    }
}

impl DecryptBytes for KeyPair {
    fn decrypt_bytes<P: AsRef<[u8]>>(&self, ciphertext: P) -> Result<Vec<u8>> {
        self.secret.decrypt_bytes(ciphertext)
    }
}

/// Builder for generating key pairs with configurable parameters.
#[derive(Debug, Clone)]
pub struct KeyPairBuilder {
    min_prime: u64,
    max_prime: u64,
    seed: Option<u64>,
}

impl KeyPairBuilder {
    /// Create a builder with the default prime range.
    pub fn new() -> Self {
        Self { min_prime: DEFAULT_MIN_PRIME, max_prime: DEFAULT_MAX_PRIME, seed: None }
    }

    /// Set the inclusive range both primes are drawn from.
    pub fn prime_range(mut self, min: u64, max: u64) -> Self {
        self.min_prime = min;
        self.max_prime = max;
        self
    }

    /// Draw primes from a seeded RNG instead of the OS RNG.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate the key pair.
    pub fn build(self) -> Result<KeyPair> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let (p, q) = pick_prime_pair(self.min_prime, self.max_prime, &mut rng)?;
        let keypair = KeyPair::from_primes(p, q)?;

        tracing::debug!(bits = keypair.public.bit_length(), "generated key pair");
        Ok(keypair)
    }
}

impl Default for KeyPairBuilder {
    fn default() -> Self {
        Self::new()
    }
}
