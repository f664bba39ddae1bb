// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keypair::KeyPairBuilder;

/// Lower bound of the default prime range.
pub const DEFAULT_MIN_PRIME: u64 = 1000;

/// Upper bound of the default prime range.
///
/// Any two distinct primes ≡ 3 (mod 4) in `[1000, 10000]` give
/// `0xFFFF < n < 2^32`, so every non-zero byte is recoverable and every
/// block fits [`BLOCK_WIDTH`](crate::BLOCK_WIDTH).
pub const DEFAULT_MAX_PRIME: u64 = 10000;

/// Largest accepted prime bound.
///
/// Primes below `2^16` keep `n = p·q` under `2^32`, so every residue fits a
/// [`BLOCK_WIDTH`](crate::BLOCK_WIDTH) block. It also bounds the sieve.
pub const MAX_PRIME: u64 = 0xFFFF;

/// What to do with a block none of whose roots decodes to a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Write `placeholder` in place of the byte and keep going.
    Substitute { placeholder: u8 },
    /// Abort the whole decryption with [`Error::UnresolvedBlock`].
    Strict,
}

impl Default for DecodePolicy {
    fn default() -> Self {
        DecodePolicy::Substitute { placeholder: b'?' }
    }
}

/// Codec settings.
///
/// Loadable from JSON; missing fields take their defaults:
///
/// ```json
/// { "min_prime": 1000, "max_prime": 10000, "decode": { "mode": "strict" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub min_prime: u64,
    pub max_prime: u64,
    pub decode: DecodePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self { min_prime: DEFAULT_MIN_PRIME, max_prime: DEFAULT_MAX_PRIME, decode: DecodePolicy::default() }
    }
}

impl Config {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_prime > self.max_prime {
            return Err(Error::InvalidPrimeRange { min: self.min_prime, max: self.max_prime });
        }
        if self.max_prime > MAX_PRIME {
            return Err(Error::Config(format!("max_prime {} exceeds {MAX_PRIME}", self.max_prime)));
        }
        Ok(())
    }

    /// Key pair builder drawing primes from this configuration's range.
    pub fn keypair_builder(&self) -> KeyPairBuilder {
        KeyPairBuilder::new().prime_range(self.min_prime, self.max_prime)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.min_prime, 1000);
        assert_eq!(config.max_prime, 10000);
        assert_eq!(config.decode, DecodePolicy::Substitute { placeholder: b'?' });
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn strict_from_json() {
        let config = Config::from_json(r#"{ "decode": { "mode": "strict" } }"#).unwrap();
        assert_eq!(config.decode, DecodePolicy::Strict);
        assert_eq!(config.max_prime, DEFAULT_MAX_PRIME);
    }

    #[test]
    fn placeholder_from_json() {
        let json = r#"{ "min_prime": 2000, "decode": { "mode": "substitute", "placeholder": 35 } }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.min_prime, 2000);
        assert_eq!(config.decode, DecodePolicy::Substitute { placeholder: b'#' });
    }

    #[test]
    fn rejects_inverted_range() {
        let result = Config::from_json(r#"{ "min_prime": 50, "max_prime": 10 }"#);
        assert!(matches!(result, Err(Error::InvalidPrimeRange { min: 50, max: 10 })));
    }

    #[test]
    fn rejects_oversized_prime_bound() {
        let result = Config::from_json(r#"{ "min_prime": 0, "max_prime": 18446744073709551615 }"#);
        assert!(matches!(result, Err(Error::Config(_))));

        let config = Config { max_prime: MAX_PRIME + 1, ..Config::default() };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = Config { max_prime: MAX_PRIME, ..Config::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(Config::from_json("{ not json"), Err(Error::Config(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.json");
        std::fs::write(&path, r#"{ "max_prime": 5000 }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_prime, 5000);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
