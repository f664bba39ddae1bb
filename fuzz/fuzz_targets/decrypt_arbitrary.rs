#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use num_bigint_dig::BigUint;
use rabin_codec::{DecryptBytes, Error, KeyPair};

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let key_pair = KEYPAIR.get_or_init(|| {
        KeyPair::from_primes(BigUint::from(1019u32), BigUint::from(1031u32)).unwrap()
    });

    // Arbitrary input must either decrypt to one byte per block or be
    // rejected as non-binary; it must never panic.
    match key_pair.decrypt_bytes(data) {
        Ok(plaintext) => assert_eq!(plaintext.len(), data.len() / 32),
        Err(Error::InvalidCiphertext(_)) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
});
