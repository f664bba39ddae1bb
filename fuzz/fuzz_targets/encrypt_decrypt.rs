#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use num_bigint_dig::BigUint;
use rabin_codec::{DecryptBytes, EncryptBytes, KeyPair};

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    // every ordered pair from [1307, 1423] recovers all non-zero bytes
    let key_pair = KEYPAIR.get_or_init(|| {
        KeyPair::from_primes(BigUint::from(1307u32), BigUint::from(1423u32)).unwrap()
    });

    let ciphertext = key_pair.encrypt_bytes(data).unwrap();
    assert_eq!(ciphertext.len(), data.len() * 32);

    let decrypted = key_pair.decrypt_bytes(&ciphertext).unwrap();
    assert_eq!(decrypted.len(), data.len());

    for (i, (&original, &recovered)) in data.iter().zip(&decrypted).enumerate() {
        // zero encodes to zero and is never recoverable
        let expected = if original == 0 { b'?' } else { original };
        assert_eq!(expected, recovered, "mismatch at byte {i}, input {data:?}");
    }
});
