// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Extended Euclid: returns `(g, x, y)` with `a·x + b·y = g = gcd(a, b)`.
pub fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt, BigInt) {
    if a.is_zero() {
        return (b.clone(), BigInt::zero(), BigInt::one());
    }

    let (gcd, x, y) = extended_gcd(&(b % a), a);
    let quotient = signed(&(b / a));
    (gcd, y - quotient * &x, x)
}

/// Bézout coefficients `(a, b)` with `a·p + b·q = 1`.
///
/// Computed once per decryption call and shared by every block of that
/// stream. They depend only on the primes, never on block data.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Bezout {
    a: BigInt,
    b: BigInt,
}

impl Bezout {
    /// Fails with [`Error::NotCoprime`] when `gcd(p, q) ≠ 1`.
    pub fn new(p: &BigUint, q: &BigUint) -> Result<Self> {
        let (gcd, a, b) = extended_gcd(p, q);
        if !gcd.is_one() {
            return Err(Error::NotCoprime(gcd));
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &BigInt {
        &self.a
    }

    pub fn b(&self) -> &BigInt {
        &self.b
    }
}

/// The four square roots of `c` modulo `n = p·q`, in the order
/// `[x, y, n − x, n − y]`.
///
/// Both primes must be ≡ 3 (mod 4), otherwise [`Error::NotBlumPrime`]: the
/// per-prime roots are taken in closed form as `c^((p+1)/4) mod p`. When `c`
/// is not a quadratic residue the returned values are still well defined,
/// they just do not square to `c`.
pub fn square_roots(c: &BigUint, p: &BigUint, q: &BigUint, bezout: &Bezout) -> Result<[BigUint; 4]> {
    for prime in [p, q] {
        if !is_blum_prime(prime) {
            return Err(Error::NotBlumPrime(prime.clone()));
        }
    }

    let four = BigUint::from(4u32);
    let r = c.modpow(&((p + BigUint::one()) / &four), p);
    let s = c.modpow(&((q + BigUint::one()) / &four), q);

    let n = p * q;
    let n_signed = signed(&n);

    let aps = &bezout.a * signed(p) * signed(&s);
    let bqr = &bezout.b * signed(q) * signed(&r);

    let x = reduce(&(&aps + &bqr), &n_signed)?;
    let y = reduce(&(&aps - &bqr), &n_signed)?;

    let neg_x = &n - &x;
    let neg_y = &n - &y;
    Ok([x, y, neg_x, neg_y])
}

/// Whether `p ≡ 3 (mod 4)`.
#[inline]
pub(crate) fn is_blum_prime(p: &BigUint) -> bool {
    p % BigUint::from(4u32) == BigUint::from(3u32)
}

#[inline]
fn signed(value: &BigUint) -> BigInt {
    BigInt::from_biguint(Sign::Plus, value.clone())
}

/// Reduce `value` into `[0, n)`.
fn reduce(value: &BigInt, n: &BigInt) -> Result<BigUint> {
    let mut residue = value % n;
    if residue.is_negative() {
        residue += n;
    }
    residue
        .to_biguint()
        .ok_or_else(|| Error::DecryptionFailed("CRT residue is negative".into()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn extended_gcd_small_primes() {
        let (gcd, x, y) = extended_gcd(&big(11), &big(19));
        assert!(gcd.is_one());
        assert_eq!(x, BigInt::from(7));
        assert_eq!(y, BigInt::from(-4));
    }

    #[test]
    fn extended_gcd_satisfies_identity() {
        for (a, b) in [(1019u64, 1031u64), (240, 46), (0, 9), (9, 0), (35, 64), (9967, 9931)] {
            let (gcd, x, y) = extended_gcd(&big(a), &big(b));
            let lhs = signed(&big(a)) * x + signed(&big(b)) * y;
            assert_eq!(lhs, signed(&gcd), "a = {a}, b = {b}");
        }
        assert_eq!(extended_gcd(&big(240), &big(46)).0, big(2));
    }

    #[test]
    fn bezout_rejects_shared_factor() {
        assert!(matches!(Bezout::new(&big(21), &big(33)), Err(Error::NotCoprime(g)) if g == big(3)));
        assert!(matches!(Bezout::new(&big(19), &big(19)), Err(Error::NotCoprime(_))));
    }

    #[test]
    fn bezout_coefficients() {
        let bezout = Bezout::new(&big(1019), &big(1031)).unwrap();
        assert_eq!(bezout.a(), &BigInt::from(-86));
        assert_eq!(bezout.b(), &BigInt::from(85));
    }

    #[test]
    fn roots_of_encrypted_a() {
        let (p, q) = (big(1019), big(1031));
        let bezout = Bezout::new(&p, &q).unwrap();

        let roots = square_roots(&big(969_351), &p, &q, &bezout).unwrap();
        assert_eq!(roots, [big(143_446), big(8385), big(907_143), big(1_042_204)]);
    }

    #[test]
    fn every_root_squares_back() {
        let (p, q) = (big(11), big(19));
        let n = &p * &q;
        let bezout = Bezout::new(&p, &q).unwrap();

        for m in 0u64..209 {
            let c = big(m * m) % &n;
            let roots = square_roots(&c, &p, &q, &bezout).unwrap();
            assert!(roots.contains(&big(m)) || roots.contains(&(&n - big(m))), "m = {m}");
            for root in roots {
                assert_eq!((&root * &root) % &n, c, "m = {m}");
            }
        }
    }

    #[test]
    fn roots_need_blum_primes() {
        let (p, q) = (big(13), big(19));
        let bezout = Bezout::new(&p, &q).unwrap();

        let result = square_roots(&big(4), &p, &q, &bezout);
        assert!(matches!(result, Err(Error::NotBlumPrime(bad)) if bad == big(13)));

        let result = square_roots(&big(4), &q, &p, &bezout);
        assert!(matches!(result, Err(Error::NotBlumPrime(bad)) if bad == big(13)));
    }

    #[test]
    fn blum_prime_check() {
        assert!(is_blum_prime(&big(3)));
        assert!(is_blum_prime(&big(1019)));
        assert!(!is_blum_prime(&big(13)));
        assert!(!is_blum_prime(&big(2)));
    }
}
