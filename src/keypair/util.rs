// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;
use rand::Rng;
use rand::seq::index;

use crate::config::MAX_PRIME;
use crate::error::{Error, Result};

/// Primes `p` with `min ≤ p ≤ max` and `p ≡ 3 (mod 4)`, ascending.
///
/// Runs a sieve of Eratosthenes over `[0, max]`, so `max` bounds both the
/// memory and the time spent here. Bounds above [`MAX_PRIME`] are rejected.
pub fn generate_primes(min: u64, max: u64) -> Result<Vec<u64>> {
    if min > max {
        return Err(Error::InvalidPrimeRange { min, max });
    }

    if max > MAX_PRIME {
        return Err(Error::Config(format!("prime bound {max} exceeds {MAX_PRIME}")));
    }

    let limit = usize::try_from(max)
        .map_err(|_| Error::Config(format!("prime bound {max} exceeds the address space")))?;
    let len = limit
        .checked_add(1)
        .ok_or_else(|| Error::Config(format!("prime bound {max} exceeds the address space")))?;

    let mut sieve = vec![true; len];
    sieve[0] = false;
    if limit >= 1 {
        sieve[1] = false;
    }

    let mut current = 2usize;
    while let Some(square) = current.checked_mul(current).filter(|&square| square <= limit) {
        if sieve[current] {
            for multiple in (square..=limit).step_by(current) {
                sieve[multiple] = false;
            }
        }
        current += 1;
    }

    Ok(sieve
        .iter()
        .enumerate()
        .filter(|&(num, &is_prime)| is_prime && num as u64 >= min && num % 4 == 3)
        .map(|(num, _)| num as u64)
        .collect())
}

/// Draw two distinct primes from `[min, max]` uniformly at random.
///
/// Fails with [`Error::InsufficientPrimes`] when the range holds fewer than
/// two qualifying primes.
pub fn pick_prime_pair<R: Rng + ?Sized>(min: u64, max: u64, rng: &mut R) -> Result<(BigUint, BigUint)> {
    let primes = generate_primes(min, max)?;
    if primes.len() < 2 {
        return Err(Error::InsufficientPrimes { min, max, found: primes.len() });
    }

    tracing::debug!(pool = primes.len(), min, max, "sampling prime pair");

    let picked = index::sample(rng, primes.len(), 2);
    let p = primes[picked.index(0)];
    let q = primes[picked.index(1)];

    Ok((BigUint::from(p), BigUint::from(q)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn small_range() {
        assert_eq!(generate_primes(0, 30).unwrap(), vec![3, 7, 11, 19, 23]);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(generate_primes(1019, 1031).unwrap(), vec![1019, 1031]);
    }

    #[test]
    fn default_range_pool() {
        let primes = generate_primes(1000, 10000).unwrap();
        assert_eq!(primes.len(), 532);
        assert_eq!(&primes[..4], &[1019, 1031, 1039, 1051]);
        assert!(primes.iter().all(|p| p % 4 == 3));
    }

    #[test]
    fn degenerate_ranges() {
        assert!(generate_primes(0, 0).unwrap().is_empty());
        assert!(generate_primes(0, 1).unwrap().is_empty());
        assert!(generate_primes(1000, 1018).unwrap().is_empty());
    }

    #[test]
    fn oversized_bound_is_rejected() {
        assert!(matches!(generate_primes(0, u64::MAX), Err(Error::Config(_))));
        assert!(matches!(generate_primes(0, MAX_PRIME + 1), Err(Error::Config(_))));

        let primes = generate_primes(65_000, MAX_PRIME).unwrap();
        assert_eq!(primes.last(), Some(&65_519));
    }

    #[test]
    fn inverted_range() {
        let result = generate_primes(10, 5);
        assert!(matches!(result, Err(Error::InvalidPrimeRange { min: 10, max: 5 })));
    }

    #[test]
    fn pair_is_distinct_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let (p, q) = pick_prime_pair(1000, 10000, &mut rng).unwrap();
            assert_ne!(p, q);
            assert!(p >= BigUint::from(1019u32) && p <= BigUint::from(10000u32));
            assert!(q >= BigUint::from(1019u32) && q <= BigUint::from(10000u32));
        }
    }

    #[test]
    fn pair_from_two_element_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let (p, q) = pick_prime_pair(1019, 1031, &mut rng).unwrap();
        let mut pair = [p, q];
        pair.sort();
        assert_eq!(pair, [BigUint::from(1019u32), BigUint::from(1031u32)]);
    }

    #[test]
    fn pool_too_small() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = pick_prime_pair(1020, 1030, &mut rng);
        assert!(matches!(result, Err(Error::InsufficientPrimes { found: 0, .. })));

        let result = pick_prime_pair(1019, 1030, &mut rng);
        assert!(matches!(result, Err(Error::InsufficientPrimes { found: 1, .. })));
    }
}
