//! Generate prime components for the RSA Private Key

use log::debug;
use num_bigint::BigUint;
use num_traits::One;
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};
use crate::math::mod_inverse;
use crate::prime_rand::RandPrime;

pub(crate) struct RsaPrivateKeyComponents {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
    pub primes: Vec<BigUint>,
}

/// Generates a two prime RSA keypair of exactly `bit_size` bits with public
/// exponent `exp`, drawing primes from `rng`.
///
/// p gets `bit_size / 2` bits and q the rest. The pair is redrawn when the
/// primes collide, when their product comes out one bit short, or when `exp`
/// is not invertible modulo (p-1)(q-1). `exp` itself is never changed.
pub(crate) fn generate_two_prime_key<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
    rounds: usize,
) -> Result<RsaPrivateKeyComponents> {
    const NPRIMES: usize = 2;

    if bit_size < 64 {
        let prime_limit = (1u64 << (bit_size / NPRIMES) as u64) as f64;

        // pi approximates the number of primes less than prime_limit
        let mut pi = prime_limit / ((bit_size / NPRIMES) as f64 * core::f64::consts::LN_2 - 1.);
        // Generated primes start with 0b11, so we can only use a quarter of them.
        pi /= 4f64;
        // Use a factor of two to ensure that key generation terminates in a
        // reasonable amount of time.
        pi /= 2f64;

        if !(pi >= NPRIMES as f64) {
            return Err(Error::InvalidBitLength);
        }
    }

    debug!("generating {} bit key", bit_size);

    let one = BigUint::one();
    let mut draws = 0usize;

    loop {
        draws += 1;

        let p = rng.gen_prime_with_rounds(bit_size / NPRIMES, rounds)?;
        let q = rng.gen_prime_with_rounds(bit_size - p.bits(), rounds)?;

        if p == q {
            continue;
        }

        let n = &p * &q;
        if n.bits() != bit_size {
            continue;
        }

        let totient = (&p - &one) * (&q - &one);
        let d = match mod_inverse(exp, &totient) {
            Ok(d) => d,
            Err(Error::NoInverse) => continue,
            Err(err) => return Err(err),
        };

        debug!("generated {} bit key after {} prime pair draws", bit_size, draws);

        return Ok(RsaPrivateKeyComponents {
            n,
            e: exp.clone(),
            d,
            primes: vec![p, q],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_PRIME_ROUNDS;
    use num_integer::Integer;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const EXP: u64 = 65537;

    #[test]
    fn test_impossible_keys() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let exp = BigUint::from(EXP);

        for i in 0..8 {
            assert_eq!(
                generate_two_prime_key(&mut rng, i, &exp, MIN_PRIME_ROUNDS).err(),
                Some(Error::InvalidBitLength),
                "{} bits",
                i
            );
        }
        for i in 8..32 {
            let _ = generate_two_prime_key(&mut rng, i, &exp, MIN_PRIME_ROUNDS);
        }
    }

    macro_rules! key_generation {
        ($name:ident, $size:expr) => {
            #[test]
            fn $name() {
                let mut rng = ChaCha8Rng::from_seed([42; 32]);
                let exp = BigUint::from(EXP);
                for _ in 0..4 {
                    let components =
                        generate_two_prime_key(&mut rng, $size, &exp, MIN_PRIME_ROUNDS).unwrap();
                    assert_eq!(components.n.bits(), $size);
                    assert_eq!(components.primes.len(), 2);
                    assert_ne!(components.primes[0], components.primes[1]);
                    assert_eq!(&components.primes[0] * &components.primes[1], components.n);

                    let one = BigUint::one();
                    let totient =
                        (&components.primes[0] - &one) * (&components.primes[1] - &one);
                    assert!(((&components.d * &components.e) % &totient).is_one());
                }
            }
        };
    }

    key_generation!(key_generation_128, 128);
    key_generation!(key_generation_129, 129);
    key_generation!(key_generation_512, 512);
    key_generation!(key_generation_1024, 1024);

    #[test]
    fn exponent_three_is_kept() {
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let exp = BigUint::from(3u8);
        let components = generate_two_prime_key(&mut rng, 256, &exp, MIN_PRIME_ROUNDS).unwrap();
        assert_eq!(components.e, exp);
        for prime in &components.primes {
            assert!((prime - BigUint::one()).gcd(&exp).is_one());
        }
    }
}
