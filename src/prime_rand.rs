//! Generation of random primes.

use log::trace;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand_core::CryptoRngCore;

use crate::config::MIN_PRIME_ROUNDS;
use crate::errors::{Error, Result};
use crate::prime::{probably_prime, SMALL_PRIMES, SMALL_PRIMES_PRODUCT};

/// A generic trait for generating random primes.
///
/// *Warning*: This is highly dependent on the provided random number generator
/// to provide actually random primes.
///
/// # Example
/// ```
/// use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
/// use rsa_engine::RandPrime;
///
/// let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
/// let p = rng.gen_prime(256).unwrap();
/// assert_eq!(p.bits(), 256);
/// ```
pub trait RandPrime {
    /// Generate a random prime number with exactly `bits` bits.
    fn gen_prime(&mut self, bits: usize) -> Result<BigUint> {
        self.gen_prime_with_rounds(bits, MIN_PRIME_ROUNDS)
    }

    /// Like [`RandPrime::gen_prime`] with a custom number of Miller-Rabin
    /// rounds per candidate.
    fn gen_prime_with_rounds(&mut self, bits: usize, rounds: usize) -> Result<BigUint>;
}

impl<R: CryptoRngCore + ?Sized> RandPrime for R {
    fn gen_prime_with_rounds(&mut self, bit_size: usize, rounds: usize) -> Result<BigUint> {
        if bit_size < 2 {
            return Err(Error::InvalidBitLength);
        }

        let mut b = bit_size % 8;
        if b == 0 {
            b = 8;
        }

        let bytes_len = (bit_size + 7) / 8;
        let mut bytes = vec![0u8; bytes_len];

        loop {
            self.fill_bytes(&mut bytes);
            // Clear bits in the first byte to make sure the candidate has a size <= bits.
            bytes[0] &= ((1u32 << (b as u32)) - 1) as u8;

            // Set the top two bits so that the product of two such primes is
            // never one bit short.
            if b >= 2 {
                bytes[0] |= 3u8.wrapping_shl(b as u32 - 2);
            } else {
                // Here b==1, because b cannot be zero.
                bytes[0] |= 1;
                if bytes_len > 1 {
                    bytes[1] |= 0x80;
                }
            }

            // Make the value odd since an even number this large certainly isn't prime.
            bytes[bytes_len - 1] |= 1u8;

            let mut p = BigUint::from_bytes_be(&bytes);
            let rem = (&p % SMALL_PRIMES_PRODUCT).to_u64().ok_or(Error::Internal)?;

            'next: for delta in (0..1u64 << 20).step_by(2) {
                let m = rem + delta;

                for prime in &SMALL_PRIMES {
                    if m % u64::from(*prime) == 0 && (bit_size > 6 || m != u64::from(*prime)) {
                        continue 'next;
                    }
                }

                if delta > 0 {
                    p += delta;
                }

                break;
            }

            // Adding delta may have pushed the number one bit too long.
            if p.bits() == bit_size && probably_prime(&p, rounds) {
                return Ok(p);
            }

            trace!("rejected {} bit prime candidate", bit_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    #[test]
    fn test_prime_small() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        for n in 2..10 {
            let p = rng.gen_prime(n).unwrap();

            assert_eq!(p.bits(), n);
            assert!(probably_prime(&p, 32));
        }
    }

    #[test]
    fn test_gen_prime_1024() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let p = rng.gen_prime(1024).unwrap();
        assert_eq!(p.bits(), 1024);
    }

    #[test]
    fn same_seed_same_prime() {
        let a = ChaCha8Rng::from_seed([42u8; 32]).gen_prime(128).unwrap();
        let b = ChaCha8Rng::from_seed([42u8; 32]).gen_prime(128).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_tiny_sizes() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        assert_eq!(rng.gen_prime(0), Err(Error::InvalidBitLength));
        assert_eq!(rng.gen_prime(1), Err(Error::InvalidBitLength));
    }
}
