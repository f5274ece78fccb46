//! Key generation settings.

use num_bigint::BigUint;
use num_integer::Integer;

use crate::errors::{Error, Result};

/// Public exponent used when none is configured (`0x10001`).
pub const DEFAULT_EXPONENT: u64 = 65_537;

/// Smallest modulus size [`KeyConfig::default`] will generate.
pub const DEFAULT_MIN_BITS: usize = 2048;

/// Hard lower bound for [`KeyConfig::with_min_bits`].
///
/// Sizes between this and [`DEFAULT_MIN_BITS`] are deprecated and meant for
/// tests and legacy interop only.
pub const ABSOLUTE_MIN_BITS: usize = 1024;

/// Minimum number of Miller-Rabin rounds applied to every prime candidate.
pub const MIN_PRIME_ROUNDS: usize = 20;

/// Parameters for fresh key generation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyConfig {
    public_exponent: BigUint,
    min_bits: usize,
    prime_rounds: usize,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            public_exponent: BigUint::from(DEFAULT_EXPONENT),
            min_bits: DEFAULT_MIN_BITS,
            prime_rounds: MIN_PRIME_ROUNDS,
        }
    }
}

impl KeyConfig {
    /// Default settings: e = 65537, 2048 bit floor, 20 Miller-Rabin rounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another public exponent. It must be odd and at least 3.
    pub fn with_public_exponent(mut self, exp: BigUint) -> Result<Self> {
        if exp < BigUint::from(3u8) || exp.is_even() {
            return Err(Error::InvalidExponent);
        }
        self.public_exponent = exp;
        Ok(self)
    }

    /// Change the smallest modulus size accepted by key generation.
    pub fn with_min_bits(mut self, bits: usize) -> Result<Self> {
        if bits < ABSOLUTE_MIN_BITS {
            return Err(Error::KeyTooSmall);
        }
        self.min_bits = bits;
        Ok(self)
    }

    /// Change the number of Miller-Rabin rounds. Values below
    /// [`MIN_PRIME_ROUNDS`] are raised to it.
    pub fn with_prime_rounds(mut self, rounds: usize) -> Self {
        self.prime_rounds = rounds.max(MIN_PRIME_ROUNDS);
        self
    }

    /// Public exponent for new keys.
    pub fn public_exponent(&self) -> &BigUint {
        &self.public_exponent
    }

    /// Smallest accepted modulus size in bits.
    pub fn min_bits(&self) -> usize {
        self.min_bits
    }

    /// Miller-Rabin rounds per prime candidate.
    pub fn prime_rounds(&self) -> usize {
        self.prime_rounds
    }

    pub(crate) fn check_bits(&self, bits: usize) -> Result<()> {
        if bits == 0 || bits < self.min_bits {
            return Err(Error::InvalidBitLength);
        }
        Ok(())
    }
}
