//! Caller supplied entropy.

use core::fmt;

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Error, Result};

/// Length of a seed in bytes.
pub const SEED_LEN: usize = 32;

/// A 256 bit seed for one randomized operation.
///
/// The seed is consumed by [`Seed::into_rng`] and wiped on drop, so the same
/// seed value is never silently reused by the key pair types.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Wraps raw seed bytes.
    pub fn new(bytes: [u8; SEED_LEN]) -> Self {
        Seed(bytes)
    }

    /// Parses 64 hex characters.
    ///
    /// An empty string means no entropy was supplied and fails with
    /// [`Error::MissingEntropy`]; anything else that is not 32 hex encoded
    /// bytes fails with [`Error::InvalidSeed`].
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::MissingEntropy);
        }

        let mut bytes = [0u8; SEED_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidSeed)?;
        Ok(Seed(bytes))
    }

    /// Expands the seed into a CSPRNG.
    pub fn into_rng(self) -> ChaCha20Rng {
        ChaCha20Rng::from_seed(self.0)
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl ZeroizeOnDrop for Seed {}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}
