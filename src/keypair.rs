//! String-typed key pairs.
//!
//! [`RsaPrivateKeyPair`] and [`RsaPublicKeyPair`] hold at most one key each
//! and exchange values in the textual conventions below:
//!
//! - `n`, `e` and `d` are lowercase hexadecimal without prefix,
//! - prime factors are decimal, joined with [`PRIME_SEPARATOR`] in the order
//!   `p`, `q`,
//! - signatures and ciphertexts are lowercase hexadecimal of exactly as many
//!   bytes as the modulus,
//! - entropy seeds are 64 hexadecimal characters (see [`Seed`](crate::Seed)).
//!
//! Every operation either succeeds completely or leaves the key pair as it
//! was before the call.

mod private_pair;
mod public_pair;

pub use self::private_pair::{PrivateKeyStrings, RsaPrivateKeyPair};
pub use self::public_pair::{PublicKeyStrings, RsaPublicKeyPair};

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::errors::{Error, Result};
use crate::math::{from_decimal, from_hex, to_decimal};

/// Separator between the decimal prime factors of a private key.
pub const PRIME_SEPARATOR: char = '_';

fn join_primes(primes: &[BigUint]) -> String {
    primes
        .iter()
        .map(to_decimal)
        .collect::<Vec<_>>()
        .join(&PRIME_SEPARATOR.to_string())
}

fn split_primes(primes: &str) -> Result<Vec<BigUint>> {
    if primes.is_empty() {
        return Err(Error::EmptyPrimes);
    }
    primes
        .split(PRIME_SEPARATOR)
        .map(|prime| from_decimal("primes", prime))
        .collect()
}

/// Parses a required hex field, empty input is a missing field.
fn required_hex(field: &'static str, value: &str) -> Result<BigUint> {
    if value.is_empty() {
        return Err(Error::MissingField(field));
    }
    from_hex(field, value)
}

/// SHA-256 of the UTF-8 message, the digest that gets signed.
fn message_digest(message: &str) -> Vec<u8> {
    Sha256::digest(message.as_bytes()).to_vec()
}
