//! Arbitrary precision helpers on top of [`BigUint`]: modular inverse,
//! gcd, the Jacobi symbol and the string encodings used at the key pair
//! boundary.
//!
//! Addition, multiplication, division and `modpow` come straight from
//! `num-bigint-dig`.

use core::mem;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::errors::{Error, Result};

/// Greatest common divisor.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Computes `a^-1 mod m` with the extended Euclidean algorithm.
///
/// Fails with [`Error::NoInverse`] when `gcd(a, m) != 1` or `m < 2`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m <= &BigUint::one() {
        return Err(Error::NoInverse);
    }

    let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
    let mut r0 = modulus.clone();
    let mut r1 = BigInt::from_biguint(Sign::Plus, a % m);
    let mut t0 = BigInt::zero();
    let mut t1 = BigInt::one();

    while !r1.is_zero() {
        let (q, r2) = r0.div_rem(&r1);
        let t2 = &t0 - &q * &t1;
        r0 = mem::replace(&mut r1, r2);
        t0 = mem::replace(&mut t1, t2);
    }

    if !r0.is_one() {
        return Err(Error::NoInverse);
    }

    if t0.is_negative() {
        t0 += &modulus;
    }

    t0.to_biguint().ok_or(Error::Internal)
}

/// Jacobi symbol `(a/n)` for odd `n`: one of 1, -1 or 0.
pub fn jacobi(a: &BigUint, n: &BigUint) -> isize {
    debug_assert!(n.is_odd(), "jacobi: n must be odd");

    let mut a = a % n;
    let mut n = n.clone();
    let mut j = 1;

    while !a.is_zero() {
        // handle factors of 2 in a
        while a.is_even() {
            a >>= 1;
            let r = low_bits(&n, 8);
            if r == 3 || r == 5 {
                j = -j;
            }
        }

        mem::swap(&mut a, &mut n);
        if low_bits(&a, 4) == 3 && low_bits(&n, 4) == 3 {
            j = -j;
        }
        a %= &n;
    }

    if n.is_one() {
        j
    } else {
        0
    }
}

/// `x mod m` for a small power of two `m`.
fn low_bits(x: &BigUint, m: u32) -> u32 {
    (x % m).to_u32().unwrap_or(0)
}

/// Lowercase hex, no prefix.
pub fn to_hex(x: &BigUint) -> String {
    x.to_str_radix(16)
}

/// Base 10.
pub fn to_decimal(x: &BigUint) -> String {
    x.to_str_radix(10)
}

/// Parses a hex string (either case, no prefix, no separators).
pub fn from_hex(field: &'static str, s: &str) -> Result<BigUint> {
    parse_radix(field, s, 16, |c| c.is_ascii_hexdigit())
}

/// Parses a decimal string (digits only).
pub fn from_decimal(field: &'static str, s: &str) -> Result<BigUint> {
    parse_radix(field, s, 10, |c| c.is_ascii_digit())
}

fn parse_radix(
    field: &'static str,
    s: &str,
    radix: u32,
    allowed: impl Fn(&u8) -> bool,
) -> Result<BigUint> {
    // `parse_bytes` tolerates '_' separators and a sign, the boundary format does not.
    if s.is_empty() || !s.as_bytes().iter().all(allowed) {
        return Err(Error::InvalidNumber { field });
    }
    BigUint::parse_bytes(s.as_bytes(), radix).ok_or(Error::InvalidNumber { field })
}
