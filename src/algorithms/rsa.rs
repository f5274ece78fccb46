//! Generic RSA implementation

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Error, Result};
use crate::math::mod_inverse;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// ⚠️ Raw RSA encryption of m with the public key. No padding is performed.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// or signature scheme. See the [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> Result<BigUint> {
    if m >= key.n() {
        return Err(Error::MessageTooLong);
    }
    Ok(m.modpow(key.e(), key.n()))
}

/// ⚠️ Performs raw RSA decryption with no padding or error checking.
///
/// Returns a plaintext `BigUint`. Performs RSA blinding if an `Rng` is passed.
/// Uses the CRT parameters when the key carries them.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// or signature scheme. See the [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_decrypt<R: CryptoRngCore + ?Sized>(
    rng: Option<&mut R>,
    priv_key: &impl PrivateKeyParts,
    c: &BigUint,
) -> Result<BigUint> {
    if priv_key.n().is_zero() {
        return Err(Error::InvalidPublicKey);
    }

    if c >= priv_key.n() {
        return Err(Error::MalformedCiphertext);
    }

    let mut unblinder = None;
    let c = match rng {
        Some(rng) => {
            let (blinded, ir) = blind(rng, priv_key, c);
            unblinder = Some(ir);
            Zeroizing::new(blinded)
        }
        None => Zeroizing::new(c.clone()),
    };

    let m = match (priv_key.dp(), priv_key.dq(), priv_key.qinv()) {
        (Some(dp), Some(dq), Some(qinv)) if priv_key.primes().len() == 2 => {
            // We have the precalculated values needed for the CRT.
            let p = &priv_key.primes()[0];
            let q = &priv_key.primes()[1];

            let m1 = Zeroizing::new(c.modpow(dp, p));
            let m2 = Zeroizing::new(c.modpow(dq, q));

            // h = qinv * (m1 - m2) mod p, kept non-negative by adding p first.
            let diff = Zeroizing::new((&*m1 + p - (&*m2 % p)) % p);
            let h = Zeroizing::new((&*diff * qinv) % p);

            &*m2 + &*h * q
        }
        _ => c.modpow(priv_key.d(), priv_key.n()),
    };

    match unblinder {
        Some(mut ir) => {
            let m = unblind(priv_key, &m, &ir);
            ir.zeroize();
            Ok(m)
        }
        None => Ok(m),
    }
}

/// ⚠️ Performs raw RSA decryption with no padding.
///
/// Returns a plaintext `BigUint`. Performs RSA blinding if an `Rng` is passed.  This will also
/// check for errors in the CRT computation.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// or signature scheme. See the [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_decrypt_and_check<R: CryptoRngCore + ?Sized>(
    priv_key: &impl PrivateKeyParts,
    rng: Option<&mut R>,
    c: &BigUint,
) -> Result<BigUint> {
    let m = rsa_decrypt(rng, priv_key, c)?;

    // In order to defend against errors in the CRT computation, m^e is
    // calculated, which should match the original ciphertext.
    let check = rsa_encrypt(priv_key, &m)?;

    if c != &check {
        return Err(Error::Internal);
    }

    Ok(m)
}

/// Returns the blinded c, along with the unblinding factor.
fn blind<R: CryptoRngCore + ?Sized, K: PublicKeyParts>(
    rng: &mut R,
    key: &K,
    c: &BigUint,
) -> (BigUint, BigUint) {
    // Blinding involves multiplying c by r^e.
    // Then the decryption operation performs (m^e * r^e)^d mod n
    // which equals mr mod n. The factor of r can then be removed
    // by multiplying by the multiplicative inverse of r.

    let mut r: BigUint;
    let unblinder;
    loop {
        r = rng.gen_biguint_below(key.n());
        if r.is_zero() {
            r = BigUint::one();
        }
        if let Ok(ir) = mod_inverse(&r, key.n()) {
            unblinder = ir;
            break;
        }
    }

    let c = {
        let mut rpowe = r.modpow(key.e(), key.n()); // N != 0
        let mut c = c * &rpowe;
        c %= key.n();

        rpowe.zeroize();

        c
    };
    r.zeroize();

    (c, unblinder)
}

/// Given an m and and unblinding factor, unblind the m.
fn unblind(key: &impl PublicKeyParts, m: &BigUint, unblinder: &BigUint) -> BigUint {
    (m * unblinder) % key.n()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RsaPrivateKey;
    use num_traits::Num;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    fn get_private_key() -> RsaPrivateKey {
        RsaPrivateKey::from_components(
            BigUint::from_str_radix("d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9", 16).unwrap(),
            BigUint::from(65537u32),
            BigUint::from_str_radix("5ff4a47e690ea338573e3d8b3fea5c32378ff4296855a51017cba86a9f3de9b1dc0fbe36c76b9bbd1c4a170a5f448c2a8489b3f3ac858be4aacb3daaa14dccc183622eedd3ae6f0427a2a298b51b97818a5430f13705f42d8b25476f939c935e389e30d9ade5d0180920135f5aef0c5fecd15f00b83b51dab8ba930d88826801", 16).unwrap(),
            vec![
                BigUint::from_str_radix("e882d12d5f0be26a80359f13c08210bdcbf759dfee695313efa8886919659b064e3c656a267af6275ed1af89a5dfe9e25b31a02bafbd59445b7507a22989a681", 16).unwrap(),
                BigUint::from_str_radix("e5a65cfa668bd857d59135a78c18c8adb7c222368e9d74abad8e83299f7ac3c2ad7aa44ddb05deea6d9b20dbaf09a8615284a17c72d3723240334685ea7e2559", 16).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn crt_matches_plain_exponentiation() {
        let key = get_private_key();
        for m in [1u64, 2, 42, 0xdead_beef, u64::MAX] {
            let m = BigUint::from(m);
            let c = rsa_encrypt(&key, &m).unwrap();
            assert_eq!(c.modpow(key.d(), key.n()), m);
            assert_eq!(rsa_decrypt::<ChaCha8Rng>(None, &key, &c).unwrap(), m);
        }
    }

    #[test]
    fn blinded_decrypt_matches() {
        let key = get_private_key();
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let m = BigUint::from(0x1234_5678u32);
        let c = rsa_encrypt(&key, &m).unwrap();
        for _ in 0..4 {
            assert_eq!(
                rsa_decrypt_and_check(&key, Some(&mut rng), &c).unwrap(),
                m
            );
        }
    }

    #[test]
    fn rejects_values_outside_modulus() {
        let key = get_private_key();
        let n = key.n().clone();
        assert_eq!(rsa_encrypt(&key, &n), Err(Error::MessageTooLong));
        assert_eq!(
            rsa_decrypt::<ChaCha8Rng>(None, &key, &n),
            Err(Error::MalformedCiphertext)
        );
    }
}
