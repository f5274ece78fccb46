use core::fmt;

use log::debug;
#[cfg(feature = "pem")]
use pkcs8::{der::pem::PemLabel, DecodePrivateKey, EncodePrivateKey, LineEnding};
#[cfg(feature = "pem")]
use zeroize::Zeroizing;

use super::{join_primes, message_digest, required_hex, split_primes, RsaPublicKeyPair};
use crate::config::KeyConfig;
use crate::entropy::Seed;
use crate::errors::{Error, Result};
use crate::key::RsaPrivateKey;
use crate::math::to_hex;
use crate::pkcs1v15::{Pkcs1v15Encrypt, Pkcs1v15Sign};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Textual components of a private key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKeyStrings {
    /// Modulus, hex.
    pub n: String,
    /// Public exponent, hex.
    pub e: String,
    /// Private exponent, hex.
    pub d: String,
    /// Prime factors, decimal, separated by [`PRIME_SEPARATOR`](super::PRIME_SEPARATOR).
    pub primes: String,
}

impl fmt::Debug for PrivateKeyStrings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyStrings")
            .field("n", &self.n)
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}

impl From<&RsaPrivateKey> for PrivateKeyStrings {
    fn from(key: &RsaPrivateKey) -> Self {
        PrivateKeyStrings {
            n: to_hex(key.n()),
            e: to_hex(key.e()),
            d: to_hex(key.d()),
            primes: join_primes(key.primes()),
        }
    }
}

/// A slot for one RSA private key, driven with strings.
///
/// ```
/// use rsa_engine::{KeyConfig, RsaPrivateKeyPair};
///
/// let config = KeyConfig::new().with_min_bits(1024)?;
/// let mut pair = RsaPrivateKeyPair::with_config(config);
/// pair.generate(
///     1024,
///     "c993abb954f4ad796efa851ce4276f12250633ec4a8da1d1c8f37a82b633c1b7",
/// )?;
///
/// let signature = pair.sign_message("hello")?;
/// assert!(pair.public_pair()?.verify("hello", &signature)?);
/// # Ok::<(), rsa_engine::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct RsaPrivateKeyPair {
    config: KeyConfig,
    key: Option<RsaPrivateKey>,
}

impl RsaPrivateKeyPair {
    /// An empty key pair with the default [`KeyConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty key pair generating keys with `config`.
    pub fn with_config(config: KeyConfig) -> Self {
        RsaPrivateKeyPair { config, key: None }
    }

    /// The configuration used by [`RsaPrivateKeyPair::generate`].
    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    /// Generates a fresh `bits` sized key from `seed` and replaces the
    /// current one.
    ///
    /// The seed is checked first: an empty seed fails with
    /// [`Error::MissingEntropy`] before any other validation.
    pub fn generate(&mut self, bits: usize, seed: &str) -> Result<PrivateKeyStrings> {
        let seed = Seed::from_hex(seed)?;
        self.config.check_bits(bits)?;

        let mut rng = seed.into_rng();
        let key = RsaPrivateKey::new_with_config(&mut rng, bits, &self.config)?;
        Ok(self.load(key))
    }

    /// Rebuilds a key from hex `n`, `d`, `e` and the decimal prime list.
    ///
    /// `d` is checked against each prime (`d * e = 1 mod p - 1`), so a
    /// private exponent reduced modulo `lcm(p - 1, q - 1)` is accepted.
    pub fn generate_from(
        &mut self,
        n: &str,
        d: &str,
        e: &str,
        primes: &str,
    ) -> Result<PrivateKeyStrings> {
        let n = required_hex("n", n)?;
        let d = required_hex("d", d)?;
        let e = required_hex("e", e)?;
        let primes = split_primes(primes)?;

        let key = RsaPrivateKey::from_components(n, e, d, primes)?;
        Ok(self.load(key))
    }

    /// Signs the SHA-256 digest of `message` with RSASSA-PKCS1-v1_5 and
    /// returns the signature as hex.
    ///
    /// Signing is deterministic.
    pub fn sign_message(&self, message: &str) -> Result<String> {
        let key = self.loaded()?;
        let signature = key.sign(Pkcs1v15Sign::new::<sha2::Sha256>(), &message_digest(message))?;
        Ok(hex::encode(signature))
    }

    /// Decrypts a hex ciphertext produced by
    /// [`RsaPublicKeyPair::encrypt`] and returns the UTF-8 plaintext.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let key = self.loaded()?;
        if ciphertext.is_empty() {
            return Err(Error::MalformedCiphertext);
        }
        let ciphertext = hex::decode(ciphertext).map_err(|_| Error::MalformedCiphertext)?;
        let plaintext = decrypt_block(key, &ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| Error::InvalidUtf8)
    }

    /// Decrypts a raw ciphertext.
    pub fn decrypt_bytes(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        decrypt_block(self.loaded()?, ciphertext)
    }

    /// Modulus as hex.
    pub fn get_n(&self) -> Result<String> {
        self.field("n").map(|key| to_hex(key.n()))
    }

    /// Public exponent as hex.
    pub fn get_e(&self) -> Result<String> {
        self.field("e").map(|key| to_hex(key.e()))
    }

    /// Private exponent as hex.
    pub fn get_d(&self) -> Result<String> {
        self.field("d").map(|key| to_hex(key.d()))
    }

    /// Prime factors in decimal, joined with `_`.
    pub fn get_primes(&self) -> Result<String> {
        self.field("primes").map(|key| join_primes(key.primes()))
    }

    /// All components at once.
    pub fn keys(&self) -> Result<PrivateKeyStrings> {
        self.loaded().map(PrivateKeyStrings::from)
    }

    /// The public half as a separate key pair.
    pub fn public_pair(&self) -> Result<RsaPublicKeyPair> {
        Ok(RsaPublicKeyPair::from(self.loaded()?.to_public_key()))
    }

    /// The loaded key, if any.
    pub fn key(&self) -> Option<&RsaPrivateKey> {
        self.key.as_ref()
    }

    /// Whether a key has been generated or imported.
    pub fn is_loaded(&self) -> bool {
        self.key.is_some()
    }

    /// Exports the key as a PKCS#8 `PRIVATE KEY` PEM document.
    #[cfg(feature = "pem")]
    pub fn to_pem(&self) -> Result<Zeroizing<String>> {
        let pem = self.loaded()?.to_pkcs8_pem(LineEnding::LF)?;
        debug!("exported private key as {}", pkcs8::PrivateKeyInfo::PEM_LABEL);
        Ok(pem)
    }

    /// Exports the key as a PKCS#1 `RSA PRIVATE KEY` PEM document.
    #[cfg(feature = "pem")]
    pub fn to_pkcs1_pem(&self) -> Result<Zeroizing<String>> {
        use pkcs1::EncodeRsaPrivateKey;

        let pem = self.loaded()?.to_pkcs1_pem(LineEnding::LF)?;
        debug!("exported private key as {}", pkcs1::RsaPrivateKey::PEM_LABEL);
        Ok(pem)
    }

    /// Imports a PKCS#8 `PRIVATE KEY` or PKCS#1 `RSA PRIVATE KEY` PEM
    /// document, chosen by its label, and replaces the current key.
    #[cfg(feature = "pem")]
    pub fn from_pem(&mut self, pem: &str) -> Result<PrivateKeyStrings> {
        use pkcs1::DecodeRsaPrivateKey;

        let label =
            pkcs8::der::pem::decode_label(pem.as_bytes()).map_err(|_| Error::PemParseError)?;
        debug!("importing private key from {}", label);

        let key = if label == pkcs8::PrivateKeyInfo::PEM_LABEL {
            RsaPrivateKey::from_pkcs8_pem(pem)?
        } else if label == pkcs1::RsaPrivateKey::PEM_LABEL {
            RsaPrivateKey::from_pkcs1_pem(pem)?
        } else {
            return Err(Error::UnsupportedKeyFormat);
        };

        Ok(self.load(key))
    }

    fn load(&mut self, key: RsaPrivateKey) -> PrivateKeyStrings {
        debug!("private key pair holds a {} bit key", key.n().bits());
        let strings = PrivateKeyStrings::from(&key);
        self.key = Some(key);
        strings
    }

    fn loaded(&self) -> Result<&RsaPrivateKey> {
        self.key.as_ref().ok_or(Error::NoKeyLoaded)
    }

    fn field(&self, name: &'static str) -> Result<&RsaPrivateKey> {
        self.key.as_ref().ok_or(Error::EmptyValue(name))
    }
}

fn decrypt_block(key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() > key.size() {
        return Err(Error::MalformedCiphertext);
    }
    key.decrypt(Pkcs1v15Encrypt, ciphertext)
}
