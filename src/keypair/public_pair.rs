use log::debug;
#[cfg(feature = "pem")]
use pkcs8::{der::pem::PemLabel, DecodePublicKey, EncodePublicKey, LineEnding};

use super::message_digest;
use crate::entropy::Seed;
use crate::errors::{Error, Result};
use crate::key::RsaPublicKey;
use crate::math::{from_hex, to_hex};
use crate::pkcs1v15::{Pkcs1v15Encrypt, Pkcs1v15Sign};
use crate::traits::PublicKeyParts;

/// Textual components of a public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyStrings {
    /// Modulus, hex.
    pub n: String,
    /// Public exponent, hex.
    pub e: String,
}

impl From<&RsaPublicKey> for PublicKeyStrings {
    fn from(key: &RsaPublicKey) -> Self {
        PublicKeyStrings {
            n: to_hex(key.n()),
            e: to_hex(key.e()),
        }
    }
}

/// A slot for one RSA public key, driven with strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RsaPublicKeyPair {
    key: Option<RsaPublicKey>,
}

impl From<RsaPublicKey> for RsaPublicKeyPair {
    fn from(key: RsaPublicKey) -> Self {
        RsaPublicKeyPair { key: Some(key) }
    }
}

impl RsaPublicKeyPair {
    /// An empty public key pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the public key `(n, e)` given in hex.
    ///
    /// Empty, non-hex or unusable values (`n <= 1`, `e < 2`, `e >= n`) fail
    /// with [`Error::InvalidPublicKey`]. The modulus is not checked for
    /// primality or factored.
    ///
    /// The components are normalised: the returned and stored strings are
    /// lowercase without leading zeros, so they equal the inputs only when
    /// those are already in that form.
    pub fn create(&mut self, n: &str, e: &str) -> Result<PublicKeyStrings> {
        let n = from_hex("n", n).map_err(|_| Error::InvalidPublicKey)?;
        let e = from_hex("e", e).map_err(|_| Error::InvalidPublicKey)?;
        let key = RsaPublicKey::new(n, e)?;
        Ok(self.load(key))
    }

    /// Encrypts the UTF-8 `message` with PKCS#1 v1.5 padding drawn from
    /// `seed` and returns the ciphertext as hex.
    pub fn encrypt(&self, message: &str, seed: &str) -> Result<String> {
        self.encrypt_bytes(message.as_bytes(), seed).map(hex::encode)
    }

    /// Encrypts raw bytes.
    pub fn encrypt_bytes(&self, message: &[u8], seed: &str) -> Result<Vec<u8>> {
        let key = self.loaded()?;
        let mut rng = Seed::from_hex(seed)?.into_rng();
        key.encrypt(&mut rng, Pkcs1v15Encrypt, message)
    }

    /// Checks a hex signature made by
    /// [`RsaPrivateKeyPair::sign_message`](super::RsaPrivateKeyPair::sign_message).
    ///
    /// A well formed signature that does not match yields `Ok(false)`.
    /// Empty or non-hex input and values that do not fit the modulus fail
    /// with [`Error::MalformedSignature`].
    pub fn verify(&self, message: &str, signature: &str) -> Result<bool> {
        let key = self.loaded()?;
        if signature.is_empty() {
            return Err(Error::MalformedSignature);
        }
        let signature = hex::decode(signature).map_err(|_| Error::MalformedSignature)?;
        key.verify(
            Pkcs1v15Sign::new::<sha2::Sha256>(),
            &message_digest(message),
            &signature,
        )
    }

    /// Modulus as hex.
    pub fn get_n(&self) -> Result<String> {
        self.field("n").map(|key| to_hex(key.n()))
    }

    /// Public exponent as hex.
    pub fn get_e(&self) -> Result<String> {
        self.field("e").map(|key| to_hex(key.e()))
    }

    /// Both components at once.
    pub fn keys(&self) -> Result<PublicKeyStrings> {
        self.loaded().map(PublicKeyStrings::from)
    }

    /// The loaded key, if any.
    pub fn key(&self) -> Option<&RsaPublicKey> {
        self.key.as_ref()
    }

    /// Whether a key has been created or imported.
    pub fn is_loaded(&self) -> bool {
        self.key.is_some()
    }

    /// Exports the key as an SPKI `PUBLIC KEY` PEM document.
    #[cfg(feature = "pem")]
    pub fn to_pem(&self) -> Result<String> {
        let pem = self.loaded()?.to_public_key_pem(LineEnding::LF)?;
        debug!("exported public key as {}", pkcs8::SubjectPublicKeyInfoRef::PEM_LABEL);
        Ok(pem)
    }

    /// Exports the key as a PKCS#1 `RSA PUBLIC KEY` PEM document.
    #[cfg(feature = "pem")]
    pub fn to_pkcs1_pem(&self) -> Result<String> {
        use pkcs1::EncodeRsaPublicKey;

        let pem = self.loaded()?.to_pkcs1_pem(LineEnding::LF)?;
        debug!("exported public key as {}", pkcs1::RsaPublicKey::PEM_LABEL);
        Ok(pem)
    }

    /// Imports an SPKI `PUBLIC KEY` or PKCS#1 `RSA PUBLIC KEY` PEM document,
    /// chosen by its label, and replaces the current key.
    #[cfg(feature = "pem")]
    pub fn from_pem(&mut self, pem: &str) -> Result<PublicKeyStrings> {
        use pkcs1::DecodeRsaPublicKey;

        let label =
            pkcs8::der::pem::decode_label(pem.as_bytes()).map_err(|_| Error::PemParseError)?;
        debug!("importing public key from {}", label);

        let key = if label == pkcs8::SubjectPublicKeyInfoRef::PEM_LABEL {
            RsaPublicKey::from_public_key_pem(pem)?
        } else if label == pkcs1::RsaPublicKey::PEM_LABEL {
            RsaPublicKey::from_pkcs1_pem(pem)?
        } else {
            return Err(Error::UnsupportedKeyFormat);
        };

        Ok(self.load(key))
    }

    fn load(&mut self, key: RsaPublicKey) -> PublicKeyStrings {
        debug!("public key pair holds a {} bit key", key.n().bits());
        let strings = PublicKeyStrings::from(&key);
        self.key = Some(key);
        strings
    }

    fn loaded(&self) -> Result<&RsaPublicKey> {
        self.key.as_ref().ok_or(Error::NoKeyLoaded)
    }

    fn field(&self, name: &'static str) -> Result<&RsaPublicKey> {
        self.key.as_ref().ok_or(Error::EmptyValue(name))
    }
}
