//! Error types.

use pkcs8::der;

/// Alias for [`core::result::Result`] with the `rsa_engine` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Broad class of a failure.
///
/// Every [`Error`] belongs to exactly one class, see [`Error::kind`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The caller supplied input of the wrong shape: missing fields,
    /// non-numeric values, an uninitialized key pair.
    Validation,
    /// Key material failed a mathematical check.
    CryptoInvariant,
    /// Hex, PEM, DER or padding structure could not be parsed.
    Format,
    /// The operation would weaken security (no entropy, undersized key).
    SecurityPrecondition,
}

/// Error types
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Requested key size is zero or below the configured floor.
    #[error("invalid bit length")]
    InvalidBitLength,

    /// A required input value was empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The prime list of a key was empty.
    #[error("prime list is empty")]
    EmptyPrimes,

    /// A numeric string could not be parsed.
    #[error("invalid number in field {field}")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Public key components are missing or unusable.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Public exponent is even or smaller than three.
    #[error("invalid public exponent")]
    InvalidExponent,

    /// The entropy seed is not 32 hex encoded bytes.
    #[error("invalid entropy seed")]
    InvalidSeed,

    /// Plaintext does not fit in a padded block for this modulus.
    #[error("message too long")]
    MessageTooLong,

    /// The key pair holds no key material yet.
    #[error("no key loaded")]
    NoKeyLoaded,

    /// An accessor was called on a key pair that holds no key material.
    #[error("value not set: {0}")]
    EmptyValue(&'static str),

    /// Supplied components do not form a consistent key.
    #[error("key components do not match")]
    KeyMismatch,

    /// No modular inverse exists because the operands are not coprime.
    #[error("no modular inverse")]
    NoInverse,

    /// A prime factor is not usable.
    #[error("invalid prime value")]
    InvalidPrime,

    /// Signature is not hex or does not fit the modulus.
    #[error("malformed signature")]
    MalformedSignature,

    /// Ciphertext is not hex or does not fit the modulus.
    #[error("malformed ciphertext")]
    MalformedCiphertext,

    /// Recovered block does not carry valid padding.
    #[error("decryption error")]
    PaddingError,

    /// Decrypted bytes are not valid UTF-8 text.
    #[error("decrypted message is not valid utf-8")]
    InvalidUtf8,

    /// PEM armor, Base64 body or DER framing is broken.
    #[error("failed to parse PEM document")]
    PemParseError,

    /// The document parsed but is not a supported RSA key.
    #[error("unsupported key format")]
    UnsupportedKeyFormat,

    /// No entropy seed was supplied.
    #[error("missing entropy seed")]
    MissingEntropy,

    /// Configured key size floor is below the hard minimum.
    #[error("key size below the safe minimum")]
    KeyTooSmall,

    /// Internal consistency check failed.
    #[error("internal error")]
    Internal,
}

impl Error {
    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBitLength
            | Error::MissingField(_)
            | Error::EmptyPrimes
            | Error::InvalidNumber { .. }
            | Error::InvalidPublicKey
            | Error::InvalidExponent
            | Error::InvalidSeed
            | Error::MessageTooLong
            | Error::NoKeyLoaded
            | Error::EmptyValue(_) => ErrorKind::Validation,
            Error::KeyMismatch | Error::NoInverse | Error::InvalidPrime | Error::Internal => {
                ErrorKind::CryptoInvariant
            }
            Error::MalformedSignature
            | Error::MalformedCiphertext
            | Error::PaddingError
            | Error::InvalidUtf8
            | Error::PemParseError
            | Error::UnsupportedKeyFormat => ErrorKind::Format,
            Error::MissingEntropy | Error::KeyTooSmall => ErrorKind::SecurityPrecondition,
        }
    }
}

/// Framing problems (bad armor, truncated or overlong TLVs) are parse errors,
/// a well framed document with unexpected content is an unsupported format.
fn from_der_error(err: &der::Error) -> Error {
    match err.kind() {
        der::ErrorKind::TagUnexpected { .. }
        | der::ErrorKind::Value { .. }
        | der::ErrorKind::OidUnknown { .. } => Error::UnsupportedKeyFormat,
        _ => Error::PemParseError,
    }
}

impl From<pkcs8::spki::Error> for Error {
    fn from(err: pkcs8::spki::Error) -> Error {
        match err {
            pkcs8::spki::Error::Asn1(ref e) => from_der_error(e),
            _ => Error::UnsupportedKeyFormat,
        }
    }
}

impl From<pkcs8::Error> for Error {
    fn from(err: pkcs8::Error) -> Error {
        match err {
            pkcs8::Error::Asn1(ref e) => from_der_error(e),
            pkcs8::Error::PublicKey(e) => e.into(),
            _ => Error::UnsupportedKeyFormat,
        }
    }
}

impl From<pkcs1::Error> for Error {
    fn from(err: pkcs1::Error) -> Error {
        match err {
            pkcs1::Error::Asn1(ref e) => from_der_error(e),
            pkcs1::Error::Pkcs8(e) => e.into(),
            _ => Error::UnsupportedKeyFormat,
        }
    }
}
