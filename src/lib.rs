#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]

//! RSA key pairs with PKCS#1 v1.5 encryption and signatures.
//!
//! The crate is layered:
//!
//! - [`math`] and [`probably_prime`] provide the number theory,
//! - [`RsaPrivateKey`] and [`RsaPublicKey`] generate, validate and use keys
//!   with a [`PaddingScheme`] or [`SignatureScheme`],
//! - [`RsaPrivateKeyPair`] and [`RsaPublicKeyPair`] wrap a key behind a
//!   string interface: hex components, hex ciphertexts and signatures,
//!   caller supplied entropy seeds and PEM documents.
//!
//! All randomness comes from the caller, either as an RNG or as a [`Seed`].
//! Signing is deterministic.
//!
//! # Usage
//!
//! ## Key pairs
//!
//! ```
//! use rsa_engine::{KeyConfig, RsaPrivateKeyPair};
//!
//! # fn main() -> rsa_engine::Result<()> {
//! let seed = "c993abb954f4ad796efa851ce4276f12250633ec4a8da1d1c8f37a82b633c1b7";
//!
//! // Keys below 2048 bits need an explicit opt-in.
//! let config = KeyConfig::new().with_min_bits(1024)?;
//! let mut private_pair = RsaPrivateKeyPair::with_config(config);
//! let keys = private_pair.generate(1024, seed)?;
//! assert_eq!(keys.e, "10001");
//!
//! let public_pair = private_pair.public_pair()?;
//!
//! // Encrypt
//! let other_seed = "0000000000000000000000000000000000000000000000000000000000000001";
//! let ciphertext = public_pair.encrypt("hello world", other_seed)?;
//!
//! // Decrypt
//! assert_eq!(private_pair.decrypt(&ciphertext)?, "hello world");
//!
//! // Sign and verify
//! let signature = private_pair.sign_message("hello world")?;
//! assert!(public_pair.verify("hello world", &signature)?);
//! assert!(!public_pair.verify("goodbye world", &signature)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## PKCS#1 v1.5 encryption
//! ```
//! use rsa_engine::{KeyConfig, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
//! use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
//!
//! let mut rng = ChaCha20Rng::from_seed([7; 32]);
//!
//! let config = KeyConfig::new().with_min_bits(1024).unwrap();
//! let private_key = RsaPrivateKey::new_with_config(&mut rng, 1024, &config).expect("failed to generate a key");
//! let public_key = RsaPublicKey::from(&private_key);
//!
//! // Encrypt
//! let data = b"hello world";
//! let enc_data = public_key.encrypt(&mut rng, Pkcs1v15Encrypt, &data[..]).expect("failed to encrypt");
//! assert_ne!(&data[..], &enc_data[..]);
//!
//! // Decrypt
//! let dec_data = private_key.decrypt(Pkcs1v15Encrypt, &enc_data).expect("failed to decrypt");
//! assert_eq!(&data[..], &dec_data[..]);
//! ```
//!
//! ## PKCS#1 v1.5 signatures
//! ```
//! use rsa_engine::{KeyConfig, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
//! use rsa_engine::sha2::{Digest, Sha256};
//! use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
//!
//! let mut rng = ChaCha20Rng::from_seed([7; 32]);
//!
//! let config = KeyConfig::new().with_min_bits(1024).unwrap();
//! let private_key = RsaPrivateKey::new_with_config(&mut rng, 1024, &config).expect("failed to generate a key");
//! let public_key = private_key.to_public_key();
//!
//! // Sign
//! let hashed = Sha256::digest(b"hello world");
//! let signature = private_key.sign(Pkcs1v15Sign::new::<Sha256>(), &hashed).expect("failed to sign");
//!
//! // Verify
//! assert!(public_key.verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, &signature).unwrap());
//! ```
//!
//! ## Key encoding
//!
//! [`RsaPrivateKey`] and [`RsaPublicKey`] implement the [`pkcs8`] traits
//! and, through the blanket impls in [`pkcs1`], the PKCS#1 traits:
//!
//! - [`pkcs8::DecodePrivateKey`] / [`pkcs8::EncodePrivateKey`]: `PRIVATE KEY`
//! - [`pkcs8::DecodePublicKey`] / [`pkcs8::EncodePublicKey`]: `PUBLIC KEY`
//! - [`pkcs1::DecodeRsaPrivateKey`] / [`pkcs1::EncodeRsaPrivateKey`]: `RSA PRIVATE KEY`
//! - [`pkcs1::DecodeRsaPublicKey`] / [`pkcs1::EncodeRsaPublicKey`]: `RSA PUBLIC KEY`
//!
//! The key pair types pick the right decoder from the PEM label.
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # #[cfg(feature = "pem")]
//! # {
//! use rsa_engine::RsaPublicKeyPair;
//!
//! let pem = "-----BEGIN PUBLIC KEY-----
//! MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAtsQsUV8QpqrygsY+2+JC
//! Q6Fw8/omM71IM2N/R8pPbzbgOl0p78MZGsgPOQ2HSznjD0FPzsH8oO2B5Uftws04
//! LHb2HJAYlz25+lN5cqfHAfa3fgmC38FfwBkn7l582UtPWZ/wcBOnyCgb3yLcvJrX
//! yrt8QxHJgvWO23ITrUVYszImbXQ67YGS0YhMrbixRzmo2tpm3JcIBtnHrEUMsT0N
//! fFdfsZhTT8YbxBvA8FdODgEwx7u/vf3J9qbi4+Kv8cvqyJuleIRSjVXPsIMnoejI
//! n04APPKIjpMyQdnWlby7rNyQtE4+CV+jcFjqJbE/Xilcvqxt6DirjFCvYeKYl1uH
//! LwIDAQAB
//! -----END PUBLIC KEY-----";
//!
//! let mut public_pair = RsaPublicKeyPair::new();
//! let keys = public_pair.from_pem(pem)?;
//! assert_eq!(keys.e, "10001");
//! # }
//! # Ok(())
//! # }
//! ```

pub use num_bigint::BigUint;
pub use rand_core;

mod algorithms;
pub mod config;
mod dummy_rng;
mod encoding;
pub mod entropy;
pub mod errors;
mod key;
pub mod keypair;
pub mod math;
pub mod pkcs1v15;
mod prime;
mod prime_rand;
pub mod traits;

pub use pkcs1;
pub use pkcs8;
pub use sha2;

pub use crate::{
    config::{KeyConfig, ABSOLUTE_MIN_BITS, DEFAULT_EXPONENT, DEFAULT_MIN_BITS, MIN_PRIME_ROUNDS},
    entropy::Seed,
    errors::{Error, ErrorKind, Result},
    key::{check_public, RsaPrivateKey, RsaPublicKey},
    keypair::{PrivateKeyStrings, PublicKeyStrings, RsaPrivateKeyPair, RsaPublicKeyPair},
    pkcs1v15::{Pkcs1v15Encrypt, Pkcs1v15Sign},
    prime::probably_prime,
    prime_rand::RandPrime,
    traits::{PaddingScheme, PrivateKeyParts, PublicKeyParts, SignatureScheme},
};

#[cfg(feature = "hazmat")]
pub mod hazmat;
