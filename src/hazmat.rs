//! ⚠️ Raw RSA primitives.
//!
//! # ☢️️ WARNING: HAZARDOUS API ☢️
//!
//! The functions here apply the RSA permutation `m^e mod n` and its inverse
//! directly to integers. Nothing is padded or unpadded, so the output is
//! malleable and deterministic. Only use them to build a reviewed padding
//! or signature scheme.
//!
//! [`RsaPrivateKey::new_unchecked`](crate::RsaPrivateKey::new_unchecked)
//! also lives behind the `hazmat` feature since it generates keys of any
//! size.

pub use crate::algorithms::rsa::{rsa_decrypt, rsa_decrypt_and_check, rsa_encrypt};
