#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![warn(missing_docs)]

//! # Overview
//!
//! The crate has two layers:
//!
//! - The [key codec](codec) parses, validates and converts RSA keys between
//!   PEM/DER containers and the PKCS#1, PKCS#8 and SubjectPublicKeyInfo
//!   structures, extracts public keys and generates key pairs.
//! - The [`SigningEngine`] holds a key and signs or verifies messages with
//!   a [`SignatureScheme`]: PSS or PKCS#1 v1.5 padding with a SHA-1, SHA-2
//!   or SHA-3 digest.
//!
//! All operations are synchronous and keep no state between calls. Key
//! generation is the only slow one; run it on a worker thread if latency
//! matters.
//!
//! # Usage
//!
//! ## Converting keys
//!
//! ```
//! # fn main() -> Result<(), rsa_toolkit::Error> {
//! use rsa_toolkit::{codec, KeyFormat};
//!
//! let pem = "-----BEGIN RSA PUBLIC KEY-----
//! MIIBCgKCAQEAtsQsUV8QpqrygsY+2+JCQ6Fw8/omM71IM2N/R8pPbzbgOl0p78MZ
//! GsgPOQ2HSznjD0FPzsH8oO2B5Uftws04LHb2HJAYlz25+lN5cqfHAfa3fgmC38Ff
//! wBkn7l582UtPWZ/wcBOnyCgb3yLcvJrXyrt8QxHJgvWO23ITrUVYszImbXQ67YGS
//! 0YhMrbixRzmo2tpm3JcIBtnHrEUMsT0NfFdfsZhTT8YbxBvA8FdODgEwx7u/vf3J
//! 9qbi4+Kv8cvqyJuleIRSjVXPsIMnoejIn04APPKIjpMyQdnWlby7rNyQtE4+CV+j
//! cFjqJbE/Xilcvqxt6DirjFCvYeKYl1uHLwIDAQAB
//! -----END RSA PUBLIC KEY-----";
//!
//! assert!(codec::is_valid_public_key(pem));
//!
//! let spki = codec::convert_public_key(pem)?;
//! assert_eq!(spki.format(), KeyFormat::Spki);
//! assert!(spki.as_pem().unwrap().starts_with("-----BEGIN PUBLIC KEY-----"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Signing and verifying
//!
//! ```
//! # fn main() -> Result<(), rsa_toolkit::Error> {
//! use rsa_toolkit::{
//!     Container, HashAlgorithm, KeyGenConfig, SignatureScheme, SigningEngine,
//! };
//!
//! let engine = SigningEngine::generate(&KeyGenConfig::default())?;
//!
//! let scheme = SignatureScheme::pss(HashAlgorithm::Sha256);
//! let signature = engine.sign(b"hello", &scheme)?;
//! assert!(engine.verify(b"hello", &signature, &scheme)?);
//! assert!(!engine.verify(b"goodbye", &signature, &scheme)?);
//!
//! // hand the public key to someone else
//! let public = engine.export_public_key(Container::Pem)?;
//! let verifier = SigningEngine::from_pem(&public, None)?;
//! assert!(verifier.verify(b"hello", &signature, &scheme)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Password-protected private keys
//!
//! ```
//! # fn main() -> Result<(), rsa_toolkit::Error> {
//! use rsa_toolkit::{codec, Container, KeyGenConfig, PrivateFormat, SigningEngine};
//!
//! let engine = SigningEngine::generate(&KeyGenConfig::default())?;
//! let encrypted =
//!     engine.export_private_key(Container::Pem, PrivateFormat::Pkcs8, Some(b"hunter2"))?;
//!
//! assert!(matches!(
//!     codec::load(&encrypted, None),
//!     Err(rsa_toolkit::Error::EncryptedKeyPasswordRequired)
//! ));
//! let public = codec::extract_public_key(&encrypted, Some(b"hunter2"))?;
//! assert_eq!(public.as_bytes(), engine.export_public_key(Container::Pem)?.as_bytes());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod engine;
pub mod errors;
pub mod format;
pub mod key;
pub mod scheme;

pub use pkcs1;
pub use pkcs8;
pub use rsa;

pub use crate::{
    engine::SigningEngine,
    errors::{Error, Result},
    format::{Container, EncodedKey, KeyFormat, KeyKind, PrivateFormat, PublicFormat},
    key::{KeyGenConfig, KeyMaterial, KeyPair, KeyRole},
    scheme::{HashAlgorithm, Padding, SaltLength, SignatureScheme},
};
pub use rsa::{RsaPrivateKey, RsaPublicKey};
