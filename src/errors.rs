//! Error types.

use const_oid::ObjectIdentifier;

use crate::format::{Container, KeyFormat, PrivateFormat};

/// Alias for [`core::result::Result`] with the `rsa-toolkit` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Underlying error kept as the cause of a higher-level [`Error`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Neither a PEM marker nor a known DER structure was found.
    #[error("unrecognized key format: no PEM marker or DER key structure matched")]
    UnrecognizedFormat,

    /// A container, structure or role name supplied by a caller is unknown.
    #[error("unknown {what} name: {name:?}")]
    UnknownName {
        /// What kind of name was being parsed.
        what: &'static str,
        /// The rejected name.
        name: String,
    },

    /// The input was recognized, but not as the format the operation requires.
    #[error("expected a {expected} key, found {found}")]
    FormatMismatch {
        /// Format required by the operation.
        expected: KeyFormat,
        /// Format actually detected.
        found: KeyFormat,
    },

    /// The key could not be parsed, or is not a legal RSA key.
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// What went wrong.
        reason: &'static str,
        /// Underlying error, if any.
        #[source]
        source: Option<Cause>,
    },

    /// A key of a different algorithm was decoded where RSA is required.
    #[error("unsupported key algorithm {oid}, expected rsaEncryption")]
    UnsupportedKeyType {
        /// Algorithm identifier found in the key.
        oid: ObjectIdentifier,
    },

    /// Unknown padding or hash, or a scheme that does not fit the key size.
    #[error("unsupported signature scheme: {0}")]
    UnsupportedScheme(String),

    /// A private-key operation was attempted on a public-only handle.
    #[error("no private key available")]
    NoPrivateKey,

    /// The private key is encrypted and no password was supplied.
    #[error("private key is encrypted, a password is required")]
    EncryptedKeyPasswordRequired,

    /// The password did not decrypt the private key.
    #[error("bad password for encrypted private key")]
    BadPassword {
        /// Underlying decryption or decoding error.
        #[source]
        source: Option<Cause>,
    },

    /// Password protection was requested for a structure that cannot carry it.
    #[error("password protection is not available for {format} private keys in {container}")]
    EncryptionUnsupported {
        /// Requested structural format.
        format: PrivateFormat,
        /// Requested container.
        container: Container,
    },

    /// Requested modulus size is below the accepted minimum.
    #[error("insecure key size: {bits} bits (minimum {minimum})")]
    InsecureKeySize {
        /// Requested modulus size.
        bits: usize,
        /// Minimum accepted modulus size.
        minimum: usize,
    },

    /// Public exponent is even or smaller than 3.
    #[error("invalid public exponent {0}: must be odd and at least 3")]
    InvalidExponent(u64),

    /// Key generation failed inside the RSA implementation.
    #[error("key generation failed")]
    KeyGeneration(#[source] rsa::Error),

    /// Signing failed inside the RSA implementation.
    #[error("signing failed")]
    Signing(#[source] rsa::Error),

    /// Serializing a key failed.
    #[error("failed to encode key as {format}")]
    Encoding {
        /// Target format.
        format: KeyFormat,
        /// Underlying encoder error.
        #[source]
        source: Cause,
    },
}

impl Error {
    /// Build an [`Error::InvalidKey`] keeping `source` as its cause.
    pub(crate) fn invalid_key<E>(reason: &'static str, source: E) -> Self
    where
        E: Into<Cause>,
    {
        Error::InvalidKey {
            reason,
            source: Some(source.into()),
        }
    }

    /// Returns a closure mapping any encoder error to [`Error::Encoding`].
    pub(crate) fn encoding<E>(format: KeyFormat) -> impl FnOnce(E) -> Self
    where
        E: Into<Cause>,
    {
        move |source| Error::Encoding {
            format,
            source: source.into(),
        }
    }
}
