//! RSA key handles and key generation.

use std::borrow::Cow;

use pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rand_core::{CryptoRngCore, OsRng};
use rsa::{traits::PublicKeyParts, BigUint, RsaPrivateKey, RsaPublicKey};

use crate::errors::{Error, Result};
use crate::format::{Container, EncodedKey, KeyFormat, PrivateFormat, PublicFormat};

/// Line ending used for all PEM output.
pub(crate) const LINE_ENDING: LineEnding = LineEnding::LF;

/// Which halves of a key pair a [`KeyMaterial`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyRole {
    /// Private key only; the public half is derived on demand.
    PrivateOnly,
    /// Public key only; verification and public export only.
    PublicOnly,
    /// Private key together with its derived public key.
    KeyPair,
}

/// An RSA private key, public key, or both.
///
/// The public half of [`KeyMaterial::KeyPair`] is always derived from its
/// private half; there is no way to pair a private key with an unrelated
/// public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Private key with its derived public key.
    KeyPair(KeyPair),
    /// Private key only.
    PrivateOnly(RsaPrivateKey),
    /// Public key only.
    PublicOnly(RsaPublicKey),
}

/// A private key and the public key derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Pair `private` with its derived public key.
    pub fn new(private: RsaPrivateKey) -> Self {
        let public = private.to_public_key();
        Self { private, public }
    }

    /// Private half.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    /// Public half.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }
}

impl KeyMaterial {
    /// Generate a new key pair using the operating system's RNG.
    pub fn generate(config: &KeyGenConfig) -> Result<Self> {
        Self::generate_with_rng(&mut OsRng, config)
    }

    /// Generate a new key pair using `rng`.
    pub fn generate_with_rng<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        config: &KeyGenConfig,
    ) -> Result<Self> {
        config.check()?;
        tracing::debug!(
            bits = config.bits,
            public_exponent = config.public_exponent,
            "generating RSA key pair"
        );

        let exp = BigUint::from(config.public_exponent);
        let private =
            RsaPrivateKey::new_with_exp(rng, config.bits, &exp).map_err(Error::KeyGeneration)?;
        Ok(KeyMaterial::KeyPair(KeyPair::new(private)))
    }

    /// Which halves this handle holds.
    pub fn role(&self) -> KeyRole {
        match self {
            KeyMaterial::KeyPair(_) => KeyRole::KeyPair,
            KeyMaterial::PrivateOnly(_) => KeyRole::PrivateOnly,
            KeyMaterial::PublicOnly(_) => KeyRole::PublicOnly,
        }
    }

    /// Private key, if held.
    pub fn private_key(&self) -> Option<&RsaPrivateKey> {
        match self {
            KeyMaterial::KeyPair(pair) => Some(&pair.private),
            KeyMaterial::PrivateOnly(private) => Some(private),
            KeyMaterial::PublicOnly(_) => None,
        }
    }

    /// Public key; derived from the private key for [`KeyRole::PrivateOnly`].
    pub fn public_key(&self) -> Cow<'_, RsaPublicKey> {
        match self {
            KeyMaterial::KeyPair(pair) => Cow::Borrowed(&pair.public),
            KeyMaterial::PrivateOnly(private) => Cow::Owned(private.to_public_key()),
            KeyMaterial::PublicOnly(public) => Cow::Borrowed(public),
        }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.public_key().n().bits()
    }

    /// Public exponent.
    pub fn public_exponent(&self) -> BigUint {
        self.public_key().e().clone()
    }

    /// Promote a private-only handle to a key pair. Other roles are unchanged.
    pub fn into_key_pair(self) -> Self {
        match self {
            KeyMaterial::PrivateOnly(private) => KeyMaterial::KeyPair(KeyPair::new(private)),
            other => other,
        }
    }

    /// Serialize the private key without password protection.
    pub fn encode_private(&self, container: Container, format: PrivateFormat) -> Result<EncodedKey> {
        let private = self.private_key().ok_or(Error::NoPrivateKey)?;
        encode_private_key(private, container, format)
    }

    /// Serialize the private key as PKCS#8 encrypted under `password`.
    ///
    /// PKCS#8 is encrypted with PBES2 (scrypt and AES-256-CBC). PKCS#1 has no
    /// standard encryption and fails with [`Error::EncryptionUnsupported`].
    pub fn encode_private_encrypted<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        container: Container,
        format: PrivateFormat,
        password: &[u8],
    ) -> Result<EncodedKey> {
        let private = self.private_key().ok_or(Error::NoPrivateKey)?;
        if format == PrivateFormat::Pkcs1 {
            return Err(Error::EncryptionUnsupported { format, container });
        }

        let target = KeyFormat::EncryptedPkcs8;
        let bytes = match container {
            Container::Pem => private
                .to_pkcs8_encrypted_pem(rng, password, LINE_ENDING)
                .map_err(Error::encoding(target))?
                .as_bytes()
                .to_vec(),
            Container::Der => private
                .to_pkcs8_encrypted_der(rng, password)
                .map_err(Error::encoding(target))?
                .as_bytes()
                .to_vec(),
        };
        Ok(EncodedKey::new(bytes, container, target))
    }

    /// Serialize the public key.
    pub fn encode_public(&self, container: Container, format: PublicFormat) -> Result<EncodedKey> {
        encode_public_key(&self.public_key(), container, format)
    }
}

impl From<RsaPrivateKey> for KeyMaterial {
    fn from(private: RsaPrivateKey) -> Self {
        KeyMaterial::PrivateOnly(private)
    }
}

impl From<RsaPublicKey> for KeyMaterial {
    fn from(public: RsaPublicKey) -> Self {
        KeyMaterial::PublicOnly(public)
    }
}

pub(crate) fn encode_private_key(
    key: &RsaPrivateKey,
    container: Container,
    format: PrivateFormat,
) -> Result<EncodedKey> {
    let target = KeyFormat::from(format);
    let bytes = match (container, format) {
        (Container::Pem, PrivateFormat::Pkcs1) => key
            .to_pkcs1_pem(LINE_ENDING)
            .map_err(Error::encoding(target))?
            .as_bytes()
            .to_vec(),
        (Container::Pem, PrivateFormat::Pkcs8) => key
            .to_pkcs8_pem(LINE_ENDING)
            .map_err(Error::encoding(target))?
            .as_bytes()
            .to_vec(),
        (Container::Der, PrivateFormat::Pkcs1) => key
            .to_pkcs1_der()
            .map_err(Error::encoding(target))?
            .as_bytes()
            .to_vec(),
        (Container::Der, PrivateFormat::Pkcs8) => key
            .to_pkcs8_der()
            .map_err(Error::encoding(target))?
            .as_bytes()
            .to_vec(),
    };
    Ok(EncodedKey::new(bytes, container, target))
}

pub(crate) fn encode_public_key(
    key: &RsaPublicKey,
    container: Container,
    format: PublicFormat,
) -> Result<EncodedKey> {
    let target = KeyFormat::from(format);
    let bytes = match (container, format) {
        (Container::Pem, PublicFormat::Pkcs1) => key
            .to_pkcs1_pem(LINE_ENDING)
            .map_err(Error::encoding(target))?
            .into_bytes(),
        (Container::Pem, PublicFormat::Spki) => key
            .to_public_key_pem(LINE_ENDING)
            .map_err(Error::encoding(target))?
            .into_bytes(),
        (Container::Der, PublicFormat::Pkcs1) => key
            .to_pkcs1_der()
            .map_err(Error::encoding(target))?
            .into_vec(),
        (Container::Der, PublicFormat::Spki) => key
            .to_public_key_der()
            .map_err(Error::encoding(target))?
            .into_vec(),
    };
    Ok(EncodedKey::new(bytes, container, target))
}

/// Parameters for generating a new key pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyGenConfig {
    /// Modulus size in bits.
    pub bits: usize,
    /// Public exponent; must be odd and at least 3.
    pub public_exponent: u64,
    /// Permit modulus sizes below [`KeyGenConfig::MIN_SECURE_BITS`].
    pub allow_insecure: bool,
}

impl KeyGenConfig {
    /// Default modulus size.
    pub const DEFAULT_BITS: usize = 2048;

    /// Default public exponent, F4.
    pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

    /// Smallest modulus size accepted without `allow_insecure`.
    pub const MIN_SECURE_BITS: usize = 2048;

    /// Smallest modulus size accepted at all.
    pub const MIN_BITS: usize = 512;

    /// Configuration for a `bits`-sized key with the default exponent.
    pub fn with_bits(bits: usize) -> Self {
        Self {
            bits,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.public_exponent < 3 || self.public_exponent % 2 == 0 {
            return Err(Error::InvalidExponent(self.public_exponent));
        }

        let minimum = if self.allow_insecure {
            Self::MIN_BITS
        } else {
            Self::MIN_SECURE_BITS
        };
        if self.bits < minimum {
            return Err(Error::InsecureKeySize {
                bits: self.bits,
                minimum,
            });
        }
        if self.bits < Self::MIN_SECURE_BITS {
            tracing::warn!(
                bits = self.bits,
                "generating RSA key below {} bits",
                Self::MIN_SECURE_BITS
            );
        }

        Ok(())
    }
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            bits: Self::DEFAULT_BITS,
            public_exponent: Self::DEFAULT_PUBLIC_EXPONENT,
            allow_insecure: false,
        }
    }
}
