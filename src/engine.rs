//! Signing engine: export, sign and verify with a held key.

use const_oid::AssociatedOid;
use digest::{Digest, DynDigest};
use rand_core::{CryptoRngCore, OsRng};
use rsa::{traits::PublicKeyParts, Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use sha3::{Sha3_256, Sha3_384, Sha3_512};

use crate::codec;
use crate::errors::{Error, Result};
use crate::format::{Container, EncodedKey, PrivateFormat, PublicFormat};
use crate::key::{KeyGenConfig, KeyMaterial, KeyRole};
use crate::scheme::{HashAlgorithm, Padding, SignatureScheme};

/// Digests usable with both PSS and PKCS#1 v1.5.
trait SchemeDigest: Digest + DynDigest + AssociatedOid + Send + Sync + 'static {}

impl<D> SchemeDigest for D where D: Digest + DynDigest + AssociatedOid + Send + Sync + 'static {}

/// Call `$f::<D>($args)` with `D` the digest type selected by `$hash`.
macro_rules! with_digest {
    ($hash:expr, $f:ident($($arg:expr),* $(,)?)) => {
        match $hash {
            HashAlgorithm::Sha1 => $f::<Sha1>($($arg),*),
            HashAlgorithm::Sha224 => $f::<Sha224>($($arg),*),
            HashAlgorithm::Sha256 => $f::<Sha256>($($arg),*),
            HashAlgorithm::Sha384 => $f::<Sha384>($($arg),*),
            HashAlgorithm::Sha512 => $f::<Sha512>($($arg),*),
            HashAlgorithm::Sha3_256 => $f::<Sha3_256>($($arg),*),
            HashAlgorithm::Sha3_384 => $f::<Sha3_384>($($arg),*),
            HashAlgorithm::Sha3_512 => $f::<Sha3_512>($($arg),*),
        }
    };
}

/// Signs and verifies messages with an RSA key.
///
/// An engine always holds a public key. Private-key operations fail with
/// [`Error::NoPrivateKey`] when it was built from a public key alone.
///
/// All operations take `&self`; an engine can be shared between threads
/// and used for concurrent signing and verification.
#[derive(Clone, Debug)]
pub struct SigningEngine {
    key: KeyMaterial,
    public: RsaPublicKey,
}

impl SigningEngine {
    /// Wrap an existing key handle.
    pub fn new(key: KeyMaterial) -> Self {
        let public = key.public_key().into_owned();
        Self { key, public }
    }

    /// Generate a fresh key pair and wrap it.
    pub fn generate(config: &KeyGenConfig) -> Result<Self> {
        codec::generate(config).map(Self::new)
    }

    /// Engine for a private key; the public key is derived from it.
    pub fn from_private_key(private: RsaPrivateKey) -> Self {
        Self::new(KeyMaterial::from(private).into_key_pair())
    }

    /// Verify-only engine.
    pub fn from_public_key(public: RsaPublicKey) -> Self {
        Self::new(KeyMaterial::from(public))
    }

    /// Load a private or public key from PEM or DER.
    pub fn from_pem(data: impl AsRef<[u8]>, password: Option<&[u8]>) -> Result<Self> {
        codec::load(data, password).map(Self::new)
    }

    /// Which halves of the key pair this engine holds.
    pub fn role(&self) -> KeyRole {
        self.key.role()
    }

    /// Underlying key handle.
    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    /// Public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    fn private_key(&self) -> Result<&RsaPrivateKey> {
        self.key.private_key().ok_or(Error::NoPrivateKey)
    }

    /// Export the private key.
    ///
    /// A non-empty `password` encrypts the key as PKCS#8 with PBES2 (scrypt
    /// and AES-256-CBC); PKCS#1 cannot be encrypted and fails with
    /// [`Error::EncryptionUnsupported`].
    pub fn export_private_key(
        &self,
        container: Container,
        format: PrivateFormat,
        password: Option<&[u8]>,
    ) -> Result<EncodedKey> {
        self.export_private_key_with_rng(&mut OsRng, container, format, password)
    }

    /// Export the private key, drawing encryption salt and IV from `rng`.
    pub fn export_private_key_with_rng<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        container: Container,
        format: PrivateFormat,
        password: Option<&[u8]>,
    ) -> Result<EncodedKey> {
        match password.filter(|password| !password.is_empty()) {
            Some(password) => self
                .key
                .encode_private_encrypted(rng, container, format, password),
            None => self.key.encode_private(container, format),
        }
    }

    /// Export the public key as SubjectPublicKeyInfo.
    pub fn export_public_key(&self, container: Container) -> Result<EncodedKey> {
        self.key.encode_public(container, PublicFormat::Spki)
    }

    /// Sign `message` using the operating system's RNG.
    ///
    /// PKCS#1 v1.5 signatures are deterministic. PSS signatures use a random
    /// salt, so repeated calls produce different signatures.
    pub fn sign(&self, message: &[u8], scheme: &SignatureScheme) -> Result<Vec<u8>> {
        self.sign_with_rng(&mut OsRng, message, scheme)
    }

    /// Sign `message`, drawing the PSS salt and RSA blinding factor from `rng`.
    pub fn sign_with_rng<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        message: &[u8],
        scheme: &SignatureScheme,
    ) -> Result<Vec<u8>> {
        let private = self.private_key()?;
        with_digest!(scheme.hash, sign_digest(private, rng, message, scheme))
    }

    /// Verify `signature` over `message`.
    ///
    /// A signature that does not check out is `Ok(false)`, whatever the
    /// reason: wrong message, wrong key, wrong scheme or malformed bytes.
    /// `Err` is returned only when `scheme` cannot be used with this key.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        scheme: &SignatureScheme,
    ) -> Result<bool> {
        with_digest!(
            scheme.hash,
            verify_digest(&self.public, message, signature, scheme)
        )
    }
}

impl From<KeyMaterial> for SigningEngine {
    fn from(key: KeyMaterial) -> Self {
        Self::new(key)
    }
}

fn sign_digest<D: SchemeDigest>(
    key: &RsaPrivateKey,
    rng: &mut impl CryptoRngCore,
    message: &[u8],
    scheme: &SignatureScheme,
) -> Result<Vec<u8>> {
    let hashed = D::digest(message);
    let signed = match scheme.padding {
        Padding::Pss => {
            let salt_len = scheme.pss_salt_len(key.n().bits())?;
            key.sign_with_rng(rng, Pss::new_with_salt::<D>(salt_len), &hashed)
        }
        Padding::Pkcs1v15 => {
            scheme.check_pkcs1v15(key.n().bits())?;
            key.sign_with_rng(rng, Pkcs1v15Sign::new::<D>(), &hashed)
        }
    };
    signed.map_err(Error::Signing)
}

fn verify_digest<D: SchemeDigest>(
    key: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
    scheme: &SignatureScheme,
) -> Result<bool> {
    let hashed = D::digest(message);
    let checked = match scheme.padding {
        Padding::Pss => {
            let salt_len = scheme.pss_salt_len(key.n().bits())?;
            key.verify(Pss::new_with_salt::<D>(salt_len), &hashed, signature)
        }
        Padding::Pkcs1v15 => {
            scheme.check_pkcs1v15(key.n().bits())?;
            key.verify(Pkcs1v15Sign::new::<D>(), &hashed, signature)
        }
    };
    Ok(checked.is_ok())
}
