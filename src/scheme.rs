//! Signature scheme selection: padding, hash and PSS salt length.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use crate::errors::{Error, Result};
use crate::format::normalize_name;

/// Signature padding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Padding {
    /// RSASSA-PSS, [RFC8017 § 8.1](https://datatracker.ietf.org/doc/html/rfc8017#section-8.1).
    /// MGF1 uses the message hash.
    #[default]
    Pss,
    /// RSASSA-PKCS1-v1_5, [RFC8017 § 8.2](https://datatracker.ietf.org/doc/html/rfc8017#section-8.2).
    Pkcs1v15,
}

/// Message digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(non_camel_case_types)]
pub enum HashAlgorithm {
    /// SHA-1. Only use this to verify legacy signatures.
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// SHA3-256.
    Sha3_256,
    /// SHA3-384.
    Sha3_384,
    /// SHA3-512.
    Sha3_512,
}

impl HashAlgorithm {
    /// All supported digests.
    pub const ALL: [HashAlgorithm; 8] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_384,
        HashAlgorithm::Sha3_512,
    ];

    /// Digest output size in bytes.
    pub const fn output_size(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 => 32,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha3_384 => 48,
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 => 64,
        }
    }

    /// Length of the DER `DigestInfo` a PKCS#1 v1.5 signature embeds.
    pub const fn digest_info_len(self) -> usize {
        // SEQUENCE { AlgorithmIdentifier { OID, NULL }, OCTET STRING } headers
        // around a 5-byte (SHA-1) or 9-byte (NIST hash arc) OID
        let prefix_len = match self {
            HashAlgorithm::Sha1 => 15,
            _ => 19,
        };
        prefix_len + self.output_size()
    }
}

/// PSS salt length policy. Ignored for PKCS#1 v1.5.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SaltLength {
    /// Largest salt the modulus allows: `emLen - hLen - 2`.
    #[default]
    Max,
    /// Salt as long as the digest output.
    Digest,
    /// Salt of exactly this many bytes.
    Fixed(usize),
}

impl SaltLength {
    /// Resolve the salt length for a modulus of `modulus_bits` and a digest
    /// of `digest_len` bytes.
    ///
    /// Returns `None` if the encoded message cannot hold the digest and salt.
    pub fn resolve(self, modulus_bits: usize, digest_len: usize) -> Option<usize> {
        // emLen = ceil(emBits / 8) with emBits = modBits - 1
        let em_len = modulus_bits.checked_sub(1)?.div_ceil(8);
        let capacity = em_len.checked_sub(digest_len + 2)?;
        let salt_len = match self {
            SaltLength::Max => capacity,
            SaltLength::Digest => digest_len,
            SaltLength::Fixed(len) => len,
        };
        (salt_len <= capacity).then_some(salt_len)
    }
}

/// Padding, digest and salt policy for one sign or verify call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignatureScheme {
    /// Padding scheme.
    pub padding: Padding,
    /// Message digest; also used by MGF1 for PSS.
    pub hash: HashAlgorithm,
    /// PSS salt length.
    pub salt_len: SaltLength,
}

impl SignatureScheme {
    /// PSS with `hash` and the maximum salt length.
    pub const fn pss(hash: HashAlgorithm) -> Self {
        Self {
            padding: Padding::Pss,
            hash,
            salt_len: SaltLength::Max,
        }
    }

    /// PKCS#1 v1.5 with `hash`.
    pub const fn pkcs1v15(hash: HashAlgorithm) -> Self {
        Self {
            padding: Padding::Pkcs1v15,
            hash,
            salt_len: SaltLength::Max,
        }
    }

    /// Build a scheme from padding and hash names such as `"PSS"` and `"SHA256"`.
    pub fn from_names(padding: &str, hash: &str) -> Result<Self> {
        Ok(Self {
            padding: padding.parse()?,
            hash: hash.parse()?,
            salt_len: SaltLength::Max,
        })
    }

    /// Replace the PSS salt length policy.
    pub const fn with_salt_len(mut self, salt_len: SaltLength) -> Self {
        self.salt_len = salt_len;
        self
    }

    /// Salt length to use with a modulus of `modulus_bits`.
    pub(crate) fn pss_salt_len(&self, modulus_bits: usize) -> Result<usize> {
        self.salt_len
            .resolve(modulus_bits, self.hash.output_size())
            .ok_or_else(|| {
                Error::UnsupportedScheme(format!(
                    "{self} with salt length {:?} does not fit a {modulus_bits}-bit modulus",
                    self.salt_len
                ))
            })
    }

    /// Check that a PKCS#1 v1.5 encoding fits a modulus of `modulus_bits`:
    /// `k >= tLen + 11`.
    pub(crate) fn check_pkcs1v15(&self, modulus_bits: usize) -> Result<()> {
        let k = modulus_bits.div_ceil(8);
        if k >= self.hash.digest_info_len() + 11 {
            Ok(())
        } else {
            Err(Error::UnsupportedScheme(format!(
                "{self} does not fit a {modulus_bits}-bit modulus"
            )))
        }
    }
}

impl FromStr for Padding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_name(s).as_str() {
            "PSS" | "RSASSAPSS" => Ok(Padding::Pss),
            "PKCS1V15" | "PKCS1V1.5" | "PKCS1" | "RSASSAPKCS1V15" => Ok(Padding::Pkcs1v15),
            _ => Err(Error::UnsupportedScheme(format!("padding {s:?}"))),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_name(s).as_str() {
            "SHA1" => Ok(HashAlgorithm::Sha1),
            "SHA224" | "SHA2224" => Ok(HashAlgorithm::Sha224),
            "SHA256" | "SHA2256" => Ok(HashAlgorithm::Sha256),
            "SHA384" | "SHA2384" => Ok(HashAlgorithm::Sha384),
            "SHA512" | "SHA2512" => Ok(HashAlgorithm::Sha512),
            "SHA3256" => Ok(HashAlgorithm::Sha3_256),
            "SHA3384" => Ok(HashAlgorithm::Sha3_384),
            "SHA3512" => Ok(HashAlgorithm::Sha3_512),
            _ => Err(Error::UnsupportedScheme(format!("hash {s:?}"))),
        }
    }
}

impl Display for Padding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Padding::Pss => "PSS",
            Padding::Pkcs1v15 => "PKCS1v15",
        })
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha224 => "SHA224",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
            HashAlgorithm::Sha3_256 => "SHA3-256",
            HashAlgorithm::Sha3_384 => "SHA3-384",
            HashAlgorithm::Sha3_512 => "SHA3-512",
        })
    }
}

impl Display for SignatureScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.padding, self.hash)
    }
}
