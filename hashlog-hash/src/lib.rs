// File: hashlog-hash/src/lib.rs
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod encoding;
pub mod error;

pub use encoding::{Encoding, Record, ENCODINGS};
pub use error::{Error, Result};

// Domain separation prefixes, active only in security mode
pub const LEAF_PREFIX: u8 = 0x00;
pub const NODE_PREFIX: u8 = 0x01;

/// Hash primitives a tree can be built over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashType {
    #[serde(rename = "sha_224")]
    Sha224,
    #[serde(rename = "sha_256")]
    Sha256,
    #[serde(rename = "sha_384")]
    Sha384,
    #[serde(rename = "sha_512")]
    Sha512,
    #[serde(rename = "sha3_224")]
    Sha3_224,
    #[serde(rename = "sha3_256")]
    Sha3_256,
    #[serde(rename = "sha3_384")]
    Sha3_384,
    #[serde(rename = "sha3_512")]
    Sha3_512,
}

pub const HASH_TYPES: [HashType; 8] = [
    HashType::Sha224,
    HashType::Sha256,
    HashType::Sha384,
    HashType::Sha512,
    HashType::Sha3_224,
    HashType::Sha3_256,
    HashType::Sha3_384,
    HashType::Sha3_512,
];

impl HashType {
    pub fn from_name(name: &str) -> Result<Self> {
        HASH_TYPES
            .iter()
            .copied()
            .find(|h| h.name() == name)
            .ok_or_else(|| Error::UnsupportedHashType(name.to_string()))
    }

    /// Identifier recorded in proof headers.
    pub fn name(self) -> &'static str {
        match self {
            HashType::Sha224 => "sha_224",
            HashType::Sha256 => "sha_256",
            HashType::Sha384 => "sha_384",
            HashType::Sha512 => "sha_512",
            HashType::Sha3_224 => "sha3_224",
            HashType::Sha3_256 => "sha3_256",
            HashType::Sha3_384 => "sha3_384",
            HashType::Sha3_512 => "sha3_512",
        }
    }

    /// `SHA-256`, `SHA3-256`, ...
    pub fn display_name(self) -> String {
        self.name().to_uppercase().replacen('_', "-", 1)
    }

    pub fn digest_len(self) -> usize {
        match self {
            HashType::Sha224 | HashType::Sha3_224 => 28,
            HashType::Sha256 | HashType::Sha3_256 => 32,
            HashType::Sha384 | HashType::Sha3_384 => 48,
            HashType::Sha512 | HashType::Sha3_512 => 64,
        }
    }

    /// Hash the concatenation of `parts`.
    pub fn digest(self, parts: &[&[u8]]) -> Digest {
        let bytes = match self {
            HashType::Sha224 => run::<sha2::Sha224>(parts),
            HashType::Sha256 => run::<sha2::Sha256>(parts),
            HashType::Sha384 => run::<sha2::Sha384>(parts),
            HashType::Sha512 => run::<sha2::Sha512>(parts),
            HashType::Sha3_224 => run::<sha3::Sha3_224>(parts),
            HashType::Sha3_256 => run::<sha3::Sha3_256>(parts),
            HashType::Sha3_384 => run::<sha3::Sha3_384>(parts),
            HashType::Sha3_512 => run::<sha3::Sha3_512>(parts),
        };
        Digest(bytes)
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn run<D: sha2::Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for p in parts {
        hasher.update(p);
    }
    hasher.finalize().to_vec()
}

/// Fixed-width hash value. Serialized as lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Digest(Vec<u8>);

impl Digest {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self { Digest(bytes.into()) }

    pub fn from_hex(s: &str) -> Result<Self> { Ok(Digest(hex::decode(s)?)) }

    pub fn to_hex(&self) -> String { hex::encode(&self.0) }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn into_bytes(self) -> Vec<u8> { self.0 }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Digest> for String {
    fn from(d: Digest) -> Self { d.to_hex() }
}

impl TryFrom<String> for Digest {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> { Digest::from_hex(&s) }
}

/// Everything that determines how records and nodes are hashed.
/// Fixed per tree and echoed in every proof header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HashConfig {
    pub hash_type: HashType,
    pub encoding: Encoding,
    pub raw_bytes: bool,
    pub security: bool,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self { hash_type: HashType::Sha256, encoding: Encoding::Utf8, raw_bytes: true, security: true }
    }
}

impl HashConfig {
    /// Rebuild a configuration from the names carried by a proof header.
    pub fn from_names(hash_type: &str, encoding: &str, raw_bytes: bool, security: bool) -> Result<Self> {
        Ok(Self {
            hash_type: HashType::from_name(hash_type)?,
            encoding: Encoding::from_name(encoding)?,
            raw_bytes,
            security,
        })
    }
}

/// Leaf and interior hashing under a [`HashConfig`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hasher {
    config: HashConfig,
}

impl Hasher {
    pub fn new(config: HashConfig) -> Self { Self { config } }

    pub fn config(&self) -> &HashConfig { &self.config }

    pub fn digest_len(&self) -> usize { self.config.hash_type.digest_len() }

    /// Turn a record into the bytes that get hashed.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        match record {
            Record::Text(text) => self.config.encoding.encode(text),
            Record::Bytes(bytes) => {
                if !self.config.raw_bytes && !self.config.encoding.decodes(bytes) {
                    return Err(Error::UndecodableRecord { encoding: self.config.encoding.name().to_string() });
                }
                Ok(bytes.clone())
            }
        }
    }

    pub fn hash_record(&self, record: &Record) -> Result<Digest> {
        Ok(self.hash_leaf(&self.encode(record)?))
    }

    /// `H(0x00 ‖ data)` in security mode, `H(data)` otherwise.
    pub fn hash_leaf(&self, data: &[u8]) -> Digest {
        if self.config.security {
            self.config.hash_type.digest(&[&[LEAF_PREFIX][..], data])
        } else {
            self.config.hash_type.digest(&[data])
        }
    }

    /// `H(0x01 ‖ left ‖ right)` in security mode, `H(left ‖ right)` otherwise.
    pub fn hash_pair(&self, left: &[u8], right: &[u8]) -> Digest {
        if self.config.security {
            self.config.hash_type.digest(&[&[NODE_PREFIX][..], left, right])
        } else {
            self.config.hash_type.digest(&[left, right])
        }
    }
}
