use hashlog_hash::{Encoding, HashConfig, HashType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid tree configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Hash(#[from] hashlog_hash::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    /// Hash function name, e.g. `sha_256` or `sha3_512`
    pub hash_type: Option<String>,
    /// Text encoding applied to string records
    pub encoding: Option<String>,
    /// Accept byte records without checking they decode
    pub raw_bytes: Option<bool>,
    /// Prefix leaves with 0x00 and interior nodes with 0x01
    pub security: Option<bool>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            hash_type: Some(HashType::Sha256.name().to_string()),
            encoding: Some(Encoding::Utf8.name().to_string()),
            raw_bytes: Some(true),
            security: Some(true),
        }
    }
}

impl TreeConfig {
    /// Resolve names into hashing rules; absent keys take the defaults.
    pub fn to_hash_config(&self) -> Result<HashConfig> {
        let defaults = HashConfig::default();
        let hash_type = match &self.hash_type {
            Some(name) => HashType::from_name(name)?,
            None => defaults.hash_type,
        };
        let encoding = match &self.encoding {
            Some(name) => Encoding::from_name(name)?,
            None => defaults.encoding,
        };
        Ok(HashConfig {
            hash_type,
            encoding,
            raw_bytes: self.raw_bytes.unwrap_or(defaults.raw_bytes),
            security: self.security.unwrap_or(defaults.security),
        })
    }
}

impl From<&HashConfig> for TreeConfig {
    fn from(c: &HashConfig) -> Self {
        Self {
            hash_type: Some(c.hash_type.name().to_string()),
            encoding: Some(c.encoding.name().to_string()),
            raw_bytes: Some(c.raw_bytes),
            security: Some(c.security),
        }
    }
}

/// Parse tree parameters from TOML text
pub fn load_config_toml(input: &str) -> Result<TreeConfig> {
    Ok(toml::from_str::<TreeConfig>(input)?)
}

/// Parse TOML text straight into hashing rules
pub fn load_hash_config_toml(input: &str) -> Result<HashConfig> {
    load_config_toml(input)?.to_hash_config()
}
