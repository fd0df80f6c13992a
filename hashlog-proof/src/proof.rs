// File: hashlog-proof/src/proof.rs
use hashlog_hash::{Digest, Encoding, HashConfig, HashType};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::{creation_moment, ProofContext};
use crate::error::{Error, Result};

/// `proof_index` of a proof that could not be generated.
pub const FAILED_INDEX: i64 = -1;

/// Side of the running hash a path entry is applied on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Wire tag: `-1` left, `+1` right.
    pub fn sign(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn from_sign(sign: i64) -> Option<Self> {
        match sign {
            -1 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathEntry {
    pub direction: Direction,
    pub digest: Digest,
}

impl PathEntry {
    pub fn new(direction: Direction, digest: Digest) -> Self { Self { direction, digest } }
}

/// Outcome of the last validation, set only by validation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Unvalidated,
    Valid,
    Invalid,
}

impl Status {
    pub fn as_option(self) -> Option<bool> {
        match self {
            Status::Unvalidated => None,
            Status::Valid => Some(true),
            Status::Invalid => Some(false),
        }
    }

    pub fn from_option(v: Option<bool>) -> Self {
        match v {
            None => Status::Unvalidated,
            Some(true) => Status::Valid,
            Some(false) => Status::Invalid,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofHeader {
    pub uuid: String,
    pub timestamp: i64,
    pub creation_moment: String,
    pub provider: String,
    pub hash_type: String,
    pub encoding: String,
    pub raw_bytes: bool,
    pub security: bool,
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofBody {
    pub proof_index: i64,
    pub proof_path: Vec<PathEntry>,
}

/// A self-contained audit or consistency proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    header: ProofHeader,
    body: ProofBody,
}

/// Hashing parameters echoed into a proof header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofParams {
    pub hash_type: String,
    pub encoding: String,
    pub raw_bytes: bool,
    pub security: bool,
}

impl From<&HashConfig> for ProofParams {
    fn from(c: &HashConfig) -> Self {
        Self {
            hash_type: c.hash_type.name().to_string(),
            encoding: c.encoding.name().to_string(),
            raw_bytes: c.raw_bytes,
            security: c.security,
        }
    }
}

impl Proof {
    /// A successfully generated proof for `proof_index`, which is never
    /// negative; use [`Proof::failed`] when generation is impossible.
    pub fn new(ctx: &dyn ProofContext, params: ProofParams, proof_index: i64, proof_path: Vec<PathEntry>) -> Self {
        debug_assert!(proof_index >= 0);
        Self { header: Self::stamp(ctx, params), body: ProofBody { proof_index, proof_path } }
    }

    /// A proof recording that generation was impossible.
    pub fn failed(ctx: &dyn ProofContext, params: ProofParams) -> Self {
        Self { header: Self::stamp(ctx, params), body: ProofBody { proof_index: FAILED_INDEX, proof_path: Vec::new() } }
    }

    fn stamp(ctx: &dyn ProofContext, params: ProofParams) -> ProofHeader {
        let timestamp = ctx.timestamp();
        ProofHeader {
            uuid: ctx.new_uuid(),
            timestamp,
            creation_moment: creation_moment(timestamp),
            provider: ctx.provider().to_string(),
            hash_type: params.hash_type,
            encoding: params.encoding,
            raw_bytes: params.raw_bytes,
            security: params.security,
            status: Status::Unvalidated,
        }
    }

    pub fn header(&self) -> &ProofHeader { &self.header }

    pub fn body(&self) -> &ProofBody { &self.body }

    pub fn uuid(&self) -> &str { &self.header.uuid }

    /// Whether construction succeeded. Derived, never stored.
    pub fn generation(&self) -> bool { self.body.proof_index != FAILED_INDEX }

    pub fn status(&self) -> Status { self.header.status }

    pub(crate) fn set_status(&mut self, status: Status) { self.header.status = status; }

    pub fn proof_index(&self) -> i64 { self.body.proof_index }

    pub fn path(&self) -> &[PathEntry] { &self.body.proof_path }

    /// First path entry: the claimed leaf hash or prior subtree root.
    pub fn seed(&self) -> Option<&Digest> { self.body.proof_path.first().map(|e| &e.digest) }

    /// Hashing configuration named by the header.
    pub fn hash_config(&self) -> Result<HashConfig> {
        let h = &self.header;
        Ok(HashConfig::from_names(&h.hash_type, &h.encoding, h.raw_bytes, h.security)?)
    }

    /// Mutable access to the path. Editing it invalidates any earlier status.
    pub fn path_mut(&mut self) -> &mut Vec<PathEntry> {
        self.header.status = Status::Unvalidated;
        &mut self.body.proof_path
    }

    pub fn serialize(&self) -> ProofDocument {
        let h = &self.header;
        ProofDocument {
            body: BodyDocument {
                proof_index: self.body.proof_index,
                proof_path: self.body.proof_path.iter().map(|e| (e.direction.sign(), e.digest.to_hex())).collect(),
            },
            header: HeaderDocument {
                creation_moment: h.creation_moment.clone(),
                encoding: h.encoding.clone(),
                generation: self.generation(),
                hash_type: h.hash_type.clone(),
                provider: h.provider.clone(),
                raw_bytes: h.raw_bytes,
                security: h.security,
                status: h.status.as_option(),
                timestamp: h.timestamp,
                uuid: h.uuid.clone(),
            },
        }
    }

    /// Rebuild a proof from its document; either every field is accepted or nothing is.
    /// Path hashes must be lowercase hex, so a document round trips byte for byte.
    pub fn from_document(doc: ProofDocument) -> Result<Self> {
        let ProofDocument { header, body } = doc;
        if body.proof_index < FAILED_INDEX {
            return Err(Error::MalformedSerialization(format!("proof_index {} below sentinel", body.proof_index)));
        }
        let generation = body.proof_index != FAILED_INDEX;
        if header.generation != generation {
            return Err(Error::MalformedSerialization(format!(
                "generation flag {} contradicts proof_index {}",
                header.generation, body.proof_index
            )));
        }
        if !generation && !body.proof_path.is_empty() {
            return Err(Error::MalformedSerialization("failed proof carries a path".to_string()));
        }
        let proof_path = body
            .proof_path
            .into_iter()
            .enumerate()
            .map(|(i, (sign, hex))| -> Result<PathEntry> {
                let direction = Direction::from_sign(i64::from(sign))
                    .ok_or_else(|| Error::MalformedSerialization(format!("path entry {i}: direction tag {sign}")))?;
                if hex.bytes().any(|b| b.is_ascii_uppercase()) {
                    return Err(Error::MalformedSerialization(format!("path entry {i}: uppercase hex")));
                }
                let digest = Digest::from_hex(&hex)
                    .map_err(|e| Error::MalformedSerialization(format!("path entry {i}: {e}")))?;
                Ok(PathEntry { direction, digest })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            header: ProofHeader {
                uuid: header.uuid,
                timestamp: header.timestamp,
                creation_moment: header.creation_moment,
                provider: header.provider,
                hash_type: header.hash_type,
                encoding: header.encoding,
                raw_bytes: header.raw_bytes,
                security: header.security,
                status: Status::from_option(header.status),
            },
            body: ProofBody { proof_index: body.proof_index, proof_path },
        })
    }

    /// Pretty JSON with four-space indentation and sorted keys.
    pub fn to_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
        self.serialize().serialize(&mut ser)?;
        String::from_utf8(out).map_err(|e| Error::MalformedSerialization(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(text)?)
    }

    /// Compact binary form.
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.serialize())?)
    }

    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        Self::from_document(bincode::deserialize(bytes)?)
    }

    pub fn to_display_string(&self) -> String { self.to_string() }
}

/// Serialized proof. Fields are declared in key order so JSON output is sorted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofDocument {
    pub body: BodyDocument,
    pub header: HeaderDocument,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderDocument {
    pub creation_moment: String,
    pub encoding: String,
    pub generation: bool,
    pub hash_type: String,
    pub provider: String,
    pub raw_bytes: bool,
    pub security: bool,
    pub status: Option<bool>,
    pub timestamp: i64,
    pub uuid: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyDocument {
    pub proof_index: i64,
    pub proof_path: Vec<(i8, String)>,
}

fn display_hash_type(name: &str) -> String {
    HashType::from_name(name).map(HashType::display_name).unwrap_or_else(|_| name.to_uppercase())
}

fn display_encoding(name: &str) -> String {
    Encoding::from_name(name).map(Encoding::display_name).unwrap_or_else(|_| name.to_uppercase())
}

/// One line per entry, index right-aligned.
pub fn stringify_path(path: &[PathEntry]) -> String {
    path.iter()
        .enumerate()
        .map(|(i, e)| format!("\n{:>10}   {:+}  {}", format!("[{i}]"), e.direction.sign(), e.digest.to_hex()))
        .collect()
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(f)?;
        writeln!(f, "    ----------------------------------- PROOF ------------------------------------")?;
        writeln!(f)?;
        writeln!(f, "    uuid        : {}", h.uuid)?;
        writeln!(f)?;
        writeln!(f, "    generation  : {}", if self.generation() { "SUCCESS" } else { "FAILURE" })?;
        writeln!(f, "    timestamp   : {} ({})", h.timestamp, h.creation_moment)?;
        writeln!(f, "    provider    : {}", h.provider)?;
        writeln!(f)?;
        writeln!(f, "    hash-type   : {}", display_hash_type(&h.hash_type))?;
        writeln!(f, "    encoding    : {}", display_encoding(&h.encoding))?;
        writeln!(f, "    raw_bytes   : {}", if h.raw_bytes { "yes" } else { "no" })?;
        writeln!(f, "    security    : {}", if h.security { "ACTIVATED" } else { "DEACTIVATED" })?;
        writeln!(f)?;
        writeln!(f, "    proof-index : {}", self.body.proof_index)?;
        writeln!(f, "    proof-path  :")?;
        writeln!(f, "    {}", stringify_path(&self.body.proof_path))?;
        writeln!(f)?;
        let status = match h.status {
            Status::Unvalidated => "UNVALIDATED",
            Status::Valid => "SUCCESS",
            Status::Invalid => "FAILURE",
        };
        writeln!(f, "    status      : {status}")?;
        writeln!(f)?;
        writeln!(f, "    -------------------------------- END OF PROOF --------------------------------")
    }
}
