// File: hashlog-hash/src/encoding.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Text encodings a tree may apply to text records before hashing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "utf_8")]
    Utf8,
    /// Little endian, no byte order mark
    #[serde(rename = "utf_16")]
    Utf16,
    #[serde(rename = "utf_16_be")]
    Utf16Be,
    /// Little endian, no byte order mark
    #[serde(rename = "utf_32")]
    Utf32,
    #[serde(rename = "utf_32_be")]
    Utf32Be,
    #[serde(rename = "ascii")]
    Ascii,
    #[serde(rename = "latin_1")]
    Latin1,
}

pub const ENCODINGS: [Encoding; 7] = [
    Encoding::Utf8,
    Encoding::Utf16,
    Encoding::Utf16Be,
    Encoding::Utf32,
    Encoding::Utf32Be,
    Encoding::Ascii,
    Encoding::Latin1,
];

impl Encoding {
    pub fn from_name(name: &str) -> Result<Self> {
        ENCODINGS
            .iter()
            .copied()
            .find(|e| e.name() == name)
            .ok_or_else(|| Error::UnsupportedEncoding(name.to_string()))
    }

    /// Identifier recorded in proof headers.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf_8",
            Encoding::Utf16 => "utf_16",
            Encoding::Utf16Be => "utf_16_be",
            Encoding::Utf32 => "utf_32",
            Encoding::Utf32Be => "utf_32_be",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin_1",
        }
    }

    pub fn display_name(self) -> String {
        self.name().to_uppercase().replace('_', "-")
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        let out = match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16 => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Encoding::Utf32 => text.chars().flat_map(|c| (c as u32).to_le_bytes()).collect(),
            Encoding::Utf32Be => text.chars().flat_map(|c| (c as u32).to_be_bytes()).collect(),
            Encoding::Ascii => {
                if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(self.unencodable(c));
                }
                text.as_bytes().to_vec()
            }
            Encoding::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                for c in text.chars() {
                    let code = u32::from(c);
                    if code > 0xFF { return Err(self.unencodable(c)); }
                    out.push(code as u8);
                }
                out
            }
        };
        Ok(out)
    }

    /// Whether `bytes` is a well-formed text under this encoding.
    pub fn decodes(self, bytes: &[u8]) -> bool {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).is_ok(),
            Encoding::Utf16 | Encoding::Utf16Be => {
                if bytes.len() % 2 != 0 { return false; }
                let units = bytes.chunks_exact(2).map(|c| {
                    let pair = [c[0], c[1]];
                    if self == Encoding::Utf16 { u16::from_le_bytes(pair) } else { u16::from_be_bytes(pair) }
                });
                char::decode_utf16(units).all(|c| c.is_ok())
            }
            Encoding::Utf32 | Encoding::Utf32Be => {
                if bytes.len() % 4 != 0 { return false; }
                bytes.chunks_exact(4).all(|c| {
                    let quad = [c[0], c[1], c[2], c[3]];
                    let code = if self == Encoding::Utf32 { u32::from_le_bytes(quad) } else { u32::from_be_bytes(quad) };
                    char::from_u32(code).is_some()
                })
            }
            Encoding::Ascii => bytes.is_ascii(),
            Encoding::Latin1 => true,
        }
    }

    fn unencodable(self, c: char) -> Error {
        Error::Unencodable { encoding: self.name().to_string(), reason: format!("character {c:?} out of range") }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A leaf record as supplied by a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    Bytes(Vec<u8>),
    Text(String),
}

impl From<Vec<u8>> for Record {
    fn from(v: Vec<u8>) -> Self { Record::Bytes(v) }
}

impl From<&[u8]> for Record {
    fn from(v: &[u8]) -> Self { Record::Bytes(v.to_vec()) }
}

impl<const N: usize> From<&[u8; N]> for Record {
    fn from(v: &[u8; N]) -> Self { Record::Bytes(v.to_vec()) }
}

impl From<String> for Record {
    fn from(s: String) -> Self { Record::Text(s) }
}

impl From<&str> for Record {
    fn from(s: &str) -> Self { Record::Text(s.to_string()) }
}
