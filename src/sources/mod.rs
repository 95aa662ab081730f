//! Input sources for a pipeline run.
//!
//! A source is anything that yields text: a file on disk, an in-memory
//! string, or raw bytes with an optional declared encoding. Every source is
//! read fully into memory; inputs are expected to be text logs.
//!
//! Decoding is best effort:
//!   1. A declared encoding wins.
//!   2. A byte-order mark selects UTF-8 / UTF-16LE / UTF-16BE.
//!   3. Strictly valid UTF-8 is taken as is.
//!   4. Otherwise the configured fallback is applied, replacing any
//!      undecodable sequence with U+FFFD instead of failing.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{ExtractorError, Result};

/// Text encodings understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16le")]
    Utf16Le,
    #[serde(rename = "utf-16be")]
    Utf16Be,
    /// ISO-8859-1; every byte maps to the code point of the same value
    #[serde(rename = "latin1")]
    Latin1,
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Latin1 => "latin1",
        };
        f.write_str(s)
    }
}

/// One unit of input for the pipeline.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// A file read from disk at run time
    Path(PathBuf),
    /// Already decoded text
    Text { label: String, text: String },
    /// Raw bytes, optionally with a known encoding
    Bytes {
        label: String,
        bytes: Vec<u8>,
        encoding: Option<TextEncoding>,
    },
}

impl InputSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        InputSource::Path(path.into())
    }

    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        InputSource::Text {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn bytes(label: impl Into<String>, bytes: Vec<u8>, encoding: Option<TextEncoding>) -> Self {
        InputSource::Bytes {
            label: label.into(),
            bytes,
            encoding,
        }
    }

    /// Human-readable name used in logs and errors.
    pub fn label(&self) -> String {
        match self {
            InputSource::Path(p) => p.display().to_string(),
            InputSource::Text { label, .. } | InputSource::Bytes { label, .. } => label.clone(),
        }
    }

    /// Read and decode the whole source.
    pub fn read(&self, fallback: TextEncoding) -> Result<DecodedText> {
        match self {
            InputSource::Path(p) => {
                let bytes = fs::read(p).map_err(|e| ExtractorError::source_read(self.label(), e))?;
                Ok(decode_bytes(&bytes, None, fallback))
            }
            InputSource::Text { text, .. } => Ok(DecodedText {
                text: text.clone(),
                encoding: TextEncoding::Utf8,
                lossy: false,
            }),
            InputSource::Bytes {
                bytes, encoding, ..
            } => Ok(decode_bytes(bytes, *encoding, fallback)),
        }
    }
}

/// Result of decoding a source.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    /// Encoding that was applied
    pub encoding: TextEncoding,
    /// Whether replacement characters were substituted
    pub lossy: bool,
}

/// Sniff a byte-order mark, returning the encoding and BOM length.
pub fn sniff_bom(bytes: &[u8]) -> Option<(TextEncoding, usize)> {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => Some((TextEncoding::Utf8, 3)),
        [0xFF, 0xFE, ..] => Some((TextEncoding::Utf16Le, 2)),
        [0xFE, 0xFF, ..] => Some((TextEncoding::Utf16Be, 2)),
        _ => None,
    }
}

/// Decode bytes following the declared → BOM → UTF-8 → fallback order.
pub fn decode_bytes(
    bytes: &[u8],
    declared: Option<TextEncoding>,
    fallback: TextEncoding,
) -> DecodedText {
    let (encoding, body) = if let Some(enc) = declared {
        let skip = match sniff_bom(bytes) {
            Some((bom_enc, len)) if bom_enc == enc => len,
            _ => 0,
        };
        (enc, &bytes[skip..])
    } else if let Some((enc, len)) = sniff_bom(bytes) {
        (enc, &bytes[len..])
    } else if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText {
            text: text.to_string(),
            encoding: TextEncoding::Utf8,
            lossy: false,
        };
    } else {
        (fallback, bytes)
    };

    let (text, lossy) = decode_with(encoding, body);
    DecodedText {
        text,
        encoding,
        lossy,
    }
}

fn decode_with(encoding: TextEncoding, bytes: &[u8]) -> (String, bool) {
    match encoding {
        TextEncoding::Utf8 => {
            let text = String::from_utf8_lossy(bytes);
            let lossy = matches!(text, std::borrow::Cow::Owned(_));
            (text.into_owned(), lossy)
        }
        TextEncoding::Latin1 => (bytes.iter().map(|&b| b as char).collect(), false),
        TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
        TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> (String, bool) {
    let mut lossy = bytes.len() % 2 != 0;
    let units = bytes.chunks_exact(2).map(|c| to_unit([c[0], c[1]]));
    let mut text: String = char::decode_utf16(units)
        .map(|r| {
            r.unwrap_or_else(|_| {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();
    if bytes.len() % 2 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    (text, lossy)
}
