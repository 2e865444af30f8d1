//! Text encodings accepted for the input feeds.
//! polars only reads UTF-8, so single-byte encodings are transcoded first
//! with encoding_rs.

use encoding_rs::WINDOWS_1252;
use polars::prelude::CsvEncoding;
use serde::{Deserialize, Serialize};

/// Encoding of the raw CSV bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum TextEncoding {
    /// Strict UTF-8, invalid bytes fail the parse
    #[serde(rename = "utf8")]
    #[value(name = "utf8")]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD
    #[serde(rename = "lossy-utf8")]
    #[value(name = "lossy-utf8")]
    LossyUtf8,
    /// Windows code page 1252, the encoding the upstream feed is exported in
    #[default]
    #[serde(rename = "windows-1252")]
    #[value(name = "windows-1252")]
    Windows1252,
}

impl TextEncoding {
    pub const ALL: [TextEncoding; 3] = [
        TextEncoding::Utf8,
        TextEncoding::LossyUtf8,
        TextEncoding::Windows1252,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::LossyUtf8 => "lossy-utf8",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Convert raw bytes into something the polars CSV reader accepts,
    /// together with the reader encoding to use on them.
    pub fn prepare(self, raw: Vec<u8>) -> (Vec<u8>, CsvEncoding) {
        match self {
            TextEncoding::Utf8 => (raw, CsvEncoding::Utf8),
            TextEncoding::LossyUtf8 => (raw, CsvEncoding::LossyUtf8),
            TextEncoding::Windows1252 => (decode_windows_1252(&raw).into_bytes(), CsvEncoding::Utf8),
        }
    }
}

/// Decode windows-1252 bytes. Every byte maps to exactly one char.
pub fn decode_windows_1252(bytes: &[u8]) -> String {
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}
