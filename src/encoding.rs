/*!
 * Byte-order-mark sniffing and text decoding.
 *
 * Subtitle files show up as UTF-8, UTF-16 (either byte order) or UTF-32. The
 * encoding is guessed from the first bytes only; anything without a recognized
 * mark is read as UTF-8, with invalid sequences replaced.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];
const UTF32LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];

/// Encoding detected on input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf32Le,
    Utf16Le,
    Utf16Be,
    Utf8,
}

/// Detect the encoding from a file's leading bytes.
///
/// The order matters: the UTF-32 mark starts with the UTF-16LE one.
pub fn detect(bytes: &[u8]) -> TextEncoding {
    if bytes.len() >= 4 && bytes[..4] == UTF32LE_BOM {
        return TextEncoding::Utf32Le;
    }
    if bytes.len() < 2 {
        return TextEncoding::Utf8;
    }
    if bytes[..2] == UTF16LE_BOM {
        TextEncoding::Utf16Le
    } else if bytes[..2] == UTF16BE_BOM {
        TextEncoding::Utf16Be
    } else {
        TextEncoding::Utf8
    }
}

/// Detect the encoding, strip the byte order mark and decode
pub fn decode(bytes: &[u8]) -> String {
    match detect(bytes) {
        TextEncoding::Utf32Le => decode_utf32le(&bytes[UTF32LE_BOM.len()..]),
        TextEncoding::Utf16Le => decode_utf16(&bytes[UTF16LE_BOM.len()..], u16::from_le_bytes),
        TextEncoding::Utf16Be => decode_utf16(&bytes[UTF16BE_BOM.len()..], u16::from_be_bytes),
        TextEncoding::Utf8 => {
            let body = bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes);
            String::from_utf8_lossy(body).into_owned()
        }
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks(2).map(|pair| match pair {
        [a, b] => to_unit([*a, *b]),
        // A dangling odd byte cannot form a code unit
        _ => 0xFFFD,
    });
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn decode_utf32le(bytes: &[u8]) -> String {
    bytes
        .chunks(4)
        .map(|chunk| match chunk {
            [a, b, c, d] => char::from_u32(u32::from_le_bytes([*a, *b, *c, *d]))
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            _ => char::REPLACEMENT_CHARACTER,
        })
        .collect()
}

/// Encoding used when writing files
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    #[default]
    Utf8,
    #[serde(rename = "utf8-bom")]
    Utf8Bom,
    Utf16le,
    Utf16be,
}

impl OutputEncoding {
    /// Encode `text`, prefixed with a byte order mark for every encoding but plain UTF-8
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf8Bom => {
                let mut out = UTF8_BOM.to_vec();
                out.extend_from_slice(text.as_bytes());
                out
            }
            Self::Utf16le => {
                let mut out = UTF16LE_BOM.to_vec();
                out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                out
            }
            Self::Utf16be => {
                let mut out = UTF16BE_BOM.to_vec();
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                out
            }
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Utf8 => "utf8",
            Self::Utf8Bom => "utf8-bom",
            Self::Utf16le => "utf16le",
            Self::Utf16be => "utf16be",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for OutputEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "utf8-bom" | "utf-8-bom" => Ok(Self::Utf8Bom),
            "utf16le" | "utf-16le" => Ok(Self::Utf16le),
            "utf16be" | "utf-16be" => Ok(Self::Utf16be),
            _ => Err(anyhow::anyhow!("Invalid output encoding: {}", s)),
        }
    }
}
