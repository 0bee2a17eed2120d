//! Body text charsets
//!
//! Rules that match on body text decode it with a named charset and encode
//! replacement text back with the same charset. Failures are returned as
//! [`CharsetError`] values; callers decide whether that drops the event.

use crate::error::CharsetError;
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

/// A supported body charset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    UsAscii,
    Iso8859_1,
}

impl Charset {
    /// Look up a charset by label, ignoring case
    ///
    /// # Example
    ///
    /// ```
    /// use event_tweaker::charset::Charset;
    ///
    /// assert_eq!(Charset::for_label("utf-8"), Ok(Charset::Utf8));
    /// assert_eq!(Charset::for_label("Latin1"), Ok(Charset::Iso8859_1));
    /// assert!(Charset::for_label("EBCDIC").is_err());
    /// ```
    pub fn for_label(label: &str) -> Result<Self, CharsetError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Charset::Utf8),
            "us-ascii" | "ascii" => Ok(Charset::UsAscii),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(Charset::Iso8859_1),
            _ => Err(CharsetError::Unsupported(label.to_string())),
        }
    }

    /// Canonical name of the charset
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::UsAscii => "US-ASCII",
            Charset::Iso8859_1 => "ISO-8859-1",
        }
    }

    /// Decode bytes into text
    ///
    /// Never fails: byte sequences the charset cannot represent become
    /// U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::UsAscii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
                .collect(),
            // Every byte maps to the code point of the same value.
            Charset::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }

    /// Encode text into bytes
    ///
    /// Fails on the first character the charset cannot represent.
    pub fn encode(&self, text: &str) -> Result<Bytes, CharsetError> {
        match self {
            Charset::Utf8 => Ok(Bytes::copy_from_slice(text.as_bytes())),
            Charset::UsAscii => self.encode_below(text, 0x80),
            Charset::Iso8859_1 => self.encode_below(text, 0x100),
        }
    }

    fn encode_below(&self, text: &str, limit: u32) -> Result<Bytes, CharsetError> {
        text.chars()
            .map(|ch| {
                u8::try_from(ch as u32)
                    .ok()
                    .filter(|&b| u32::from(b) < limit)
                    .ok_or(CharsetError::Unmappable {
                        charset: self.name(),
                        ch,
                    })
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(Bytes::from)
    }
}

impl FromStr for Charset {
    type Err = CharsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s)
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
