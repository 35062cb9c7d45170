//! Selection between the text and binary document encodings.

use crate::decoder::from_cbor;
use crate::encoder::to_cbor;
use crate::error::{CodecError, CodecResult};
use crate::text::{parse, serialize, serialize_pretty};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Encoding used at a persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// UTF-8 JSON text.
    #[default]
    Json,
    /// Binary CBOR snapshot.
    Cbor,
}

impl Format {
    /// Encode a document in this format.
    ///
    /// `pretty` only affects [`Format::Json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the document holds a float the format cannot
    /// represent.
    pub fn encode(self, value: &Value, pretty: bool) -> CodecResult<Vec<u8>> {
        match self {
            Format::Json if pretty => serialize_pretty(value).map(String::into_bytes),
            Format::Json => serialize(value).map(String::into_bytes),
            Format::Cbor => to_cbor(value),
        }
    }

    /// Decode a document from bytes in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid document.
    pub fn decode(self, bytes: &[u8]) -> CodecResult<Value> {
        match self {
            Format::Json => {
                let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
                parse(text)
            }
            Format::Cbor => from_cbor(bytes),
        }
    }

    /// Lowercase name of the format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Cbor => "cbor",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "cbor" => Ok(Format::Cbor),
            other => Err(CodecError::unsupported_type(format!("format '{other}'"))),
        }
    }
}
