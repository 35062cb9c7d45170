//! Binary snapshot encoder.
//!
//! Documents are written as CBOR (RFC 8949) with a fixed subset of rules:
//! - Integers use the shortest encoding
//! - Floats are always written as 64-bit (`0xfb`)
//! - Objects are maps with text keys, written in document order
//! - No indefinite-length items, no tags

use crate::error::{CodecError, CodecResult};
use crate::value::Value;

/// Encode a document to CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::NaNForbidden`] if the document contains a NaN.
pub fn to_cbor(value: &Value) -> CodecResult<Vec<u8>> {
    let mut encoder = SnapshotEncoder::new();
    encoder.encode(value)?;
    Ok(encoder.into_bytes())
}

/// Major types used by snapshots.
const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;

const FALSE: u8 = 0xf4;
const TRUE: u8 = 0xf5;
const FLOAT64: u8 = 0xfb;

/// A CBOR encoder for document snapshots.
///
/// The encoder appends to an internal buffer, so several documents may be
/// written back to back before the bytes are taken out.
pub struct SnapshotEncoder {
    out: Vec<u8>,
}

impl SnapshotEncoder {
    /// Creates an encoder with an empty buffer.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an encoder whose buffer can hold `capacity` bytes up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Appends `value` to the buffer.
    ///
    /// # Errors
    ///
    /// Fails on NaN floats. The buffer may hold a partial item afterwards.
    pub fn encode(&mut self, value: &Value) -> CodecResult<()> {
        match value {
            Value::Bool(b) => self.out.push(if *b { TRUE } else { FALSE }),
            Value::Integer(n) if *n >= 0 => self.head(MAJOR_UNSIGNED, n.unsigned_abs()),
            // -1 - n, computed without overflow for i64::MIN.
            Value::Integer(n) => self.head(MAJOR_NEGATIVE, !(*n) as u64),
            Value::Float(f) => {
                if f.is_nan() {
                    return Err(CodecError::NaNForbidden);
                }
                self.out.push(FLOAT64);
                self.out.extend_from_slice(&f.to_bits().to_be_bytes());
            }
            Value::Text(s) => self.text(s),
            Value::Array(items) => {
                self.head(MAJOR_ARRAY, items.len() as u64);
                items.iter().try_for_each(|item| self.encode(item))?;
            }
            Value::Object(entries) => {
                self.head(MAJOR_MAP, entries.len() as u64);
                for (key, item) in entries {
                    self.text(key);
                    self.encode(item)?;
                }
            }
        }
        Ok(())
    }

    /// Takes the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    /// Borrows the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    fn text(&mut self, text: &str) {
        self.head(MAJOR_TEXT, text.len() as u64);
        self.out.extend_from_slice(text.as_bytes());
    }

    /// Writes an item head with the shortest argument encoding.
    #[allow(clippy::cast_possible_truncation)]
    fn head(&mut self, major: u8, arg: u64) {
        let major = major << 5;
        match arg {
            0..=23 => self.out.push(major | arg as u8),
            24..=0xff => self.out.extend_from_slice(&[major | 24, arg as u8]),
            0x100..=0xffff => {
                self.out.push(major | 25);
                self.out.extend_from_slice(&(arg as u16).to_be_bytes());
            }
            0x1_0000..=0xffff_ffff => {
                self.out.push(major | 26);
                self.out.extend_from_slice(&(arg as u32).to_be_bytes());
            }
            _ => {
                self.out.push(major | 27);
                self.out.extend_from_slice(&arg.to_be_bytes());
            }
        }
    }
}

impl Default for SnapshotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_bool() {
        assert_eq!(to_cbor(&Value::Bool(false)).unwrap(), vec![0xf4]);
        assert_eq!(to_cbor(&Value::Bool(true)).unwrap(), vec![0xf5]);
    }

    #[test]
    fn encode_small_positive_integers() {
        assert_eq!(to_cbor(&Value::Integer(0)).unwrap(), vec![0x00]);
        assert_eq!(to_cbor(&Value::Integer(23)).unwrap(), vec![0x17]);
    }

    #[test]
    fn encode_wider_integers() {
        assert_eq!(to_cbor(&Value::Integer(24)).unwrap(), vec![0x18, 24]);
        assert_eq!(
            to_cbor(&Value::Integer(8080)).unwrap(),
            vec![0x19, 0x1f, 0x90]
        );
        assert_eq!(
            to_cbor(&Value::Integer(65536)).unwrap(),
            vec![0x1a, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn encode_negative_integers() {
        assert_eq!(to_cbor(&Value::Integer(-1)).unwrap(), vec![0x20]);
        assert_eq!(to_cbor(&Value::Integer(-25)).unwrap(), vec![0x38, 24]);
    }

    #[test]
    fn encode_float_is_always_double() {
        let bytes = to_cbor(&Value::Float(1.5)).unwrap();
        assert_eq!(bytes[0], 0xfb);
        assert_eq!(bytes.len(), 9);
        assert_eq!(&bytes[1..], &1.5f64.to_be_bytes());
    }

    #[test]
    fn encode_nan_fails() {
        assert_eq!(
            to_cbor(&Value::Float(f64::NAN)),
            Err(CodecError::NaNForbidden)
        );
    }

    #[test]
    fn encode_text() {
        assert_eq!(to_cbor(&Value::from("")).unwrap(), vec![0x60]);
        assert_eq!(to_cbor(&Value::from("a")).unwrap(), vec![0x61, b'a']);
    }

    #[test]
    fn encode_object_keeps_document_order() {
        let obj = Value::from_entries([("bb", 2), ("a", 1)]);
        let bytes = to_cbor(&obj).unwrap();
        assert_eq!(bytes, vec![0xa2, 0x62, b'b', b'b', 0x02, 0x61, b'a', 0x01]);
    }

    #[test]
    fn encode_array() {
        assert_eq!(to_cbor(&Value::array()).unwrap(), vec![0x80]);
        assert_eq!(
            to_cbor(&Value::from(vec![1, 2])).unwrap(),
            vec![0x82, 0x01, 0x02]
        );
    }
}
