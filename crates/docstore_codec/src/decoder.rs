//! Binary snapshot decoder.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;

/// Decode a document from CBOR bytes.
///
/// The whole input must be consumed by exactly one item.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CBOR, contain constructs the
/// snapshot format does not allow (null, byte strings, non-text keys,
/// indefinite lengths, NaN), or have trailing data.
pub fn from_cbor(bytes: &[u8]) -> CodecResult<Value> {
    let mut decoder = SnapshotDecoder::new(bytes);
    let value = decoder.decode()?;
    if !decoder.is_empty() {
        return Err(CodecError::invalid_structure(format!(
            "{} trailing bytes after document",
            decoder.remaining().len()
        )));
    }
    Ok(value)
}

/// A CBOR decoder for document snapshots.
pub struct SnapshotDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
}

/// Maximum allowed element count for arrays and maps.
/// Bounds allocations driven by untrusted length prefixes.
const MAX_CONTAINER_ELEMENTS: u64 = 16 * 1024 * 1024;

/// Maximum allowed string length in bytes.
const MAX_TEXT_LENGTH: u64 = 256 * 1024 * 1024;

/// Maximum container nesting, kept below the JSON reader's recursion limit
/// so that every storable document can be read back in either format.
pub const MAX_DEPTH: usize = 100;

impl<'a> SnapshotDecoder<'a> {
    /// Create a new decoder for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
        }
    }

    /// Decode the next value.
    pub fn decode(&mut self) -> CodecResult<Value> {
        let initial_byte = self.read_byte()?;
        let major_type = initial_byte >> 5;
        let additional_info = initial_byte & 0x1f;

        match major_type {
            0 => {
                let n = self.decode_unsigned(additional_info)?;
                i64::try_from(n)
                    .map(Value::Integer)
                    .map_err(|_| CodecError::IntegerOverflow)
            }
            1 => {
                // Negative integer: value is -(n+1)
                let n = self.decode_unsigned(additional_info)?;
                i64::try_from(n)
                    .map(|n| Value::Integer(-n - 1))
                    .map_err(|_| CodecError::IntegerOverflow)
            }
            2 => Err(CodecError::unsupported_type("byte string")),
            3 => self.decode_text(additional_info).map(Value::Text),
            4 => self.nested(|d| d.decode_array(additional_info)),
            5 => self.nested(|d| d.decode_object(additional_info)),
            6 => Err(CodecError::unsupported_type("tag")),
            7 => self.decode_simple(additional_info),
            _ => Err(CodecError::invalid_structure("invalid major type")),
        }
    }

    /// Check if all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> CodecResult<T>) -> CodecResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(CodecError::DepthLimitExceeded {
                max_depth: MAX_DEPTH,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    #[inline]
    fn read_byte(&mut self) -> CodecResult<u8> {
        let byte = *self.data.get(self.pos).ok_or(CodecError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    #[inline]
    fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(CodecError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(CodecError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn decode_unsigned(&mut self, additional_info: u8) -> CodecResult<u64> {
        match additional_info {
            0..=23 => Ok(u64::from(additional_info)),
            24 => Ok(u64::from(self.read_byte()?)),
            25 => Ok(u64::from(u16::from_be_bytes(self.read_array()?))),
            26 => Ok(u64::from(u32::from_be_bytes(self.read_array()?))),
            27 => Ok(u64::from_be_bytes(self.read_array()?)),
            28..=30 => Err(CodecError::invalid_structure("reserved additional info")),
            _ => Err(CodecError::IndefiniteLengthForbidden),
        }
    }

    fn decode_length(&mut self, additional_info: u8, max: u64) -> CodecResult<usize> {
        let claimed = self.decode_unsigned(additional_info)?;
        if claimed > max {
            return Err(CodecError::SizeLimitExceeded {
                claimed,
                max_allowed: max,
            });
        }
        usize::try_from(claimed).map_err(|_| CodecError::SizeLimitExceeded {
            claimed,
            max_allowed: max,
        })
    }

    fn decode_text(&mut self, additional_info: u8) -> CodecResult<String> {
        let len = self.decode_length(additional_info, MAX_TEXT_LENGTH)?;
        let bytes = self.read_bytes(len)?;
        let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
        Ok(text.to_string())
    }

    fn decode_array(&mut self, additional_info: u8) -> CodecResult<Value> {
        let len = self.decode_length(additional_info, MAX_CONTAINER_ELEMENTS)?;
        // Each element takes at least one byte.
        let mut items = Vec::with_capacity(len.min(self.remaining().len()));
        for _ in 0..len {
            items.push(self.decode()?);
        }
        Ok(Value::Array(items))
    }

    fn decode_object(&mut self, additional_info: u8) -> CodecResult<Value> {
        let len = self.decode_length(additional_info, MAX_CONTAINER_ELEMENTS)?;
        let mut entries: Vec<(String, Value)> =
            Vec::with_capacity(len.min(self.remaining().len() / 2));

        for _ in 0..len {
            let initial_byte = self.read_byte()?;
            if initial_byte >> 5 != 3 {
                return Err(CodecError::invalid_structure("object keys must be text"));
            }
            let key = self.decode_text(initial_byte & 0x1f)?;
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(CodecError::DuplicateKey { key });
            }
            let value = self.decode()?;
            entries.push((key, value));
        }

        Ok(Value::Object(entries))
    }

    fn decode_simple(&mut self, additional_info: u8) -> CodecResult<Value> {
        match additional_info {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 | 23 => Err(CodecError::unsupported_type("null")),
            25 => {
                let half = u16::from_be_bytes(self.read_array()?);
                float_value(half_to_f64(half))
            }
            26 => float_value(f64::from(f32::from_be_bytes(self.read_array()?))),
            27 => float_value(f64::from_be_bytes(self.read_array()?)),
            28..=30 => Err(CodecError::invalid_structure("reserved additional info")),
            31 => Err(CodecError::invalid_structure("break without indefinite")),
            _ => Err(CodecError::unsupported_type(format!(
                "simple value {additional_info}"
            ))),
        }
    }
}

fn float_value(f: f64) -> CodecResult<Value> {
    if f.is_nan() {
        Err(CodecError::NaNForbidden)
    } else {
        Ok(Value::Float(f))
    }
}

/// Widens an IEEE 754 half-precision float.
fn half_to_f64(half: u16) -> f64 {
    let sign = if half & 0x8000 == 0 { 1.0 } else { -1.0 };
    let exponent = i32::from((half >> 10) & 0x1f);
    let mantissa = f64::from(half & 0x03ff);

    let magnitude = match exponent {
        0 => mantissa * 2f64.powi(-24),
        31 if mantissa == 0.0 => f64::INFINITY,
        31 => f64::NAN,
        _ => (1.0 + mantissa / 1024.0) * 2f64.powi(exponent - 15),
    };
    sign * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_bool() {
        assert_eq!(from_cbor(&[0xf4]).unwrap(), Value::Bool(false));
        assert_eq!(from_cbor(&[0xf5]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn decode_integers() {
        assert_eq!(from_cbor(&[0x17]).unwrap(), Value::Integer(23));
        assert_eq!(from_cbor(&[0x18, 255]).unwrap(), Value::Integer(255));
        assert_eq!(from_cbor(&[0x19, 0x1f, 0x90]).unwrap(), Value::Integer(8080));
        assert_eq!(from_cbor(&[0x20]).unwrap(), Value::Integer(-1));
        assert_eq!(from_cbor(&[0x38, 99]).unwrap(), Value::Integer(-100));
    }

    #[test]
    fn decode_integer_overflow() {
        let mut bytes = vec![0x1b];
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        assert_eq!(from_cbor(&bytes), Err(CodecError::IntegerOverflow));
    }

    #[test]
    fn decode_floats_of_every_width() {
        // 1.5 as half, single and double precision
        assert_eq!(from_cbor(&[0xf9, 0x3e, 0x00]).unwrap(), Value::Float(1.5));
        assert_eq!(
            from_cbor(&[0xfa, 0x3f, 0xc0, 0x00, 0x00]).unwrap(),
            Value::Float(1.5)
        );
        let mut double = vec![0xfb];
        double.extend_from_slice(&1.5f64.to_be_bytes());
        assert_eq!(from_cbor(&double).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn reject_nan() {
        assert_eq!(from_cbor(&[0xf9, 0x7e, 0x00]), Err(CodecError::NaNForbidden));
    }

    #[test]
    fn decode_object_preserves_order() {
        let value = from_cbor(&[0xa2, 0x61, b'b', 0x01, 0x61, b'a', 0x02]).unwrap();
        let keys: Vec<_> = value
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn reject_non_text_keys() {
        assert!(matches!(
            from_cbor(&[0xa1, 0x01, 0x01]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn reject_duplicate_keys() {
        assert!(matches!(
            from_cbor(&[0xa2, 0x61, b'a', 0x01, 0x61, b'a', 0x02]),
            Err(CodecError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn reject_unsupported_items() {
        assert!(matches!(
            from_cbor(&[0xf6]),
            Err(CodecError::UnsupportedType { .. })
        ));
        assert!(matches!(
            from_cbor(&[0x43, 1, 2, 3]),
            Err(CodecError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn reject_indefinite_length() {
        assert_eq!(
            from_cbor(&[0x9f, 0x01, 0xff]),
            Err(CodecError::IndefiniteLengthForbidden)
        );
        assert_eq!(
            from_cbor(&[0xbf, 0x61, b'a', 0x01, 0xff]),
            Err(CodecError::IndefiniteLengthForbidden)
        );
    }

    #[test]
    fn reject_trailing_bytes() {
        assert!(matches!(
            from_cbor(&[0x01, 0x02]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn reject_excessive_nesting() {
        let bytes = vec![0x81; MAX_DEPTH + 1];
        assert!(matches!(
            from_cbor(&bytes),
            Err(CodecError::DepthLimitExceeded { .. })
        ));
    }

    #[test]
    fn reject_oversized_length() {
        let mut bytes = vec![0x9b];
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        assert!(matches!(
            from_cbor(&bytes),
            Err(CodecError::SizeLimitExceeded { .. })
        ));
    }

    #[test]
    fn unexpected_eof() {
        assert_eq!(from_cbor(&[]), Err(CodecError::UnexpectedEof));
        assert_eq!(from_cbor(&[0x18]), Err(CodecError::UnexpectedEof));
        assert_eq!(from_cbor(&[0x82, 0x01]), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert_eq!(from_cbor(&[0x62, 0xff, 0xfe]), Err(CodecError::InvalidUtf8));
    }
}
