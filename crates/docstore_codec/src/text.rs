//! JSON text form of documents.
//!
//! `Value` implements serde's `Serialize` and `Deserialize` by hand so that
//! object entries keep their document order and integers stay distinct from
//! floats. Null has no counterpart in the document model and is rejected.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Parse a document from JSON text.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] for malformed JSON, nulls,
/// integers outside the i64 range and duplicate object keys.
pub fn parse(text: &str) -> CodecResult<Value> {
    serde_json::from_str(text).map_err(|e| CodecError::decoding_failed(e.to_string()))
}

/// Serialize a document to compact JSON text.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if the document contains a
/// non-finite float, which JSON cannot represent.
pub fn serialize(value: &Value) -> CodecResult<String> {
    serde_json::to_string(value).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Serialize a document to indented JSON text.
///
/// # Errors
///
/// Same as [`serialize`].
pub fn serialize_pretty(value: &Value) -> CodecResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(ser::Error::custom(format!(
                        "non-finite float {f} cannot be written as JSON"
                    )));
                }
                serializer.serialize_f64(*f)
            }
            Value::Text(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, number, string, array or object")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| E::custom(format!("integer {v} does not fit in i64")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Err(E::custom("null is not a document value"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        self.visit_unit()
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries: Vec<(String, Value)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(de::Error::custom(format!("duplicate object key '{key}'")));
            }
            let value = map.next_value()?;
            entries.push((key, value));
        }
        Ok(Value::Object(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scalars() {
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("-7").unwrap(), Value::Integer(-7));
        assert_eq!(parse("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(parse("\"x\"").unwrap(), Value::from("x"));
    }

    #[test]
    fn integer_and_float_stay_distinct() {
        assert_eq!(parse("1").unwrap(), Value::Integer(1));
        assert_eq!(parse("1.0").unwrap(), Value::Float(1.0));
        assert_eq!(serialize(&Value::Float(1.0)).unwrap(), "1.0");
        assert_eq!(parse(&serialize(&Value::Float(1.0)).unwrap()).unwrap(), Value::Float(1.0));
    }

    #[test]
    fn object_order_is_preserved() {
        let value = parse(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        assert_eq!(serialize(&value).unwrap(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn reject_null() {
        assert!(parse("null").is_err());
        assert!(parse(r#"{"a": null}"#).is_err());
    }

    #[test]
    fn reject_duplicate_keys() {
        assert!(parse(r#"{"a": 1, "a": 2}"#).is_err());
    }

    #[test]
    fn reject_huge_unsigned() {
        assert!(parse("18446744073709551615").is_err());
    }

    #[test]
    fn reject_non_finite_on_write() {
        assert!(serialize(&Value::Float(f64::INFINITY)).is_err());
        assert!(serialize(&Value::from(vec![Value::Float(f64::NAN)])).is_err());
    }

    #[test]
    fn nested_document() {
        let text = r#"{"server":{"port":8080,"hosts":["a","b"],"tls":false,"ratio":0.5}}"#;
        let value = parse(text).unwrap();
        assert_eq!(
            value.get("server").and_then(|s| s.get("port")),
            Some(&Value::Integer(8080))
        );
        assert_eq!(serialize(&value).unwrap(), text);
    }

    #[test]
    fn pretty_output_parses_back() {
        let value = Value::from_entries([("a", Value::from(vec![1, 2])), ("b", Value::from("c"))]);
        let pretty = serialize_pretty(&value).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(parse(&pretty).unwrap(), value);
    }
}
