//! # DocStore Codec
//!
//! The document model and its encodings.
//!
//! This crate provides:
//! - [`Value`], the hierarchical document tree (booleans, integers, floats,
//!   strings, arrays, objects)
//! - [`Path`], symbolic addresses of nodes inside a document
//! - JSON text [`parse`] / [`serialize`], with object order preserved
//! - A binary CBOR snapshot encoding ([`to_cbor`] / [`from_cbor`])
//! - [`Format`], selecting one of the two at a persistence boundary
//!
//! ## Usage
//!
//! ```
//! use docstore_codec::{parse, serialize, Value};
//!
//! let doc = parse(r#"{"port": 8080}"#).unwrap();
//! assert_eq!(doc.get("port"), Some(&Value::Integer(8080)));
//! assert_eq!(serialize(&doc).unwrap(), r#"{"port":8080}"#);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod format;
mod path;
mod text;
mod value;

pub use decoder::{from_cbor, SnapshotDecoder, MAX_DEPTH};
pub use encoder::{to_cbor, SnapshotEncoder};
pub use error::{CodecError, CodecResult};
pub use format::Format;
pub use path::{is_valid_key, Path, PathSegment, RESERVED_KEY_CHARS};
pub use text::{parse, serialize, serialize_pretty};
pub use value::{Value, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_key() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,7}"
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            (-1.0e12f64..1.0e12).prop_map(Value::Float),
            "[ -~]{0,12}".prop_map(Value::Text),
        ];
        leaf.prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec((arb_key(), inner), 0..6).prop_map(Value::from_entries),
            ]
        })
    }

    proptest! {
        #[test]
        fn json_roundtrip(value in arb_value()) {
            let text = serialize(&value).unwrap();
            prop_assert_eq!(parse(&text).unwrap(), value);
        }

        #[test]
        fn cbor_roundtrip(value in arb_value()) {
            let bytes = to_cbor(&value).unwrap();
            prop_assert_eq!(from_cbor(&bytes).unwrap(), value);
        }

        #[test]
        fn path_text_roundtrip(keys in prop::collection::vec(arb_key(), 0..5), idx in 0usize..100) {
            let mut path = Path::root();
            for key in &keys {
                path = path.key(key.as_str()).index(idx);
            }
            let text = path.to_string();
            prop_assert_eq!(text.parse::<Path>().unwrap(), path);
        }
    }

    #[test]
    fn nested_roundtrip() {
        let value = Value::from_entries([
            (
                "users",
                Value::from(vec![
                    Value::from_entries([("name", Value::from("Alice")), ("age", Value::from(30))]),
                    Value::from_entries([("name", Value::from("Bob")), ("age", Value::from(25))]),
                ]),
            ),
            ("count", Value::from(2)),
        ]);
        let bytes = to_cbor(&value).unwrap();
        assert_eq!(from_cbor(&bytes).unwrap(), value);
        assert_eq!(parse(&serialize(&value).unwrap()).unwrap(), value);
    }
}
