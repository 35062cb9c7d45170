//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use docstore_codec::{Path, PathSegment, Value};
use proptest::prelude::*;

/// Strategy for generating valid object keys.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_-]{0,11}").expect("Invalid regex")
}

/// Strategy for generating strings that are not valid keys.
pub fn invalid_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        ("[a-z]{0,4}", prop::sample::select(vec!['.', '[', ']']), "[a-z]{0,4}")
            .prop_map(|(head, reserved, tail)| format!("{head}{reserved}{tail}")),
    ]
}

/// Strategy for generating finite floats.
///
/// The range keeps values away from the edges of `f64` so that text
/// round-trips stay exact.
pub fn float_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1.0e15f64..1.0e15,
        Just(0.0),
        Just(-0.5),
        Just(f64::MIN_POSITIVE),
    ]
}

/// Strategy for generating scalar values.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        float_strategy().prop_map(Value::Float),
        "\\PC{0,16}".prop_map(Value::Text),
    ]
}

/// Strategy for generating values of bounded depth.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((key_strategy(), inner), 0..6).prop_map(Value::from_entries),
        ]
    })
}

/// Strategy for generating whole documents (the root is always an object).
pub fn document_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec((key_strategy(), value_strategy()), 0..8).prop_map(Value::from_entries)
}

/// Strategy for generating syntactically valid paths.
pub fn path_strategy() -> impl Strategy<Value = Path> {
    prop::collection::vec(
        prop_oneof![
            key_strategy().prop_map(PathSegment::Key),
            (0usize..16).prop_map(PathSegment::Index),
        ],
        0..6,
    )
    .prop_map(Path::from_segments)
}

/// Every path that resolves inside `value`, in depth-first order.
///
/// The root path comes first.
pub fn paths_in(value: &Value) -> Vec<Path> {
    fn walk(value: &Value, here: Path, out: &mut Vec<Path>) {
        out.push(here.clone());
        match value {
            Value::Object(entries) => {
                for (key, child) in entries {
                    walk(child, here.child(key), out);
                }
            }
            Value::Array(items) => {
                for (idx, child) in items.iter().enumerate() {
                    walk(child, here.element(idx), out);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(value, Path::root(), &mut out);
    out
}
