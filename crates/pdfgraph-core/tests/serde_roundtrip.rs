//! Serde serialization/deserialization round-trip tests.
//!
//! Covers the plain data records that carry the optional serde derives.

#![cfg(feature = "serde")]

use pdfgraph_core::*;

/// Helper: serialize to JSON string, deserialize back, assert equality.
fn roundtrip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let json = serde_json::to_string(value).expect("serialize failed");
    let restored: T = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(*value, restored, "round-trip mismatch for JSON: {json}");
}

#[test]
fn test_serde_obj_ref() {
    roundtrip(&ObjRef::new(42));
}

#[test]
fn test_serde_object_kind() {
    roundtrip(&ObjectKind::Outline);
    roundtrip(&ObjectKind::Dictionary);
}

#[test]
fn test_serde_outline_options() {
    roundtrip(&OutlineOptions::default());
    roundtrip(&OutlineOptions::expanded().link_to_page(2));
}

#[test]
fn test_serde_collapsed_count() {
    roundtrip(&CollapsedCount::Omit);
    roundtrip(&CollapsedCount::Signed);
}
