//! Wire fields a producer may send as `"a"` or `["a", "b"]`.
//!
//! In memory they are always an ordered `Vec<String>`. On the wire the most
//! compact form is re-derived:
//!
//! | in memory      | wire         |
//! |----------------|--------------|
//! | `[]` / absent  | `null`       |
//! | `["a"]`        | `"a"`        |
//! | `["a", "b"]`   | `["a","b"]`  |
//!
//! Decoding accepts a string, an array of strings, or `null`; anything else is
//! a type mismatch. Use [`StringOrStringArray`] as a field type, or the
//! functions in this module with `#[serde(with = "...")]` on a plain
//! `Vec<String>` (or [`option`] on an `Option<Vec<String>>`).
use std::ops::Deref;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::{Result, ValueError};
use crate::value::PolymorphicValue;

const EXPECTED: &str = "string, array of strings, or null";

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct StringOrStringArray(Vec<String>);

impl StringOrStringArray {
    pub fn new(items: Vec<String>) -> Self { Self(items) }
    pub fn into_vec(self) -> Vec<String> { self.0 }

    pub fn from_value(value: &PolymorphicValue) -> Result<Self> {
        match value {
            PolymorphicValue::Null => Ok(Self::default()),
            PolymorphicValue::String(s) => Ok(Self(vec![s.clone()])),
            PolymorphicValue::Sequence(xs) => xs
                .iter()
                .map(|x| x.as_string().map(str::to_string))
                .collect::<Result<Vec<_>>>()
                .map(Self),
            other => Err(ValueError::type_mismatch(EXPECTED, other.shape())),
        }
    }

    pub fn to_value(&self) -> PolymorphicValue {
        match self.0.as_slice() {
            [] => PolymorphicValue::Null,
            [one] => PolymorphicValue::String(one.clone()),
            many => PolymorphicValue::Sequence(many.iter().cloned().map(PolymorphicValue::String).collect()),
        }
    }
}

impl Deref for StringOrStringArray {
    type Target = [String];
    fn deref(&self) -> &[String] { &self.0 }
}

impl From<Vec<String>> for StringOrStringArray {
    fn from(items: Vec<String>) -> Self { Self(items) }
}

impl From<StringOrStringArray> for Vec<String> {
    fn from(items: StringOrStringArray) -> Self { items.0 }
}

impl<S: Into<String>> FromIterator<S> for StringOrStringArray {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Serialize for StringOrStringArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for StringOrStringArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize(deserializer).map(Self)
    }
}

// -------------------------- serde `with` API ------------------------------ //

pub fn serialize<S: Serializer>(items: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    match items {
        [] => serializer.serialize_none(),
        [one] => serializer.serialize_str(one),
        many => serializer.collect_seq(many),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = PolymorphicValue::deserialize(deserializer)?;
    StringOrStringArray::from_value(&raw)
        .map(StringOrStringArray::into_vec)
        .map_err(de::Error::custom)
}

/// For `Option<Vec<String>>` fields. `None` encodes as `null`; a present
/// `null` decodes as `Some(vec![])`. Pair with `#[serde(default)]` so an
/// absent field stays `None`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(items: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error> {
        match items {
            None => serializer.serialize_none(),
            Some(items) => super::serialize(items, serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
        super::deserialize(deserializer).map(Some)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Shape;
    use serde_json::json;

    fn strings(xs: &[&str]) -> StringOrStringArray { xs.iter().copied().collect() }

    fn decode(src: &str) -> std::result::Result<StringOrStringArray, serde_json::Error> {
        serde_json::from_str(src)
    }

    #[test]
    fn encode_collapses_by_length() {
        assert_eq!(serde_json::to_string(&strings(&[])).unwrap(), "null");
        assert_eq!(serde_json::to_string(&strings(&["x"])).unwrap(), r#""x""#);
        assert_eq!(serde_json::to_string(&strings(&["x", "y"])).unwrap(), r#"["x","y"]"#);
    }

    #[test]
    fn decode_accepts_null_string_and_array() {
        assert_eq!(decode("null").unwrap(), strings(&[]));
        assert_eq!(decode(r#""x""#).unwrap(), strings(&["x"]));
        assert_eq!(decode(r#"["x","y"]"#).unwrap(), strings(&["x", "y"]));
        assert_eq!(decode("[]").unwrap(), strings(&[]));
        assert_eq!(decode(r#"["x"]"#).unwrap(), strings(&["x"]));
    }

    #[test]
    fn decode_rejects_other_shapes() {
        for src in ["42", "true", r#"{"a":1}"#] {
            let err = decode(src).unwrap_err();
            assert!(err.to_string().contains("unexpected type"), "{src}: {err}");
        }
        let err = decode(r#"["x", 1]"#).unwrap_err();
        assert!(err.to_string().contains("expected string, found number"), "{err}");
    }

    #[test]
    fn from_value_reports_type_mismatch() {
        let err = StringOrStringArray::from_value(&PolymorphicValue::from(42)).unwrap_err();
        assert_eq!(err, ValueError::type_mismatch(EXPECTED, Shape::Number));
        let err = StringOrStringArray::from_value(&PolymorphicValue::Bool(true)).unwrap_err();
        assert!(err.is_type_mismatch());
        let err = StringOrStringArray::from_value(&json!({"a": 1}).into()).unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn round_trip_is_identity_on_sequences() {
        for xs in [&[][..], &["only"][..], &["a", "b", "c"][..]] {
            let original = strings(xs);
            let wire = serde_json::to_string(&original).unwrap();
            assert_eq!(decode(&wire).unwrap(), original);
            assert_eq!(StringOrStringArray::from_value(&original.to_value()).unwrap(), original);
        }
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Record {
        #[serde(with = "crate::string_or_array")]
        required: Vec<String>,
        #[serde(default, with = "crate::string_or_array::option", skip_serializing_if = "Option::is_none")]
        optional: Option<Vec<String>>,
    }

    #[test]
    fn with_modules_drive_derived_structs() {
        let r: Record = serde_json::from_str(r#"{"required":"a"}"#).unwrap();
        assert_eq!(r, Record { required: vec!["a".into()], optional: None });
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"required":"a"}"#);

        let r: Record = serde_json::from_str(r#"{"required":["a","b"],"optional":null}"#).unwrap();
        assert_eq!(r.optional, Some(vec![]));
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"required":["a","b"],"optional":null}"#);
    }
}
