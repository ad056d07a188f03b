//! The six-variant JSON value every polymorphic wire field decodes into.
//!
//! Numbers keep their literal text (`serde_json` is built with
//! `arbitrary_precision`), so a 20-digit identifier or `1.50` survives a
//! decode/encode round trip byte for byte. Objects keep insertion order.
//!
//! The one object that cannot round-trip is a mapping whose first key is
//! `$serde_json::private::Number`, the key `serde_json` uses to carry number
//! literals: a string value under it decodes as that number, anything else
//! is a parse error. `serde_json::Value` has the same limit.
pub mod de;
pub mod ser;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;

use crate::error::{Result, ValueError};

pub use de::{DecodeOptions, DuplicateKeys, ValueSeed};

pub type Map = IndexMap<String, PolymorphicValue>;

// ------------------------------- Types ------------------------------------ //

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PolymorphicValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<PolymorphicValue>),
    Mapping(Map),
}

/// Variant tag, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape { Null, Bool, Number, String, Sequence, Mapping }

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Null => "null",
            Shape::Bool => "boolean",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::Sequence => "array",
            Shape::Mapping => "object",
        })
    }
}

// ---------------------------- Narrowing ----------------------------------- //

impl PolymorphicValue {
    pub fn shape(&self) -> Shape {
        match self {
            Self::Null => Shape::Null,
            Self::Bool(_) => Shape::Bool,
            Self::Number(_) => Shape::Number,
            Self::String(_) => Shape::String,
            Self::Sequence(_) => Shape::Sequence,
            Self::Mapping(_) => Shape::Mapping,
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

    /// Only the `String` variant narrows; numbers and booleans are never
    /// stringified.
    pub fn as_string(&self) -> Result<&str> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(ValueError::type_mismatch("string", other.shape())),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(ValueError::type_mismatch("boolean", other.shape())),
        }
    }

    pub fn as_number(&self) -> Result<&Number> {
        match self {
            Self::Number(n) => Ok(n),
            other => Err(ValueError::type_mismatch("number", other.shape())),
        }
    }

    pub fn as_array(&self) -> Result<&[PolymorphicValue]> {
        match self {
            Self::Sequence(xs) => Ok(xs),
            other => Err(ValueError::type_mismatch("array", other.shape())),
        }
    }

    pub fn as_mapping(&self) -> Result<&Map> {
        match self {
            Self::Mapping(m) => Ok(m),
            other => Err(ValueError::type_mismatch("object", other.shape())),
        }
    }

    /// Encode canonically, then decode into `T` with path diagnostics.
    pub fn as_object<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        crate::path_de::from_value_with_path(self)
    }

    /// RFC 6901 lookup. The empty pointer selects `self`.
    pub fn pointer(&self, pointer: &str) -> Option<&PolymorphicValue> {
        if pointer.is_empty() {
            return Some(self);
        }
        let rest = pointer.strip_prefix('/')?;
        rest.split('/')
            .map(|token| token.replace("~1", "/").replace("~0", "~"))
            .try_fold(self, |node, token| match node {
                Self::Mapping(m) => m.get(&token),
                Self::Sequence(xs) => parse_index(&token).and_then(|i| xs.get(i)),
                _ => None,
            })
    }
}

fn parse_index(token: &str) -> Option<usize> {
    // RFC 6901 forbids leading zeros (except "0" itself) and signs.
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

// --------------------------- Construction --------------------------------- //

impl PolymorphicValue {
    /// `None` for NaN and infinities, which JSON cannot carry.
    pub fn from_f64(f: f64) -> Option<Self> {
        Number::from_f64(f).map(Self::Number)
    }

    /// Wrap any typed value for encoding.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|error| ValueError::Decode {
                target: crate::path_de::short_type_name::<T>().to_string(),
                path: ".".to_string(),
                message: error.to_string(),
            })
    }
}

impl From<serde_json::Value> for PolymorphicValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(xs) => Self::Sequence(xs.into_iter().map(Self::from).collect()),
            Value::Object(m) => Self::Mapping(m.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
        }
    }
}

impl From<PolymorphicValue> for serde_json::Value {
    fn from(value: PolymorphicValue) -> Self {
        use serde_json::Value;
        match value {
            PolymorphicValue::Null => Value::Null,
            PolymorphicValue::Bool(b) => Value::Bool(b),
            PolymorphicValue::Number(n) => Value::Number(n),
            PolymorphicValue::String(s) => Value::String(s),
            PolymorphicValue::Sequence(xs) => Value::Array(xs.into_iter().map(Value::from).collect()),
            PolymorphicValue::Mapping(m) => Value::Object(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

impl From<bool> for PolymorphicValue {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<Number> for PolymorphicValue {
    fn from(n: Number) -> Self { Self::Number(n) }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {$(
        impl From<$ty> for PolymorphicValue {
            fn from(n: $ty) -> Self { Self::Number(Number::from(n)) }
        }
    )*};
}

from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<&str> for PolymorphicValue {
    fn from(s: &str) -> Self { Self::String(s.to_string()) }
}

impl From<String> for PolymorphicValue {
    fn from(s: String) -> Self { Self::String(s) }
}

impl<T: Into<PolymorphicValue>> From<Vec<T>> for PolymorphicValue {
    fn from(xs: Vec<T>) -> Self { Self::Sequence(xs.into_iter().map(Into::into).collect()) }
}

impl From<Map> for PolymorphicValue {
    fn from(m: Map) -> Self { Self::Mapping(m) }
}

impl<T: Into<PolymorphicValue>> From<Option<T>> for PolymorphicValue {
    fn from(value: Option<T>) -> Self { value.map_or(Self::Null, Into::into) }
}

// ---------------------------- Rendering ----------------------------------- //

/// Canonical JSON text; `{:#}` pretty-prints.
impl fmt::Display for PolymorphicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if f.alternate() {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        f.write_str(&text.map_err(|_| fmt::Error)?)
    }
}

// ------------------------------- Tests ------------------------------------ //
