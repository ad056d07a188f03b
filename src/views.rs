//! Wire-level field types sharing the one decoder but exposing different
//! narrowing contracts.
use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{Result, ValueError};
use crate::value::{Map, PolymorphicValue};

/// A field whose shape is not known statically, e.g. free-form claims.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericJsonValue(PolymorphicValue);

impl GenericJsonValue {
    pub fn new(value: PolymorphicValue) -> Self { Self(value) }

    pub fn as_string(&self) -> Result<&str> { self.0.as_string() }
    pub fn as_bool(&self) -> Result<bool> { self.0.as_bool() }
    pub fn as_number(&self) -> Result<&Number> { self.0.as_number() }
    pub fn as_array(&self) -> Result<&[PolymorphicValue]> { self.0.as_array() }
    pub fn as_mapping(&self) -> Result<&Map> { self.0.as_mapping() }

    /// The only accessor that reads a mapping or sequence as a richer
    /// structure.
    pub fn as_object<T: DeserializeOwned>(&self) -> Result<T> { self.0.as_object() }

    pub fn is_null(&self) -> bool { self.0.is_null() }
    pub fn raw(&self) -> &PolymorphicValue { &self.0 }
    pub fn into_inner(self) -> PolymorphicValue { self.0 }
}

impl From<PolymorphicValue> for GenericJsonValue {
    fn from(value: PolymorphicValue) -> Self { Self(value) }
}

/// A DID service endpoint: contractually one URI-like string or a list of
/// them, although list elements may be arbitrary values (objects included).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceEndpointValue(PolymorphicValue);

impl ServiceEndpointValue {
    const EXPECTED_LIST: &'static str = "string, array, or null";
    const EXPECTED_STRING: &'static str = "string";

    pub fn new(value: PolymorphicValue) -> Self { Self(value) }

    /// Only a bare string narrows; a list fails even when it holds a single
    /// string.
    pub fn as_string(&self) -> Result<&str> {
        match &self.0 {
            PolymorphicValue::String(s) => Ok(s),
            other => Err(ValueError::type_mismatch(Self::EXPECTED_STRING, other.shape())),
        }
    }

    /// Sequence elements as-is; a string becomes a one-element list and
    /// `null` an empty one.
    pub fn as_array(&self) -> Result<Cow<'_, [PolymorphicValue]>> {
        match &self.0 {
            PolymorphicValue::Sequence(xs) => Ok(Cow::Borrowed(xs.as_slice())),
            PolymorphicValue::String(_) => Ok(Cow::Owned(vec![self.0.clone()])),
            PolymorphicValue::Null => Ok(Cow::Borrowed(&[])),
            other => Err(ValueError::type_mismatch(Self::EXPECTED_LIST, other.shape())),
        }
    }
}

impl From<PolymorphicValue> for ServiceEndpointValue {
    fn from(value: PolymorphicValue) -> Self { Self(value) }
}
