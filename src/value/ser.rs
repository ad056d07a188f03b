//! Canonical encoding: the inverse of the decoder, key order and number
//! literals preserved.
use serde::ser::{Serialize, Serializer};

use super::PolymorphicValue;

impl Serialize for PolymorphicValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(xs) => serializer.collect_seq(xs),
            Self::Mapping(m) => serializer.collect_map(m),
        }
    }
}
