//! Recursive-descent decoder from a serde token stream into `PolymorphicValue`.
use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Number;

use super::{Map, PolymorphicValue};

/// Key `serde_json` uses to hand an `arbitrary_precision` number literal to a
/// visitor as a single-entry map.
const NUMBER_TOKEN: &str = "$serde_json::private::Number";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Later occurrences overwrite earlier ones; the key keeps its first position.
    #[default]
    LastWins,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub duplicate_keys: DuplicateKeys,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self { duplicate_keys: DuplicateKeys::Reject }
    }
}

/// Decodes one value under a given policy, leaving the stream after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSeed {
    pub options: DecodeOptions,
}

impl<'de> DeserializeSeed<'de> for ValueSeed {
    type Value = PolymorphicValue;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor { options: self.options })
    }
}

impl<'de> Deserialize<'de> for PolymorphicValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ValueSeed::default().deserialize(deserializer)
    }
}

struct ValueVisitor {
    options: DecodeOptions,
}

impl ValueVisitor {
    fn seed(&self) -> ValueSeed {
        ValueSeed { options: self.options }
    }
}

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = PolymorphicValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PolymorphicValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PolymorphicValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        self.seed().deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
        Ok(PolymorphicValue::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
        Ok(PolymorphicValue::Number(n.into()))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
        Ok(PolymorphicValue::Number(n.into()))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Self::Value, E> {
        Number::from_f64(f)
            .map(PolymorphicValue::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {f}")))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        Ok(PolymorphicValue::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
        Ok(PolymorphicValue::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = seq.next_element_seed(self.seed())? {
            items.push(item);
        }
        Ok(PolymorphicValue::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let Some(first) = map.next_key::<String>()? else {
            return Ok(PolymorphicValue::Mapping(Map::new()));
        };
        if first == NUMBER_TOKEN {
            let literal: String = map.next_value()?;
            return serde_json::from_str::<Number>(&literal)
                .map(PolymorphicValue::Number)
                .map_err(|e| de::Error::custom(format!("invalid number literal `{literal}`: {e}")));
        }

        let mut out = Map::new();
        let mut key = Some(first);
        while let Some(k) = key {
            let v = map.next_value_seed(self.seed())?;
            if out.contains_key(&k) && self.options.duplicate_keys == DuplicateKeys::Reject {
                return Err(de::Error::custom(format!("duplicate object key `{k}`")));
            }
            out.insert(k, v);
            key = map.next_key()?;
        }
        Ok(PolymorphicValue::Mapping(out))
    }
}
