//! Explicit decode functions keyed by a type identifier.
//!
//! Callers that only know at runtime which structure a value should become
//! (a CLI flag, a schema id in a payload) look the target up here instead of
//! inspecting types.
use std::any::Any;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, ValueError};
use crate::path_de::{from_value_with_path, short_type_name};
use crate::value::PolymorphicValue;

pub type Decoded = Box<dyn Any + Send>;

type DecodeFn = fn(&PolymorphicValue) -> Result<Decoded>;
type EncodeFn = fn(&Decoded) -> Result<PolymorphicValue>;

struct Entry {
    type_name: &'static str,
    decode: DecodeFn,
    encode: EncodeFn,
}

#[derive(Default)]
pub struct DecoderRegistry {
    entries: IndexMap<String, Entry>,
}

fn decode_boxed<T: DeserializeOwned + Send + 'static>(value: &PolymorphicValue) -> Result<Decoded> {
    from_value_with_path::<T>(value).map(|t| Box::new(t) as Decoded)
}

fn encode_boxed<T: Serialize + 'static>(decoded: &Decoded) -> Result<PolymorphicValue> {
    match decoded.downcast_ref::<T>() {
        Some(t) => PolymorphicValue::from_serialize(t),
        None => Err(ValueError::Decode {
            target: short_type_name::<T>().to_string(),
            path: ".".to_string(),
            message: "registered encoder received a value of another type".to_string(),
        }),
    }
}

impl DecoderRegistry {
    pub fn new() -> Self { Self::default() }

    /// Registering an id twice replaces the earlier decoder.
    pub fn register<T>(&mut self, type_id: impl Into<String>) -> &mut Self
    where
        T: DeserializeOwned + Serialize + Send + 'static,
    {
        let type_id = type_id.into();
        let entry = Entry {
            type_name: std::any::type_name::<T>(),
            decode: decode_boxed::<T>,
            encode: encode_boxed::<T>,
        };
        if let Some(previous) = self.entries.insert(type_id.clone(), entry) {
            tracing::warn!(type_id = %type_id, previous = previous.type_name, "decoder replaced");
        }
        self
    }

    pub fn contains(&self, type_id: &str) -> bool { self.entries.contains_key(type_id) }

    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn entry(&self, type_id: &str) -> Result<&Entry> {
        self.entries
            .get(type_id)
            .ok_or_else(|| ValueError::UnknownTarget(type_id.to_string()))
    }

    pub fn decode(&self, type_id: &str, value: &PolymorphicValue) -> Result<Decoded> {
        let entry = self.entry(type_id)?;
        tracing::trace!(type_id, target = entry.type_name, "dispatching decode");
        (entry.decode)(value)
    }

    pub fn decode_as<T: 'static>(&self, type_id: &str, value: &PolymorphicValue) -> Result<T> {
        let entry = self.entry(type_id)?;
        let decoded = (entry.decode)(value)?;
        decoded.downcast::<T>().map(|t| *t).map_err(|_| ValueError::Decode {
            target: short_type_name::<T>().to_string(),
            path: ".".to_string(),
            message: format!("`{type_id}` decodes into {}", entry.type_name),
        })
    }

    /// Decode into the registered structure and encode it back, yielding the
    /// value in that structure's normalized wire form.
    pub fn decode_to_value(&self, type_id: &str, value: &PolymorphicValue) -> Result<PolymorphicValue> {
        let entry = self.entry(type_id)?;
        let decoded = (entry.decode)(value)?;
        (entry.encode)(&decoded)
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, e)| (k, e.type_name)))
            .finish()
    }
}
