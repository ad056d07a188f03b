use serde::de::DeserializeOwned;

use crate::error::{Result, ValueError};
use crate::value::PolymorphicValue;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(decode_error::<T>)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(decode_error::<T>)
}

/// Canonical encode of `value`, then a structure-aware decode into `T`.
pub fn from_value_with_path<T: DeserializeOwned>(value: &PolymorphicValue) -> Result<T> {
    from_str_with_path(&value.to_string())
}

fn decode_error<T>(err: serde_path_to_error::Error<serde_json::Error>) -> ValueError {
    let path = err.path().to_string();
    ValueError::Decode {
        target: short_type_name::<T>().to_string(),
        path,
        message: err.into_inner().to_string(),
    }
}

/// `json_poly::models::Service` → `Service`; generics keep their arguments.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(i) => &full[i + 2..],
        None => full,
    }
}
