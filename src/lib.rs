//! Polymorphic JSON values for agent API bindings.
//!
//! Wire fields whose shape is only loosely specified (free-form claims, DID
//! service endpoints, "string or array of strings") decode into one
//! six-variant [`PolymorphicValue`] and are read back through narrowing
//! accessors that fail with a typed [`ValueError`] instead of guessing.
//!
//! ```
//! use json_poly::{stream, GenericJsonValue, StringOrStringArray};
//!
//! let v: GenericJsonValue = serde_json::from_str(r#"{"id":12345678901234567890123}"#).unwrap();
//! assert_eq!(v.raw().to_string(), r#"{"id":12345678901234567890123}"#);
//!
//! let types: StringOrStringArray = serde_json::from_str(r#""LinkedDomains""#).unwrap();
//! assert_eq!(&*types, ["LinkedDomains"]);
//! assert_eq!(serde_json::to_string(&types).unwrap(), r#""LinkedDomains""#);
//!
//! assert!(stream::from_str("42").unwrap().as_string().is_err());
//! ```
pub mod error;
pub mod models;
pub mod path_de;
pub mod registry;
pub mod stream;
pub mod string_or_array;
pub mod value;
pub mod views;

pub use error::{Result, ValueError};
pub use registry::DecoderRegistry;
pub use string_or_array::StringOrStringArray;
pub use value::{DecodeOptions, DuplicateKeys, Map, PolymorphicValue, Shape};
pub use views::{GenericJsonValue, ServiceEndpointValue};
