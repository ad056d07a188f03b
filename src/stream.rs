//! Decoding entry points over `serde_json`'s positioned token stream, and the
//! canonical encoders.
use std::io;

use serde::de::DeserializeSeed;
use serde_json::de::{IoRead, Read, SliceRead, StrRead};
use serde_json::{Deserializer, StreamDeserializer};

use crate::error::{Result, ValueError};
use crate::value::{DecodeOptions, DuplicateKeys, PolymorphicValue, ValueSeed};

// ------------------------------ Decoding ---------------------------------- //

/// Decode one value and leave `de` positioned immediately after it.
pub fn decode_next<'de, R: Read<'de>>(de: &mut Deserializer<R>, options: DecodeOptions) -> Result<PolymorphicValue> {
    ValueSeed { options }.deserialize(de).map_err(ValueError::parse)
}

fn decode_document<'de, R: Read<'de>>(mut de: Deserializer<R>, options: DecodeOptions) -> Result<PolymorphicValue> {
    let value = decode_next(&mut de, options)?;
    de.end().map_err(ValueError::parse)?;
    Ok(value)
}

pub fn from_str(src: &str) -> Result<PolymorphicValue> {
    from_str_with(src, DecodeOptions::default())
}

pub fn from_str_with(src: &str, options: DecodeOptions) -> Result<PolymorphicValue> {
    decode_document(Deserializer::new(StrRead::new(src)), options)
}

pub fn from_slice(bytes: &[u8]) -> Result<PolymorphicValue> {
    from_slice_with(bytes, DecodeOptions::default())
}

pub fn from_slice_with(bytes: &[u8], options: DecodeOptions) -> Result<PolymorphicValue> {
    decode_document(Deserializer::new(SliceRead::new(bytes)), options)
}

pub fn from_reader<R: io::Read>(reader: R) -> Result<PolymorphicValue> {
    from_reader_with(reader, DecodeOptions::default())
}

pub fn from_reader_with<R: io::Read>(reader: R, options: DecodeOptions) -> Result<PolymorphicValue> {
    decode_document(Deserializer::new(IoRead::new(reader)), options)
}

// --------------------------- Multi-document ------------------------------- //

/// `PolymorphicValue` decoded under the reject-duplicates policy, so it can
/// ride on `StreamDeserializer`, which only takes `Deserialize` targets.
struct Strict(PolymorphicValue);

impl<'de> serde::Deserialize<'de> for Strict {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ValueSeed { options: DecodeOptions::strict() }.deserialize(deserializer).map(Strict)
    }
}

enum Inner<'de, R: Read<'de>> {
    LastWins(StreamDeserializer<'de, R, PolymorphicValue>),
    Reject(StreamDeserializer<'de, R, Strict>),
}

/// Iterator over whitespace-separated documents (NDJSON and friends).
///
/// Yields the byte offset just past each document alongside the value. The
/// first error ends the stream.
pub struct ValueStream<'de, R: Read<'de>> {
    inner: Inner<'de, R>,
    failed: bool,
}

impl<'de, R: Read<'de>> ValueStream<'de, R> {
    fn with_reader(read: R, options: DecodeOptions) -> Self {
        let de = Deserializer::new(read);
        let inner = match options.duplicate_keys {
            DuplicateKeys::LastWins => Inner::LastWins(de.into_iter()),
            DuplicateKeys::Reject => Inner::Reject(de.into_iter()),
        };
        Self { inner, failed: false }
    }

    pub fn byte_offset(&self) -> usize {
        match &self.inner {
            Inner::LastWins(it) => it.byte_offset(),
            Inner::Reject(it) => it.byte_offset(),
        }
    }
}

impl<'a> ValueStream<'a, SliceRead<'a>> {
    pub fn from_slice(bytes: &'a [u8], options: DecodeOptions) -> Self {
        Self::with_reader(SliceRead::new(bytes), options)
    }
}

impl<'a> ValueStream<'a, StrRead<'a>> {
    pub fn from_str(src: &'a str, options: DecodeOptions) -> Self {
        Self::with_reader(StrRead::new(src), options)
    }
}

impl<R: io::Read> ValueStream<'static, IoRead<R>> {
    pub fn from_reader(reader: R, options: DecodeOptions) -> Self {
        Self::with_reader(IoRead::new(reader), options)
    }
}

impl<'de, R: Read<'de>> Iterator for ValueStream<'de, R> {
    type Item = Result<(usize, PolymorphicValue)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = match &mut self.inner {
            Inner::LastWins(it) => it.next().map(|r| r.map(|v| (it.byte_offset(), v))),
            Inner::Reject(it) => it.next().map(|r| r.map(|Strict(v)| (it.byte_offset(), v))),
        }?;
        match next {
            Ok((offset, value)) => {
                tracing::debug!(offset, shape = %value.shape(), "decoded document");
                Some(Ok((offset, value)))
            }
            Err(error) => {
                self.failed = true;
                Some(Err(ValueError::parse(error)))
            }
        }
    }
}

// ------------------------------ Encoding ---------------------------------- //

pub fn to_string(value: &PolymorphicValue) -> String {
    value.to_string()
}

pub fn to_string_pretty(value: &PolymorphicValue) -> String {
    format!("{value:#}")
}

pub fn to_writer<W: io::Write>(writer: W, value: &PolymorphicValue) -> io::Result<()> {
    serde_json::to_writer(writer, value).map_err(io::Error::from)
}

pub fn to_writer_pretty<W: io::Write>(writer: W, value: &PolymorphicValue) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, value).map_err(io::Error::from)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_next_leaves_stream_after_value() {
        let mut de = Deserializer::from_str(r#"[1,{"a":"b"}] "tail""#);
        let first = decode_next(&mut de, DecodeOptions::default()).unwrap();
        assert_eq!(first.as_array().unwrap().len(), 2);
        let second = decode_next(&mut de, DecodeOptions::default()).unwrap();
        assert_eq!(second.as_string().unwrap(), "tail");
        de.end().unwrap();
    }

    #[test]
    fn whole_document_rejects_trailing_tokens() {
        let err = from_str("1 2").unwrap_err();
        assert!(err.is_parse(), "{err}");
    }

    #[test]
    fn malformed_input_reports_position() {
        let err = from_slice(b"{\"a\": [1, 2,]}").unwrap_err();
        let ValueError::Parse { line, column, .. } = err else { panic!("expected parse error") };
        assert_eq!(line, 1);
        assert!(column > 10, "column {column}");
    }

    #[test]
    fn reader_and_slice_agree() {
        let src = br#"{"id":"did:example:1","n":340282366920938463463374607431768211456}"#;
        let a = from_slice(src).unwrap();
        let b = from_reader(&src[..]).unwrap();
        assert_eq!(a, b);
        assert_eq!(to_string(&a).as_bytes(), src);
    }

    #[test]
    fn strict_options_reject_duplicates() {
        let err = from_str_with(r#"{"a":1,"a":2}"#, DecodeOptions::strict()).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("duplicate object key"));
        assert!(from_str(r#"{"a":1,"a":2}"#).is_ok());
    }

    #[test]
    fn stream_yields_offsets_after_each_document() {
        let src = "{\"a\":1}\n[2]\n\"three\"\n";
        let docs: Vec<_> = ValueStream::from_str(src, DecodeOptions::default())
            .collect::<Result<_>>()
            .unwrap();
        let offsets: Vec<usize> = docs.iter().map(|(o, _)| *o).collect();
        assert_eq!(offsets, [7, 11, 19]);
        assert_eq!(docs[2].1.as_string().unwrap(), "three");
    }

    #[test]
    fn stream_stops_after_first_error() {
        let src = b"1\n{\"a\":1,\"a\":2}\n3\n";
        let mut it = ValueStream::from_slice(src, DecodeOptions::strict());
        assert!(it.next().unwrap().is_ok());
        assert!(it.next().unwrap().is_err());
        assert!(it.next().is_none());
    }

    #[test]
    fn pretty_encoding_indents() {
        let v = from_str(r#"{"a":[1]}"#).unwrap();
        assert_eq!(to_string_pretty(&v), "{\n  \"a\": [\n    1\n  ]\n}");
        let mut out = Vec::new();
        to_writer(&mut out, &v).unwrap();
        assert_eq!(out, br#"{"a":[1]}"#);
    }
}
