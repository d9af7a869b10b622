//! Value Codec Module
//!
//! Typed values accepted by [`crate::cache::Cache::store`] and the closed set
//! of decoders applied on retrieval.

use serde::{Serialize, Serializer};

use crate::error::{CacheError, Result};

// == Value ==
/// A value the cache can store.
///
/// Encoding follows the Redis client convention: text and bytes are written
/// as-is, numbers as their decimal text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// UTF-8 text
    Text(String),
    /// Raw bytes, logged as lossy UTF-8
    #[serde(serialize_with = "serialize_lossy")]
    Bytes(Vec<u8>),
    /// Signed integer
    Int(i64),
    /// Floating-point number
    Float(f64),
}

impl Value {
    /// Encodes the value into the bytes written to the store.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Text(text) => text.as_bytes().to_vec(),
            Value::Bytes(bytes) => bytes.clone(),
            Value::Int(number) => number.to_string().into_bytes(),
            Value::Float(number) => number.to_string().into_bytes(),
        }
    }
}

fn serialize_lossy<S>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(bytes: &[u8; N]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Int(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Int(number.into())
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Float(number)
    }
}

// == Decode ==
/// Converts raw stored bytes into a typed value.
pub trait Decode: Sized {
    /// Decodes `raw`, failing with [`CacheError::Decode`] on malformed input.
    fn decode(raw: Vec<u8>) -> Result<Self>;
}

/// Raw passthrough.
impl Decode for Vec<u8> {
    fn decode(raw: Vec<u8>) -> Result<Self> {
        Ok(raw)
    }
}

impl Decode for String {
    fn decode(raw: Vec<u8>) -> Result<Self> {
        String::from_utf8(raw).map_err(|e| CacheError::Decode(format!("invalid UTF-8: {}", e)))
    }
}

/// UTF-8 text, then base-10.
impl Decode for i64 {
    fn decode(raw: Vec<u8>) -> Result<Self> {
        let text = String::decode(raw)?;
        text.trim()
            .parse()
            .map_err(|_| CacheError::Decode(format!("not an integer: {:?}", text)))
    }
}

impl Decode for f64 {
    fn decode(raw: Vec<u8>) -> Result<Self> {
        let text = String::decode(raw)?;
        text.trim()
            .parse()
            .map_err(|_| CacheError::Decode(format!("not a number: {:?}", text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_encoding() {
        assert_eq!(Value::from("hello").to_bytes(), b"hello".to_vec());
        assert_eq!(Value::from(b"raw").to_bytes(), b"raw".to_vec());
        assert_eq!(Value::from(456).to_bytes(), b"456".to_vec());
        assert_eq!(Value::from(-7i64).to_bytes(), b"-7".to_vec());
        assert_eq!(Value::from(2.5).to_bytes(), b"2.5".to_vec());
    }

    #[test]
    fn test_value_serialize() {
        let json = serde_json::to_string(&Value::from(b"first")).unwrap();
        assert_eq!(json, r#"{"bytes":"first"}"#);

        let json = serde_json::to_string(&Value::from(123)).unwrap();
        assert_eq!(json, r#"{"int":123}"#);

        let json = serde_json::to_string(&Value::from("bar")).unwrap();
        assert_eq!(json, r#"{"text":"bar"}"#);
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(String::decode(b"hello".to_vec()).unwrap(), "hello");
        assert!(matches!(
            String::decode(vec![0xff, 0xfe]),
            Err(CacheError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_int() {
        assert_eq!(i64::decode(b"456".to_vec()).unwrap(), 456);
        assert_eq!(i64::decode(b"-12".to_vec()).unwrap(), -12);
        assert!(matches!(i64::decode(b"abc".to_vec()), Err(CacheError::Decode(_))));
        assert!(matches!(i64::decode(b"1.5".to_vec()), Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_float_and_raw() {
        assert_eq!(f64::decode(b"2.5".to_vec()).unwrap(), 2.5);
        assert_eq!(Vec::<u8>::decode(vec![0, 1, 2]).unwrap(), vec![0, 1, 2]);
    }
}
