//! Parameter records
//!
//! A host application describes an image as a flat string-keyed record
//! holding the buffer address and its geometry. [`ParamRecord`] is that
//! record, with typed getters that report which key was missing or
//! ill-typed and where.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Key of the buffer pointer
pub const BUFFER_KEY: &str = "imageBuffer";
pub const WIDTH_KEY: &str = "width";
pub const HEIGHT_KEY: &str = "height";
pub const CHANNELS_KEY: &str = "channels";
/// Key of the signed depth code (see [`PixelDepth`](crate::PixelDepth))
pub const DEPTH_KEY: &str = "depth";
/// Optional lower bound of the display range
pub const MIN_BRIGHTNESS_KEY: &str = "minBrightness";
/// Optional upper bound of the display range
pub const MAX_BRIGHTNESS_KEY: &str = "maxBrightness";

/// Keys every image record must carry
pub const IMAGE_KEYS: [&str; 5] = [BUFFER_KEY, WIDTH_KEY, HEIGHT_KEY, CHANNELS_KEY, DEPTH_KEY];

/// A value in a parameter record
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Raw buffer address
    Pointer(*mut u8),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Integer(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<*mut u8> for ParamValue {
    fn from(v: *mut u8) -> Self {
        ParamValue::Pointer(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

/// String-keyed record of host parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamRecord {
    entries: HashMap<String, ParamValue>,
}

impl ParamRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn require(&self, key: &str, site: &'static str) -> Result<&ParamValue> {
        self.entries.get(key).ok_or_else(|| Error::MissingField {
            key: key.to_string(),
            site,
        })
    }

    fn wrong_type(key: &str, expected: &'static str, site: &'static str) -> Error {
        Error::FieldType {
            key: key.to_string(),
            expected,
            site,
        }
    }

    /// Get a required pointer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `key` is absent and
    /// [`Error::FieldType`] if it holds anything but a pointer.
    pub fn get_pointer(&self, key: &str, site: &'static str) -> Result<*mut u8> {
        match self.require(key, site)? {
            ParamValue::Pointer(p) => Ok(*p),
            _ => Err(Self::wrong_type(key, "pointer", site)),
        }
    }

    /// Get a required integer.
    pub fn get_integer(&self, key: &str, site: &'static str) -> Result<i64> {
        match self.require(key, site)? {
            ParamValue::Integer(v) => Ok(*v),
            _ => Err(Self::wrong_type(key, "integer", site)),
        }
    }

    /// Get a required number. Integers are accepted and widened.
    pub fn get_float(&self, key: &str, site: &'static str) -> Result<f64> {
        match self.require(key, site)? {
            ParamValue::Float(v) => Ok(*v),
            ParamValue::Integer(v) => Ok(*v as f64),
            _ => Err(Self::wrong_type(key, "float", site)),
        }
    }

    /// Get an optional number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldType`] if `key` is present but not numeric.
    pub fn get_float_opt(&self, key: &str, site: &'static str) -> Result<Option<f64>> {
        if !self.contains_key(key) {
            return Ok(None);
        }
        self.get_float(key, site).map(Some)
    }

    /// Get a required text value.
    pub fn get_text(&self, key: &str, site: &'static str) -> Result<&str> {
        match self.require(key, site)? {
            ParamValue::Text(s) => Ok(s),
            _ => Err(Self::wrong_type(key, "text", site)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_site() {
        let record = ParamRecord::new();
        assert_eq!(
            record.get_integer(WIDTH_KEY, "test_site"),
            Err(Error::MissingField {
                key: "width".to_string(),
                site: "test_site"
            })
        );
    }

    #[test]
    fn test_wrong_type() {
        let mut record = ParamRecord::new();
        record.insert(WIDTH_KEY, "wide");
        assert_eq!(
            record.get_integer(WIDTH_KEY, "here"),
            Err(Error::FieldType {
                key: "width".to_string(),
                expected: "integer",
                site: "here"
            })
        );
        assert_eq!(record.get_text(WIDTH_KEY, "here"), Ok("wide"));
    }

    #[test]
    fn test_float_accepts_integer() {
        let mut record = ParamRecord::new();
        record.insert(MIN_BRIGHTNESS_KEY, 12i64);
        record.insert(MAX_BRIGHTNESS_KEY, 0.5);
        assert_eq!(record.get_float(MIN_BRIGHTNESS_KEY, "t"), Ok(12.0));
        assert_eq!(record.get_float_opt(MAX_BRIGHTNESS_KEY, "t"), Ok(Some(0.5)));
        assert_eq!(record.get_float_opt("absent", "t"), Ok(None));
    }

    #[test]
    fn test_pointer_roundtrip() {
        let mut bytes = [0u8; 4];
        let ptr = bytes.as_mut_ptr();
        let mut record = ParamRecord::new();
        record.insert(BUFFER_KEY, ptr);
        assert_eq!(record.get_pointer(BUFFER_KEY, "t"), Ok(ptr));
        assert_eq!(record.len(), 1);
        assert!(IMAGE_KEYS.contains(&BUFFER_KEY));
    }
}
