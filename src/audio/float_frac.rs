//! JSON float that always renders with a fractional part.
//!
//! Some compatible servers reject `1` where they expect a float, so integral
//! values are written as `1.0`. Non-finite values are refused at encode time
//! rather than being turned into `null`.

use crate::{Error, ErrorContext, Result};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct FloatFrac(pub f64);

impl FloatFrac {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Text of the JSON number token.
    ///
    /// Integral values get exactly one fractional digit; everything else uses the
    /// shortest decimal that round-trips. Never uses exponent notation.
    pub fn to_json_text(self) -> Result<String> {
        let n = self.0;
        if !n.is_finite() {
            return Err(Error::encode_with_context(
                "unsupported number",
                ErrorContext::new().with_details(n.to_string()),
            ));
        }
        if n.trunc() == n {
            Ok(format!("{:.1}", n))
        } else {
            Ok(format!("{}", n))
        }
    }
}

impl From<f64> for FloatFrac {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<FloatFrac> for f64 {
    fn from(value: FloatFrac) -> Self {
        value.0
    }
}

impl fmt::Display for FloatFrac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json_text() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

/// Emits a raw `serde_json` number token. Other serializers (YAML, TOML) see
/// serde_json's raw-value wrapper instead of a number, so encode requests with
/// `serde_json` only.
impl Serialize for FloatFrac {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = self.to_json_text().map_err(|_| S::Error::custom("unsupported number"))?;
        let raw = RawValue::from_string(text).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FloatFrac {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(FloatFrac)
    }
}
