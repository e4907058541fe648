//! Primitive values held by the store.
//!
//! Values keep their primitive kind next to the canonical string form, so a
//! boolean written as `true` reads back as a boolean while the text `"true"`
//! stays text.

use std::fmt;

use crate::error::{StoreError, StoreResult};

/// Kind tag persisted alongside every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Bool,
    Number,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Number => "number",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(Self::Text),
            "bool" => Some(Self::Bool),
            "number" => Some(Self::Number),
            _ => None,
        }
    }
}

/// A primitive stored under a key.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Text(String),
    Bool(bool),
    Number(f64),
}

impl StoreValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
        }
    }

    /// Canonical string form, as returned by [`KvStore::get`](crate::KvStore::get).
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Truthiness of the value: non-empty text, `true`, or a non-zero number.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Rebuild a value from its persisted kind tag and string form.
    ///
    /// # Errors
    /// Returns `StoreError::Corrupt` when the tag is unknown or the string
    /// does not parse as the tagged kind.
    pub fn decode(key: &str, tag: &str, raw: &str) -> StoreResult<Self> {
        let kind = ValueKind::parse(tag)
            .ok_or_else(|| StoreError::corrupt(key, format!("unknown kind '{}'", tag)))?;

        match kind {
            ValueKind::Text => Ok(Self::Text(raw.to_string())),
            ValueKind::Bool => match raw {
                "true" => Ok(Self::Bool(true)),
                "false" => Ok(Self::Bool(false)),
                other => Err(StoreError::corrupt(key, format!("bad boolean '{}'", other))),
            },
            ValueKind::Number => raw
                .parse()
                .map(Self::Number)
                .map_err(|_| StoreError::corrupt(key, format!("bad number '{}'", raw))),
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Conversion into a storable value.
///
/// `None` converts to an absent value, which the store rejects as an
/// undefined argument.
pub trait IntoStoreValue {
    fn into_store_value(self) -> Option<StoreValue>;
}

impl IntoStoreValue for StoreValue {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(self)
    }
}

impl IntoStoreValue for &StoreValue {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(self.clone())
    }
}

impl IntoStoreValue for &str {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Text(self.to_string()))
    }
}

impl IntoStoreValue for String {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Text(self))
    }
}

impl IntoStoreValue for &String {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Text(self.clone()))
    }
}

impl IntoStoreValue for bool {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Bool(self))
    }
}

impl IntoStoreValue for f64 {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Number(self))
    }
}

impl IntoStoreValue for f32 {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Number(f64::from(self)))
    }
}

impl IntoStoreValue for i32 {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Number(f64::from(self)))
    }
}

impl IntoStoreValue for i64 {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Number(self as f64))
    }
}

impl IntoStoreValue for u32 {
    fn into_store_value(self) -> Option<StoreValue> {
        Some(StoreValue::Number(f64::from(self)))
    }
}

impl<T: IntoStoreValue> IntoStoreValue for Option<T> {
    fn into_store_value(self) -> Option<StoreValue> {
        self.and_then(IntoStoreValue::into_store_value)
    }
}
