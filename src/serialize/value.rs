//! Document value model.
//!
//! [`Value`] is the JSON-shaped intermediate representation every record is
//! written into. It differs from `serde_json::Value` in two ways:
//!
//! - objects keep their insertion order (sections appear in the order the
//!   builder wrote them), and
//! - a slot may hold a [`Deferred`] value, a payload that only becomes
//!   available in the future (texture read-back, for instance).
//!
//! A document containing deferred slots can be inspected but not encoded;
//! run it through [`flatten`](super::flatten::flatten) first.

use std::fmt;
use std::fmt::Write as _;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::errors::{Error, Result};

// ============================================================================
// Deferred
// ============================================================================

/// A value that settles in the future.
///
/// The future yields plain JSON: a deferred slot is replaced wholesale by the
/// settled value and is never scanned again.
pub struct Deferred {
    label: String,
    future: BoxFuture<'static, Result<serde_json::Value>>,
}

impl Deferred {
    pub fn new<F>(label: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = Result<serde_json::Value>> + Send + 'static,
    {
        Self {
            label: label.into(),
            future: future.boxed(),
        }
    }

    /// A deferred value that is already settled. Mostly useful in tests and
    /// for extension components that want a uniform code path.
    pub fn resolved(label: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(label, futures::future::ready(Ok(value)))
    }

    /// Human-readable name of whatever produces the payload.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn into_future(self) -> BoxFuture<'static, Result<serde_json::Value>> {
        self.future
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Value
// ============================================================================

/// JSON-shaped document node with optional deferred leaves.
#[derive(Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    /// Ordered key/value pairs. Keys are unique; [`Value::insert`] replaces.
    Object(Vec<(String, Value)>),
    Deferred(Deferred),
}

impl Value {
    /// An empty object.
    #[inline]
    #[must_use]
    pub fn object() -> Self {
        Value::Object(Vec::new())
    }

    /// An empty array.
    #[inline]
    #[must_use]
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Chainable [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts `value` under `key`, returning the previous value.
    /// No-op on anything that is not an object.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        let Value::Object(entries) = self else {
            return None;
        };
        let value = value.into();
        if let Some((_, slot)) = entries.iter_mut().find(|(k, _)| k == key) {
            Some(std::mem::replace(slot, value))
        } else {
            entries.push((key.to_owned(), value));
            None
        }
    }

    /// Copies every entry of `other` into `self` (both must be objects).
    pub fn merge(&mut self, other: Value) {
        if let Value::Object(entries) = other {
            for (key, value) in entries {
                self.insert(&key, value);
            }
        }
    }

    /// Chainable [`merge`](Self::merge).
    #[must_use]
    pub fn merged(mut self, other: Value) -> Self {
        self.merge(other);
        self
    }

    /// Appends to an array. No-op on anything else.
    pub fn push(&mut self, value: impl Into<Value>) {
        if let Value::Array(items) = self {
            items.push(value.into());
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Object(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the array stored under `key`, creating (or replacing a
    /// non-array value with) an empty one first.
    pub fn array_entry(&mut self, key: &str) -> Option<&mut Vec<Value>> {
        match self.entry_with(key, Value::array, |v| matches!(v, Value::Array(_)))? {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the object stored under `key`, creating it first when needed.
    pub fn object_entry(&mut self, key: &str) -> Option<&mut Value> {
        self.entry_with(key, Value::object, |v| matches!(v, Value::Object(_)))
    }

    fn entry_with(
        &mut self,
        key: &str,
        make: fn() -> Value,
        accepts: fn(&Value) -> bool,
    ) -> Option<&mut Value> {
        let Value::Object(entries) = self else {
            return None;
        };
        let index = match entries.iter().position(|(k, _)| k == key) {
            Some(index) => {
                if !accepts(&entries[index].1) {
                    entries[index].1 = make();
                }
                index
            }
            None => {
                entries.push((key.to_owned(), make()));
                entries.len() - 1
            }
        };
        Some(&mut entries[index].1)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Value::Deferred(_))
    }

    /// Number of deferred slots at any depth.
    #[must_use]
    pub fn deferred_count(&self) -> usize {
        match self {
            Value::Deferred(_) => 1,
            Value::Array(items) => items.iter().map(Value::deferred_count).sum(),
            Value::Object(entries) => entries.iter().map(|(_, v)| v.deferred_count()).sum(),
            _ => 0,
        }
    }

    /// Path of the first deferred slot in document order, if any.
    #[must_use]
    pub fn first_deferred_path(&self) -> Option<String> {
        let mut path = String::new();
        self.find_deferred(&mut path).then_some(path)
    }

    fn find_deferred(&self, path: &mut String) -> bool {
        match self {
            Value::Deferred(_) => true,
            Value::Array(items) => items.iter().enumerate().any(|(i, item)| {
                let len = path.len();
                let _ = write!(path, "/{i}");
                let found = item.find_deferred(path);
                if !found {
                    path.truncate(len);
                }
                found
            }),
            Value::Object(entries) => entries.iter().any(|(key, item)| {
                let len = path.len();
                let _ = write!(path, "/{key}");
                let found = item.find_deferred(path);
                if !found {
                    path.truncate(len);
                }
                found
            }),
            _ => false,
        }
    }

    /// Converts into plain JSON. Fails on the first deferred slot.
    pub fn into_json(self) -> Result<serde_json::Value> {
        self.into_json_at(&mut String::new())
    }

    fn into_json_at(self, path: &mut String) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    let len = path.len();
                    let _ = write!(path, "/{i}");
                    out.push(item.into_json_at(path)?);
                    path.truncate(len);
                }
                serde_json::Value::Array(out)
            }
            Value::Object(entries) => {
                let mut out = serde_json::Map::with_capacity(entries.len());
                for (key, item) in entries {
                    let len = path.len();
                    let _ = write!(path, "/{key}");
                    out.insert(key, item.into_json_at(path)?);
                    path.truncate(len);
                }
                serde_json::Value::Object(out)
            }
            Value::Deferred(_) => {
                return Err(Error::UnresolvedDeferred {
                    path: if path.is_empty() { "/".to_owned() } else { path.clone() },
                });
            }
        })
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
            Value::Deferred(deferred) => Err(S::Error::custom(format!(
                "deferred value '{}' has not been resolved",
                deferred.label()
            ))),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::from(f64::from(v))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Number(serde_json::Number::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u8, u32, u64, usize);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::from(v.to_array().as_slice())
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::from(v.to_array().as_slice())
    }
}

impl From<Vec4> for Value {
    fn from(v: Vec4) -> Self {
        Value::from(v.to_array().as_slice())
    }
}

impl From<Quat> for Value {
    fn from(v: Quat) -> Self {
        Value::from(v.to_array().as_slice())
    }
}

impl From<Mat4> for Value {
    fn from(v: Mat4) -> Self {
        Value::from(v.to_cols_array().as_slice())
    }
}

impl From<Deferred> for Value {
    fn from(v: Deferred) -> Self {
        Value::Deferred(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::Array(v.iter().cloned().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
