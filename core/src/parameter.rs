//! Ordered request parameters and their canonical value formatting.
//!
//! # Design
//! `ParameterMap` keeps keys in insertion order because that order is what
//! callers see on the wire: it drives both `concat` output and the query
//! string of GET requests. Values are a small closed set of scalars plus
//! nested lists, so formatting can recurse without reflection.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Percent-encode `s` with `application/x-www-form-urlencoded` rules
/// (space becomes `+`).
pub fn url_encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// A parameter value: a scalar or an ordered list of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

/// Render `value` for a URL: scalars are percent-encoded, lists become
/// `[a,b,...]` with every element formatted recursively.
pub fn format_value(value: &ParamValue) -> String {
    match value {
        ParamValue::List(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(","))
        }
        scalar => url_encode(&scalar.to_string()),
    }
}

/// Plain string form: no percent-encoding, lists as `[a,b,...]`.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => f.write_str("null"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::UInt(n) => write!(f, "{n}"),
            // Always keeps a fractional part: `1.0`, not `1`.
            ParamValue::Float(n) => write!(f, "{n:?}"),
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! from_scalar {
    ($variant:ident as $target:ty: $($t:ty),+) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    ParamValue::$variant(v as $target)
                }
            }
        )+
    };
}

from_scalar!(Int as i64: i8, i16, i32, i64, isize);
from_scalar!(UInt as u64: u8, u16, u32, u64, usize);
from_scalar!(Float as f64: f32, f64);

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<char> for ParamValue {
    fn from(v: char) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Text(v.clone())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue> + Clone> From<&[T]> for ParamValue {
    fn from(v: &[T]) -> Self {
        ParamValue::List(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>, const N: usize> From<[T; N]> for ParamValue {
    fn from(v: [T; N]) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<BTreeSet<T>> for ParamValue {
    fn from(v: BTreeSet<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<HashSet<T>> for ParamValue {
    fn from(v: HashSet<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// Ordered key/value request parameters. Keys are unique; re-adding a key
/// overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap {
    entries: IndexMap<String, ParamValue>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map seeded with one parameter.
    pub fn with(key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let mut parameter = Self::new();
        parameter.add(key, value);
        parameter
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add every entry of `other`, overwriting shared keys.
    pub fn merge(&mut self, other: ParameterMap) -> &mut Self {
        self.entries.extend(other.entries);
        self
    }

    /// Sort keys lexicographically.
    pub fn sort(&mut self) -> &mut Self {
        self.sort_by(|a, b| a.cmp(b))
    }

    /// Reorder entries by key with `compare`. The sort is stable, so
    /// applying the same comparator again leaves the order unchanged.
    pub fn sort_by<F>(&mut self, mut compare: F) -> &mut Self
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.entries.sort_by(|k1, _, k2, _| compare(k1.as_str(), k2.as_str()));
        self
    }

    /// Join entries as `key<delimiter>value<joiner>...` using the plain
    /// string form of each value. No trailing joiner.
    pub fn concat(&self, delimiter: &str, joiner: &str) -> String {
        self.concat_with(delimiter, joiner, |v| v.to_string())
    }

    /// Like [`concat`](Self::concat) with `=` and `&`.
    pub fn concat_default(&self) -> String {
        self.concat("=", "&")
    }

    /// Join entries, rendering each value with `encode`.
    pub fn concat_with<F>(&self, delimiter: &str, joiner: &str, mut encode: F) -> String
    where
        F: FnMut(&ParamValue) -> String,
    {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}{delimiter}{}", encode(v)))
            .collect::<Vec<_>>()
            .join(joiner)
    }

    /// Render as a JSON object, keys in map order.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterMap
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameter = Self::new();
        for (k, v) in iter {
            parameter.add(k, v);
        }
        parameter
    }
}
