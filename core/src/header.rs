//! Ordered, multi-valued HTTP header map.
//!
//! # Design
//! Header names map to a non-empty list of values. Names keep their first
//! insertion order and values keep their append order, so iteration is
//! deterministic across backends. `len()` counts `(name, value)` pairs, not
//! distinct names: a header sent twice counts twice.

use std::fmt;

use indexmap::IndexMap;

/// A single `(name, value)` header pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub name: String,
    pub value: String,
}

impl Pair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered mapping from header name to its values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: IndexMap<String, Vec<String>>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map seeded with one header.
    pub fn with(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut header = Self::new();
        header.add(name, value);
        header
    }

    /// Append `value` to the values recorded for `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Replace every value recorded for `name` with `value`.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(name.into(), vec![value.into()]);
        self
    }

    /// Values recorded for `name`, in insertion order.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .get(name)
            .filter(|values| !values.is_empty())
            .map(Vec::as_slice)
    }

    /// First value recorded for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Remove `name` and all of its values. Later names keep their order.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.shift_remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.entries
            .values()
            .any(|values| values.iter().any(|v| v == value))
    }

    /// Total number of `(name, value)` pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct header names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate every `(name, value)` pair: names in insertion order, then
    /// values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
    }

    /// Invoke `visitor` once per `(name, value)` pair in iteration order.
    pub fn each<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &str),
    {
        for (name, value) in self.iter() {
            visitor(name, value);
        }
    }

    /// Materialize every pair in iteration order.
    pub fn pairs(&self) -> Vec<Pair> {
        self.iter().map(|(name, value)| Pair::new(name, value)).collect()
    }

    /// Append every pair of `other` to this map.
    pub fn merge(&mut self, other: &HeaderMap) -> &mut Self {
        other.each(|name, value| {
            self.add(name, value);
        });
        self
    }
}

impl fmt::Display for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Header{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "\"{name}\":\"{value}\"")?;
        }
        f.write_str("}")
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut header = Self::new();
        header.extend(iter);
        header
    }
}

impl<K, V> Extend<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.add(name, value);
        }
    }
}
