//! Request options and their deep-merge rules.
//!
//! # Design
//! `RequestOptions` is the configuration bag applied to every request: the
//! headers, a credentials mode, and an open-ended `extra` map for anything a
//! transport may understand. Options combine by deep merge. Headers merge
//! key by key, nested objects inside `extra` merge key by key at every
//! depth, and any other value on the right-hand side replaces the left.
//! Setting one header therefore never discards the others.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered header collection with case-insensitive names.
///
/// Insertion order is preserved. Re-inserting a name that is already present
/// (in any letter case) replaces its value in place and keeps the spelling
/// it was first inserted with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Add a value without dropping an existing one. A repeated name keeps
    /// its first position and its values are joined with `", "`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => {
                let existing = &mut self.entries[index].1;
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `other` into `self` key by key; `other` wins on conflict.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl From<Map<String, Value>> for Headers {
    /// `null` entries are skipped; other non-string values use their JSON text.
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .filter_map(|(name, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((name, s)),
                other => Some((name, other.to_string())),
            })
            .collect()
    }
}

impl From<Headers> for Map<String, Value> {
    fn from(headers: Headers) -> Self {
        headers
            .entries
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect()
    }
}

/// Whether the transport should send cookies and similar credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

impl Credentials {
    pub fn as_str(&self) -> &'static str {
        match self {
            Credentials::Omit => "omit",
            Credentials::SameOrigin => "same-origin",
            Credentials::Include => "include",
        }
    }
}

/// Request configuration, held as defaults by the client and supplied as
/// per-call overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Deep-merge `other` into `self`.
    pub fn merge(&mut self, other: &RequestOptions) {
        self.headers.merge(&other.headers);
        if other.credentials.is_some() {
            self.credentials = other.credentials;
        }
        merge_map(&mut self.extra, &other.extra);
    }

    /// Non-mutating form of `merge`: a fresh value with `other` applied.
    pub fn merged(&self, other: &RequestOptions) -> RequestOptions {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Everything except the headers, flattened into one JSON map.
    pub(crate) fn extensions(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        if let Some(credentials) = self.credentials {
            map.insert(
                "credentials".to_string(),
                Value::String(credentials.as_str().to_string()),
            );
        }
        map
    }
}

/// Recursive JSON merge. Objects merge key by key; any other value on the
/// right replaces the left.
pub fn merge_json(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_map(target, source),
        (target, source) => *target = source.clone(),
    }
}

fn merge_map(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) => merge_json(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
