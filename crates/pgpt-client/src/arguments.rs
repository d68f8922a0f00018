//! Argument values carried inside a command envelope.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::ArgKind;

/// One argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    /// A string.
    Text(String),
    /// A boolean.
    Flag(bool),
    /// An ordered sequence of strings.
    List(Vec<String>),
    /// A nested mapping.
    Map(BTreeMap<String, ArgumentValue>),
}

impl ArgumentValue {
    /// Kind of this value, for matching against the catalog.
    #[must_use]
    pub const fn kind(&self) -> ArgKind {
        match self {
            Self::Text(_) => ArgKind::Text,
            Self::Flag(_) => ArgKind::Flag,
            Self::List(_) => ArgKind::List,
            Self::Map(_) => ArgKind::Map,
        }
    }

    /// Returns true for values the server treats as absent.
    ///
    /// Flags are never empty: `false` is a meaningful value. Whitespace is
    /// content; see [`ArgumentValue::is_blank`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(value) => value.is_empty(),
            Self::Flag(_) => false,
            Self::List(values) => values.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }

    /// Like [`ArgumentValue::is_empty`], but whitespace-only text also counts.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::Flag(_) => false,
            Self::List(values) => values.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for ArgumentValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<BTreeMap<String, ArgumentValue>> for ArgumentValue {
    fn from(entries: BTreeMap<String, ArgumentValue>) -> Self {
        Self::Map(entries)
    }
}

/// Argument mapping for one command; keys are unique by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Arguments(BTreeMap<String, ArgumentValue>);

impl Arguments {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds or replaces an argument, returning the mapping for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds an argument only when `value` is present.
    #[must_use]
    pub fn with_optional<V>(mut self, name: impl Into<String>, value: Option<V>) -> Self
    where
        V: Into<ArgumentValue>,
    {
        if let Some(inner) = value {
            self.insert(name, inner);
        }
        self
    }

    /// Adds or replaces an argument.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Looks up an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.0.get(name)
    }

    /// Returns true when no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the arguments in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Arguments
where
    K: Into<String>,
    V: Into<ArgumentValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}
