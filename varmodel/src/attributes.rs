use std::{collections::BTreeMap, fmt, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An immutable mapping of attribute names to values.
///
/// Attributes are what the resolution engine matches against a consumer's request
/// to select one variant among many (e.g. `org.gradle.usage = java-runtime`).
/// Keys are kept sorted so that display and comparison are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ImmutableAttributes(Arc<BTreeMap<String, String>>);

impl ImmutableAttributes {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Returns a copy of this set with `key` bound to `value`, replacing any previous value.
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = BTreeMap::clone(&self.0);
        map.insert(key.into(), value.into());
        Self(Arc::new(map))
    }

    /// Returns a copy of this set without `key`.
    pub fn without(&self, key: &str) -> Self {
        if !self.0.contains_key(key) {
            return self.clone();
        }
        let mut map = BTreeMap::clone(&self.0);
        map.remove(key);
        Self(Arc::new(map))
    }

    /// Merge `other` on top of this set; on conflicting keys `other` wins.
    pub fn concat(&self, other: &ImmutableAttributes) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut map = BTreeMap::clone(&self.0);
        map.extend(other.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        Self(Arc::new(map))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if both sets point to the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for ImmutableAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, "}}")
    }
}
