use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::list::ImmutableList;

/// A named, optionally versioned facet a variant declares it provides.
///
/// Two variants of the graph providing the same `group:name` capability are in
/// conflict, whatever their version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capability {
    pub group: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Option<String>,
}

impl Capability {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Returns `true` if both capabilities denote the same facet.
    pub fn same_facet(&self, other: &Capability) -> bool {
        self.group == other.group && self.name == other.name
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.name, version),
            None => write!(f, "{}:{}", self.group, self.name),
        }
    }
}

/// The set of capabilities declared by a variant.
///
/// An empty set means the variant only carries its component's implicit capability,
/// which the resolution engine derives from the component identity itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<Capability>", into = "Vec<Capability>")
)]
pub struct Capabilities(ImmutableList<Capability>);

impl Capabilities {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from `caps`; a later capability replaces an earlier one for the same facet.
    pub fn of(caps: impl IntoIterator<Item = Capability>) -> Self {
        let caps = caps
            .into_iter()
            .fold(Vec::<Capability>::new(), |mut acc, cap| {
                upsert(&mut acc, cap);
                acc
            });
        Self(caps.into())
    }

    /// Returns a copy of this set declaring `cap`, replacing a capability for the same facet.
    pub fn with(&self, cap: Capability) -> Self {
        let mut caps = self.0.to_vec();
        upsert(&mut caps, cap);
        Self(caps.into())
    }

    /// Returns a copy of this set without the `group:name` facet.
    pub fn without(&self, group: &str, name: &str) -> Self {
        Self(self.0.retain(|c| !(c.group == group && c.name == name)))
    }

    pub fn find(&self, group: &str, name: &str) -> Option<&Capability> {
        self.0.iter().find(|c| c.group == group && c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Capability> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl From<Vec<Capability>> for Capabilities {
    fn from(value: Vec<Capability>) -> Self {
        Self::of(value)
    }
}

impl From<Capabilities> for Vec<Capability> {
    fn from(value: Capabilities) -> Self {
        value.0.to_vec()
    }
}

fn upsert(caps: &mut Vec<Capability>, cap: Capability) {
    match caps.iter_mut().find(|c| c.same_facet(&cap)) {
        Some(existing) => *existing = cap,
        None => caps.push(cap),
    }
}
