use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Identity of a published module component: `group:module:version`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleComponentIdentifier {
    group: String,
    module: String,
    version: String,
}

impl ModuleComponentIdentifier {
    pub fn new(
        group: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            version: version.into(),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ModuleComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.module, self.version)
    }
}

impl FromStr for ModuleComponentIdentifier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_coordinates(s).as_slice() {
            [group, module, version] => Ok(Self::new(*group, *module, *version)),
            _ => Err(ModelError::InvalidIdentifier(s.to_string())),
        }
    }
}

/// A requested module: `group:module` with an optional version constraint.
///
/// The constraint is kept verbatim (`1.0`, `[1.0,2.0)`, `latest.release`, ...);
/// interpreting it belongs to the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleComponentSelector {
    group: String,
    module: String,
    version: Option<String>,
}

impl ModuleComponentSelector {
    pub fn new(group: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns `true` if `id` names the same module, regardless of version.
    pub fn matches_module(&self, id: &ModuleComponentIdentifier) -> bool {
        self.group == id.group && self.module == id.module
    }
}

impl fmt::Display for ModuleComponentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.module, version),
            None => write!(f, "{}:{}", self.group, self.module),
        }
    }
}

impl FromStr for ModuleComponentSelector {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_coordinates(s).as_slice() {
            [group, module] => Ok(Self::new(*group, *module)),
            [group, module, version] => Ok(Self::new(*group, *module).with_version(*version)),
            _ => Err(ModelError::InvalidSelector(s.to_string())),
        }
    }
}

impl From<&ModuleComponentIdentifier> for ModuleComponentSelector {
    fn from(id: &ModuleComponentIdentifier) -> Self {
        Self::new(id.group.clone(), id.module.clone()).with_version(id.version.clone())
    }
}

/// Split `a:b:c` into trimmed, non-empty parts. Any empty part yields an empty result.
fn split_coordinates(s: &str) -> Vec<&str> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Vec::new();
    }
    parts
}
