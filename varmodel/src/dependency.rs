use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{component::ModuleComponentSelector, list::ImmutableList};

/// A dependency declared by a variant on another module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DependencyMetadata {
    selector: ModuleComponentSelector,
    /// A constraint only restricts the version of the module if something else pulls it in.
    constraint: bool,
    reason: Option<String>,
}

impl DependencyMetadata {
    pub fn new(selector: ModuleComponentSelector) -> Self {
        Self {
            selector,
            constraint: false,
            reason: None,
        }
    }

    pub fn constraint(selector: ModuleComponentSelector) -> Self {
        Self {
            selector,
            constraint: true,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn selector(&self) -> &ModuleComponentSelector {
        &self.selector
    }

    pub fn is_constraint(&self) -> bool {
        self.constraint
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl fmt::Display for DependencyMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraint {
            write!(f, "constraint ")?;
        }
        write!(f, "{}", self.selector)?;
        if let Some(reason) = &self.reason {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}

pub type DependencyList = ImmutableList<DependencyMetadata>;

/// Excludes a module (or a whole group) from the transitive dependencies of a variant.
///
/// `None` acts as a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExcludeMetadata {
    pub group: Option<String>,
    pub module: Option<String>,
}

impl ExcludeMetadata {
    pub fn matches(&self, selector: &ModuleComponentSelector) -> bool {
        self.group.as_deref().is_none_or(|g| g == selector.group())
            && self.module.as_deref().is_none_or(|m| m == selector.module())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_constraints_and_reasons() {
        let dep = DependencyMetadata::new(ModuleComponentSelector::new("g", "m").with_version("1"));
        assert_eq!(dep.to_string(), "g:m:1");

        let constraint = DependencyMetadata::constraint(ModuleComponentSelector::new("g", "m"))
            .with_reason("security fix");
        assert!(constraint.is_constraint());
        assert_eq!(constraint.to_string(), "constraint g:m (security fix)");
    }

    #[test]
    fn exclude_wildcards() {
        let selector = ModuleComponentSelector::new("org.acme", "core");
        let whole_group = ExcludeMetadata {
            group: Some("org.acme".into()),
            module: None,
        };
        let other_module = ExcludeMetadata {
            group: None,
            module: Some("extras".into()),
        };
        assert!(whole_group.matches(&selector));
        assert!(!other_module.matches(&selector));
    }
}
