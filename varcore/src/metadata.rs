//! Read contracts shared by every variant the resolution engine looks at.
//!
//! [`VariantMetadata`] is the minimal contract: a name plus the four derived fields.
//! It is what a derived variant requires from its base. [`ConfigurationMetadata`]
//! extends it with the structural information the resolution engine consults while
//! walking the graph (transitivity, visibility, excludes, ...).

use std::collections::BTreeSet;

use smallvec::SmallVec;
use strum::{Display, EnumIter, IntoStaticStr};
use varmodel::{
    ArtifactList, ArtifactName, Capabilities, ComponentArtifactMetadata, DependencyList,
    DisplayName, ExcludeMetadata, ImmutableAttributes,
};

use crate::utils::error::MetaResult;

/// The four fields of a variant that rules are able to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MetadataField {
    Dependencies,
    Attributes,
    Capabilities,
    Artifacts,
}

/// Minimal read contract of a variant.
///
/// Every accessor may fail; implementations backed by lazily evaluated rules report
/// failures of those rules here.
pub trait VariantMetadata: Send + Sync {
    fn name(&self) -> &str;

    fn dependencies(&self) -> MetaResult<DependencyList>;

    fn attributes(&self) -> MetaResult<ImmutableAttributes>;

    fn artifacts(&self) -> MetaResult<ArtifactList>;

    fn capabilities(&self) -> MetaResult<Capabilities>;
}

/// Full read contract of a configuration of a module component.
pub trait ConfigurationMetadata: VariantMetadata {
    /// The selectable variants this configuration exposes.
    fn variants(&self) -> MetaResult<VariantSet>;

    fn as_describable(&self) -> DisplayName;

    /// Build the metadata of an artifact of this configuration's component.
    fn artifact(&self, name: &ArtifactName) -> ComponentArtifactMetadata;

    /// Names of this configuration and of every configuration it extends.
    fn hierarchy(&self) -> BTreeSet<String>;

    fn excludes(&self) -> &[ExcludeMetadata];

    fn is_transitive(&self) -> bool;

    fn is_visible(&self) -> bool;

    fn is_can_be_consumed(&self) -> bool;

    fn is_can_be_resolved(&self) -> bool;

    /// Configurations that should be consumed instead of this one, if any.
    fn consumption_alternatives(&self) -> &[String];

    /// Whether the artifacts are only known after probing the repository.
    fn requires_maven_artifact_discovery(&self) -> bool;
}

/// A selectable variant as seen by attribute matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultVariantMetadata {
    display_name: DisplayName,
    attributes: ImmutableAttributes,
    artifacts: ArtifactList,
    capabilities: Capabilities,
}

impl DefaultVariantMetadata {
    pub fn new(
        display_name: DisplayName,
        attributes: ImmutableAttributes,
        artifacts: ArtifactList,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            display_name,
            attributes,
            artifacts,
            capabilities,
        }
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn attributes(&self) -> &ImmutableAttributes {
        &self.attributes
    }

    pub fn artifacts(&self) -> &ArtifactList {
        &self.artifacts
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

/// Variants exposed by a configuration. Derived variants expose exactly one.
pub type VariantSet = SmallVec<[DefaultVariantMetadata; 1]>;

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn field_names_are_lowercase() {
        let names: Vec<&'static str> = MetadataField::iter().map(Into::into).collect();
        assert_eq!(
            names,
            ["dependencies", "attributes", "capabilities", "artifacts"]
        );
        assert_eq!(MetadataField::Capabilities.to_string(), "capabilities");
    }
}
