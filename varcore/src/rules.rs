//! Rule engine contract.
//!
//! A rule engine rewrites the four derived fields of a variant. Each transform
//! receives the variant being computed as context together with a seed value and
//! returns a value of the same kind. Seeds are immutable containers handed over by
//! value: a rule builds a new container instead of mutating the one it was given.
//!
//! Transforms must be deterministic for a given context and seed, since their result
//! is memoized by the variant for its whole lifetime.

use varmodel::{
    ArtifactList, Capabilities, DependencyList, ImmutableAttributes, ModuleComponentIdentifier,
};

use crate::{metadata::ConfigurationMetadata, utils::error::MetaResult};

pub mod manifest;
pub mod registry;

/// Transforms applied to the fields of a variant. Every method defaults to the identity.
pub trait VariantMetadataRules: Send + Sync {
    fn apply_dependency_rules(
        &self,
        _variant: &dyn ConfigurationMetadata,
        dependencies: DependencyList,
    ) -> MetaResult<DependencyList> {
        Ok(dependencies)
    }

    fn apply_attribute_rules(
        &self,
        _variant: &dyn ConfigurationMetadata,
        attributes: ImmutableAttributes,
    ) -> MetaResult<ImmutableAttributes> {
        Ok(attributes)
    }

    fn apply_capability_rules(
        &self,
        _variant: &dyn ConfigurationMetadata,
        capabilities: Capabilities,
    ) -> MetaResult<Capabilities> {
        Ok(capabilities)
    }

    /// Artifact rules also receive the component identity, needed to build new artifacts.
    fn apply_artifact_rules(
        &self,
        _variant: &dyn ConfigurationMetadata,
        artifacts: ArtifactList,
        _component_id: &ModuleComponentIdentifier,
    ) -> MetaResult<ArtifactList> {
        Ok(artifacts)
    }
}

/// Rule engine without any rule: every field keeps its seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRules;

impl VariantMetadataRules for NoRules {}
