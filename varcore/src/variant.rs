//! Variants added to a published component by component metadata rules.
//!
//! A [`RuleAwareVariant`] either derives from an existing variant of the component
//! (its *base*) or starts from scratch. In both cases its four fields are computed on
//! first access by running the matching rule transform over a seed:
//!
//! | field        | seed with a base        | seed without a base        |
//! |--------------|-------------------------|----------------------------|
//! | dependencies | base dependencies       | empty list                 |
//! | attributes   | base attributes         | component-level attributes |
//! | capabilities | base capabilities       | empty set                  |
//! | artifacts    | base artifacts          | empty list                 |
//!
//! The result is memoized for the lifetime of the variant. The structural part of the
//! contract (transitive, visible, consumable, not resolvable, no excludes) is fixed and
//! never depends on the base or on the rules.
//!
//! ```rust
//! # use varcore::{NoRules, RuleAwareVariant, VariantMetadata, ConfigurationMetadata};
//! # use varmodel::{ImmutableAttributes, ModuleComponentIdentifier};
//! let id = ModuleComponentIdentifier::new("org.acme", "core", "1.0");
//! let variant = RuleAwareVariant::without_base(
//!     "runtimeElements",
//!     ImmutableAttributes::of([("org.gradle.status", "release")]),
//!     &id,
//!     &NoRules,
//! );
//!
//! assert_eq!(variant.attributes().unwrap().get("org.gradle.status"), Some("release"));
//! assert!(variant.dependencies().unwrap().is_empty());
//! assert_eq!(variant.as_describable().display_name(), "org.acme:core:1.0 configuration runtimeElements");
//! ```

use std::collections::BTreeSet;

use log::{debug, trace};
use smallvec::smallvec;
use varmodel::{
    ArtifactList, ArtifactName, Capabilities, ComponentArtifactMetadata, DependencyList,
    DisplayName, ExcludeMetadata, ImmutableAttributes, ModuleComponentIdentifier,
};

use crate::{
    magic::CONFIGURATION_CATEGORY,
    metadata::{
        ConfigurationMetadata, DefaultVariantMetadata, MetadataField, VariantMetadata, VariantSet,
    },
    rules::VariantMetadataRules,
    utils::{error::MetaResult, lazy::Memo},
};

/// Where the values of a derived variant come from before rules are applied.
#[derive(Clone)]
pub enum VariantSeed<'a> {
    /// Start from the current values of an existing variant.
    Base(&'a dyn VariantMetadata),
    /// Start from scratch: empty lists and capabilities, component-level attributes.
    Empty {
        component_attributes: ImmutableAttributes,
    },
}

/// A variant of a published component whose metadata is produced by rules.
///
/// Both the base variant and the rule engine are borrowed and shared with the rest
/// of the component's metadata; this variant never mutates them. It is `Send + Sync`
/// and concurrent first accesses to a field still run the rules only once.
pub struct RuleAwareVariant<'a> {
    name: String,
    seed: VariantSeed<'a>,
    component_id: &'a ModuleComponentIdentifier,
    rules: &'a dyn VariantMetadataRules,

    computed_dependencies: Memo<DependencyList>,
    computed_attributes: Memo<ImmutableAttributes>,
    computed_capabilities: Memo<Capabilities>,
    computed_artifacts: Memo<ArtifactList>,
}

impl<'a> RuleAwareVariant<'a> {
    pub fn new(
        name: impl Into<String>,
        seed: VariantSeed<'a>,
        component_id: &'a ModuleComponentIdentifier,
        rules: &'a dyn VariantMetadataRules,
    ) -> Self {
        Self {
            name: name.into(),
            seed,
            component_id,
            rules,
            computed_dependencies: Memo::new(),
            computed_attributes: Memo::new(),
            computed_capabilities: Memo::new(),
            computed_artifacts: Memo::new(),
        }
    }

    /// A variant derived from `base`.
    pub fn with_base(
        name: impl Into<String>,
        base: &'a dyn VariantMetadata,
        component_id: &'a ModuleComponentIdentifier,
        rules: &'a dyn VariantMetadataRules,
    ) -> Self {
        Self::new(name, VariantSeed::Base(base), component_id, rules)
    }

    /// A variant starting from scratch, attributed with the component-level attributes.
    pub fn without_base(
        name: impl Into<String>,
        component_attributes: ImmutableAttributes,
        component_id: &'a ModuleComponentIdentifier,
        rules: &'a dyn VariantMetadataRules,
    ) -> Self {
        Self::new(
            name,
            VariantSeed::Empty {
                component_attributes,
            },
            component_id,
            rules,
        )
    }

    pub fn component_id(&self) -> &'a ModuleComponentIdentifier {
        self.component_id
    }

    pub fn base(&self) -> Option<&'a dyn VariantMetadata> {
        match self.seed {
            VariantSeed::Base(base) => Some(base),
            VariantSeed::Empty { .. } => None,
        }
    }

    /// Returns `true` once `field` has been successfully computed.
    pub fn is_computed(&self, field: MetadataField) -> bool {
        match field {
            MetadataField::Dependencies => self.computed_dependencies.is_computed(),
            MetadataField::Attributes => self.computed_attributes.is_computed(),
            MetadataField::Capabilities => self.computed_capabilities.is_computed(),
            MetadataField::Artifacts => self.computed_artifacts.is_computed(),
        }
    }

    /// Compute `slot` once: pick the seed, run it through `transform`, keep the result.
    ///
    /// Errors from the seed or the transform are returned as-is and leave `slot` empty.
    fn derive<T: Clone>(
        &self,
        field: MetadataField,
        slot: &Memo<T>,
        select_seed: impl FnOnce(&VariantSeed<'a>) -> MetaResult<T>,
        transform: impl FnOnce(T) -> MetaResult<T>,
    ) -> MetaResult<T> {
        let value = slot
            .get_or_try_init(|| -> MetaResult<T> {
                trace!("Deriving {} of {}", field, self.as_describable());
                let value = transform(select_seed(&self.seed)?)?;
                debug!("Derived {} of {}", field, self.as_describable());
                Ok(value)
            })
            .inspect_err(|e| {
                debug!(
                    "Could not derive {} of {}: {}",
                    field,
                    self.as_describable(),
                    e
                )
            })?;
        Ok(T::clone(&value))
    }
}

impl VariantMetadata for RuleAwareVariant<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> MetaResult<DependencyList> {
        self.derive(
            MetadataField::Dependencies,
            &self.computed_dependencies,
            |seed| match seed {
                VariantSeed::Base(base) => base.dependencies(),
                VariantSeed::Empty { .. } => Ok(DependencyList::empty()),
            },
            |dependencies| self.rules.apply_dependency_rules(self, dependencies),
        )
    }

    fn attributes(&self) -> MetaResult<ImmutableAttributes> {
        self.derive(
            MetadataField::Attributes,
            &self.computed_attributes,
            |seed| match seed {
                VariantSeed::Base(base) => base.attributes(),
                VariantSeed::Empty {
                    component_attributes,
                } => Ok(component_attributes.clone()),
            },
            |attributes| self.rules.apply_attribute_rules(self, attributes),
        )
    }

    fn artifacts(&self) -> MetaResult<ArtifactList> {
        self.derive(
            MetadataField::Artifacts,
            &self.computed_artifacts,
            |seed| match seed {
                VariantSeed::Base(base) => base.artifacts(),
                VariantSeed::Empty { .. } => Ok(ArtifactList::empty()),
            },
            |artifacts| {
                self.rules
                    .apply_artifact_rules(self, artifacts, self.component_id)
            },
        )
    }

    fn capabilities(&self) -> MetaResult<Capabilities> {
        self.derive(
            MetadataField::Capabilities,
            &self.computed_capabilities,
            |seed| match seed {
                VariantSeed::Base(base) => base.capabilities(),
                VariantSeed::Empty { .. } => Ok(Capabilities::empty()),
            },
            |capabilities| self.rules.apply_capability_rules(self, capabilities),
        )
    }
}

impl ConfigurationMetadata for RuleAwareVariant<'_> {
    /// A single variant mirroring this one. The set itself is rebuilt on every call;
    /// the fields it is made of are memoized.
    fn variants(&self) -> MetaResult<VariantSet> {
        Ok(smallvec![DefaultVariantMetadata::new(
            self.as_describable(),
            self.attributes()?,
            self.artifacts()?,
            self.capabilities()?,
        )])
    }

    fn as_describable(&self) -> DisplayName {
        DisplayName::of([
            self.component_id.to_string(),
            CONFIGURATION_CATEGORY.to_string(),
            self.name.clone(),
        ])
    }

    fn artifact(&self, name: &ArtifactName) -> ComponentArtifactMetadata {
        ComponentArtifactMetadata::new(self.component_id.clone(), name.clone())
    }

    fn hierarchy(&self) -> BTreeSet<String> {
        BTreeSet::from([self.name.clone()])
    }

    fn excludes(&self) -> &[ExcludeMetadata] {
        &[]
    }

    fn is_transitive(&self) -> bool {
        true
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn is_can_be_consumed(&self) -> bool {
        true
    }

    fn is_can_be_resolved(&self) -> bool {
        false
    }

    fn consumption_alternatives(&self) -> &[String] {
        &[]
    }

    fn requires_maven_artifact_discovery(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rules::NoRules,
        tests_utils::{CountingRules, StaticVariant},
    };

    fn component() -> ModuleComponentIdentifier {
        ModuleComponentIdentifier::new("org.acme", "core", "1.0")
    }

    #[test]
    fn base_accessor_reflects_seed() {
        let id = component();
        let base = StaticVariant::sample("api");
        let derived = RuleAwareVariant::with_base("apiCopy", &base, &id, &NoRules);
        let scratch =
            RuleAwareVariant::without_base("fresh", ImmutableAttributes::empty(), &id, &NoRules);

        assert_eq!(derived.base().map(|b| b.name()), Some("api"));
        assert!(scratch.base().is_none());
        assert_eq!(scratch.component_id(), &id);
    }

    #[test]
    fn fields_are_computed_independently() {
        let id = component();
        let rules = CountingRules::default();
        let variant =
            RuleAwareVariant::without_base("runtime", ImmutableAttributes::empty(), &id, &rules);

        variant.attributes().unwrap();
        assert!(variant.is_computed(MetadataField::Attributes));
        assert!(!variant.is_computed(MetadataField::Dependencies));
        assert!(!variant.is_computed(MetadataField::Capabilities));
        assert!(!variant.is_computed(MetadataField::Artifacts));
        assert_eq!(rules.calls(MetadataField::Dependencies), 0);
    }
}
