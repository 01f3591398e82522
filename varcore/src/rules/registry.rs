use log::{debug, trace};
use varmodel::{
    ArtifactList, Capabilities, DependencyList, ImmutableAttributes, ModuleComponentIdentifier,
};

use crate::{
    metadata::{ConfigurationMetadata, MetadataField},
    rules::VariantMetadataRules,
    utils::error::MetaResult,
};

/// Selects the variants a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VariantFilter {
    /// Every variant of the component.
    #[default]
    All,
    /// Only the variant with this name.
    Named(String),
}

impl VariantFilter {
    pub fn matches(&self, variant_name: &str) -> bool {
        match self {
            VariantFilter::All => true,
            VariantFilter::Named(name) => name == variant_name,
        }
    }
}

impl From<Option<String>> for VariantFilter {
    fn from(value: Option<String>) -> Self {
        value.map_or(VariantFilter::All, VariantFilter::Named)
    }
}

impl From<&str> for VariantFilter {
    fn from(value: &str) -> Self {
        VariantFilter::Named(value.to_string())
    }
}

type FieldAction<T> = Box<dyn Fn(&dyn ConfigurationMetadata, T) -> MetaResult<T> + Send + Sync>;

type ArtifactAction = Box<
    dyn Fn(
            &dyn ConfigurationMetadata,
            ArtifactList,
            &ModuleComponentIdentifier,
        ) -> MetaResult<ArtifactList>
        + Send
        + Sync,
>;

struct Scoped<A> {
    filter: VariantFilter,
    action: A,
}

/// Rule engine holding actions registered per field.
///
/// Actions run in registration order, each receiving the output of the previous one.
/// Actions whose [`VariantFilter`] does not match the variant's name are skipped.
///
/// ```rust
/// # use varcore::rules::registry::{RuleRegistry, VariantFilter};
/// let mut rules = RuleRegistry::new();
/// rules
///     .add_attribute_rule(VariantFilter::All, |_, attrs| Ok(attrs.with("status", "release")))
///     .add_attribute_rule("runtime", |_, attrs| Ok(attrs.with("usage", "runtime")));
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Default)]
pub struct RuleRegistry {
    dependency_rules: Vec<Scoped<FieldAction<DependencyList>>>,
    attribute_rules: Vec<Scoped<FieldAction<ImmutableAttributes>>>,
    capability_rules: Vec<Scoped<FieldAction<Capabilities>>>,
    artifact_rules: Vec<Scoped<ArtifactAction>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dependency_rule(
        &mut self,
        filter: impl Into<VariantFilter>,
        rule: impl Fn(&dyn ConfigurationMetadata, DependencyList) -> MetaResult<DependencyList>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        let filter = filter.into();
        debug!("Registered dependency rule for {:?}", filter);
        self.dependency_rules.push(Scoped {
            filter,
            action: Box::new(rule),
        });
        self
    }

    pub fn add_attribute_rule(
        &mut self,
        filter: impl Into<VariantFilter>,
        rule: impl Fn(&dyn ConfigurationMetadata, ImmutableAttributes) -> MetaResult<ImmutableAttributes>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        let filter = filter.into();
        debug!("Registered attribute rule for {:?}", filter);
        self.attribute_rules.push(Scoped {
            filter,
            action: Box::new(rule),
        });
        self
    }

    pub fn add_capability_rule(
        &mut self,
        filter: impl Into<VariantFilter>,
        rule: impl Fn(&dyn ConfigurationMetadata, Capabilities) -> MetaResult<Capabilities>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        let filter = filter.into();
        debug!("Registered capability rule for {:?}", filter);
        self.capability_rules.push(Scoped {
            filter,
            action: Box::new(rule),
        });
        self
    }

    pub fn add_artifact_rule(
        &mut self,
        filter: impl Into<VariantFilter>,
        rule: impl Fn(
            &dyn ConfigurationMetadata,
            ArtifactList,
            &ModuleComponentIdentifier,
        ) -> MetaResult<ArtifactList>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        let filter = filter.into();
        debug!("Registered artifact rule for {:?}", filter);
        self.artifact_rules.push(Scoped {
            filter,
            action: Box::new(rule),
        });
        self
    }

    /// Number of rules registered for `field`, whatever their filter.
    pub fn rule_count(&self, field: MetadataField) -> usize {
        match field {
            MetadataField::Dependencies => self.dependency_rules.len(),
            MetadataField::Attributes => self.attribute_rules.len(),
            MetadataField::Capabilities => self.capability_rules.len(),
            MetadataField::Artifacts => self.artifact_rules.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.dependency_rules.len()
            + self.attribute_rules.len()
            + self.capability_rules.len()
            + self.artifact_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fold `seed` through the actions of `rules` matching `variant`, in registration order.
fn apply_scoped<A, T>(
    field: MetadataField,
    rules: &[Scoped<A>],
    variant: &dyn ConfigurationMetadata,
    seed: T,
    invoke: impl Fn(&A, T) -> MetaResult<T>,
) -> MetaResult<T> {
    let mut applied = 0usize;
    let result = rules
        .iter()
        .filter(|rule| rule.filter.matches(variant.name()))
        .try_fold(seed, |value, rule| {
            applied += 1;
            invoke(&rule.action, value)
        })?;
    trace!(
        "Applied {} of {} {} rules to variant '{}'",
        applied,
        rules.len(),
        field,
        variant.name()
    );
    Ok(result)
}

impl VariantMetadataRules for RuleRegistry {
    fn apply_dependency_rules(
        &self,
        variant: &dyn ConfigurationMetadata,
        dependencies: DependencyList,
    ) -> MetaResult<DependencyList> {
        apply_scoped(
            MetadataField::Dependencies,
            &self.dependency_rules,
            variant,
            dependencies,
            |action, value| action(variant, value),
        )
    }

    fn apply_attribute_rules(
        &self,
        variant: &dyn ConfigurationMetadata,
        attributes: ImmutableAttributes,
    ) -> MetaResult<ImmutableAttributes> {
        apply_scoped(
            MetadataField::Attributes,
            &self.attribute_rules,
            variant,
            attributes,
            |action, value| action(variant, value),
        )
    }

    fn apply_capability_rules(
        &self,
        variant: &dyn ConfigurationMetadata,
        capabilities: Capabilities,
    ) -> MetaResult<Capabilities> {
        apply_scoped(
            MetadataField::Capabilities,
            &self.capability_rules,
            variant,
            capabilities,
            |action, value| action(variant, value),
        )
    }

    fn apply_artifact_rules(
        &self,
        variant: &dyn ConfigurationMetadata,
        artifacts: ArtifactList,
        component_id: &ModuleComponentIdentifier,
    ) -> MetaResult<ArtifactList> {
        apply_scoped(
            MetadataField::Artifacts,
            &self.artifact_rules,
            variant,
            artifacts,
            |action, value| action(variant, value, component_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matching() {
        assert!(VariantFilter::All.matches("anything"));
        assert!(VariantFilter::from("runtime").matches("runtime"));
        assert!(!VariantFilter::from("runtime").matches("api"));
        assert_eq!(VariantFilter::from(None::<String>), VariantFilter::All);
    }

    #[test]
    fn counts_rules_per_field() {
        let mut registry = RuleRegistry::new();
        assert!(registry.is_empty());

        registry
            .add_dependency_rule(VariantFilter::All, |_, deps| Ok(deps))
            .add_dependency_rule("api", |_, deps| Ok(deps))
            .add_capability_rule(VariantFilter::All, |_, caps| Ok(caps));

        assert_eq!(registry.rule_count(MetadataField::Dependencies), 2);
        assert_eq!(registry.rule_count(MetadataField::Capabilities), 1);
        assert_eq!(registry.rule_count(MetadataField::Artifacts), 0);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn artifact_rules_are_scoped_and_see_the_component() {
        use varmodel::{ArtifactName, ComponentArtifactMetadata, ImmutableAttributes};

        use crate::{metadata::VariantMetadata, variant::RuleAwareVariant};

        let id = ModuleComponentIdentifier::new("org.acme", "core", "1.0");
        let mut registry = RuleRegistry::new();
        registry
            .add_artifact_rule(VariantFilter::All, |_, files, component_id| {
                Ok(files.with(ComponentArtifactMetadata::new(
                    component_id.clone(),
                    ArtifactName::of("core", "jar"),
                )))
            })
            .add_artifact_rule("api", |_, _, _| Ok(ArtifactList::empty()))
            .add_artifact_rule("runtime", |_, files, component_id| {
                Ok(files.with(ComponentArtifactMetadata::new(
                    component_id.clone(),
                    ArtifactName::of("core", "jar").with_classifier("native"),
                )))
            });

        let variant =
            RuleAwareVariant::without_base("runtime", ImmutableAttributes::empty(), &id, &registry);
        let files: Vec<String> = variant
            .artifacts()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            files,
            ["core.jar (org.acme:core:1.0)", "core-native.jar (org.acme:core:1.0)"]
        );
    }
}
