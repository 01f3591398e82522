//! Fixtures shared by unit and integration tests: rule engines that count their
//! invocations or fail on demand, and a base variant with fixed values.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use varmodel::{
    ArtifactList, ArtifactName, Capabilities, Capability, ComponentArtifactMetadata,
    DependencyList, DependencyMetadata, ImmutableAttributes, ModuleComponentIdentifier,
    ModuleComponentSelector,
};

use crate::{
    metadata::{ConfigurationMetadata, MetadataField, VariantMetadata},
    rules::VariantMetadataRules,
    utils::error::{MetaError, MetaResult},
};

const FIELD_COUNT: usize = 4;

fn slot(field: MetadataField) -> usize {
    field as usize
}

pub fn synthetic_dependency() -> DependencyMetadata {
    DependencyMetadata::new(
        ModuleComponentSelector::new("org.synthetic", "added").with_version("1.0"),
    )
}

pub fn synthetic_capability() -> Capability {
    Capability::new("org.synthetic", "added").with_version("1.0")
}

pub fn synthetic_artifact_name() -> ArtifactName {
    ArtifactName::of("synthetic", "jar")
}

pub const SYNTHETIC_ATTRIBUTE: (&str, &str) = ("org.synthetic.marker", "true");

/// Rule engine counting its invocations per field.
///
/// The identity flavour returns every seed unchanged; the appending flavour adds one
/// synthetic element to every field.
#[derive(Debug, Default)]
pub struct CountingRules {
    append: bool,
    calls: [AtomicUsize; FIELD_COUNT],
}

impl CountingRules {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn appending() -> Self {
        Self {
            append: true,
            ..Self::default()
        }
    }

    pub fn calls(&self, field: MetadataField) -> usize {
        self.calls[slot(field)].load(Ordering::SeqCst)
    }

    fn record(&self, field: MetadataField) {
        self.calls[slot(field)].fetch_add(1, Ordering::SeqCst);
    }
}

impl VariantMetadataRules for CountingRules {
    fn apply_dependency_rules(
        &self,
        _variant: &dyn ConfigurationMetadata,
        dependencies: DependencyList,
    ) -> MetaResult<DependencyList> {
        self.record(MetadataField::Dependencies);
        if self.append {
            Ok(dependencies.with(synthetic_dependency()))
        } else {
            Ok(dependencies)
        }
    }

    fn apply_attribute_rules(
        &self,
        _variant: &dyn ConfigurationMetadata,
        attributes: ImmutableAttributes,
    ) -> MetaResult<ImmutableAttributes> {
        self.record(MetadataField::Attributes);
        if self.append {
            Ok(attributes.with(SYNTHETIC_ATTRIBUTE.0, SYNTHETIC_ATTRIBUTE.1))
        } else {
            Ok(attributes)
        }
    }

    fn apply_capability_rules(
        &self,
        _variant: &dyn ConfigurationMetadata,
        capabilities: Capabilities,
    ) -> MetaResult<Capabilities> {
        self.record(MetadataField::Capabilities);
        if self.append {
            Ok(capabilities.with(synthetic_capability()))
        } else {
            Ok(capabilities)
        }
    }

    fn apply_artifact_rules(
        &self,
        _variant: &dyn ConfigurationMetadata,
        artifacts: ArtifactList,
        component_id: &ModuleComponentIdentifier,
    ) -> MetaResult<ArtifactList> {
        self.record(MetadataField::Artifacts);
        if self.append {
            Ok(artifacts.with(ComponentArtifactMetadata::new(
                component_id.clone(),
                synthetic_artifact_name(),
            )))
        } else {
            Ok(artifacts)
        }
    }
}

/// Rule engine whose attribute rules fail until told otherwise.
#[derive(Debug)]
pub struct FailingRules {
    failing: AtomicBool,
    attribute_calls: AtomicUsize,
}

impl FailingRules {
    pub fn new() -> Self {
        Self {
            failing: AtomicBool::new(true),
            attribute_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn attribute_calls(&self) -> usize {
        self.attribute_calls.load(Ordering::SeqCst)
    }
}

impl Default for FailingRules {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantMetadataRules for FailingRules {
    fn apply_attribute_rules(
        &self,
        variant: &dyn ConfigurationMetadata,
        attributes: ImmutableAttributes,
    ) -> MetaResult<ImmutableAttributes> {
        self.attribute_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(MetaError::RuleFailed {
                field: MetadataField::Attributes,
                variant: variant.name().to_string(),
                reason: "attribute rule rejected the variant".to_string(),
            });
        }
        Ok(attributes)
    }
}

/// A base variant with fixed values, counting how often each field is read.
#[derive(Debug)]
pub struct StaticVariant {
    pub name: String,
    pub dependencies: DependencyList,
    pub attributes: ImmutableAttributes,
    pub artifacts: ArtifactList,
    pub capabilities: Capabilities,
    /// Field whose accessor reports an error instead of its value.
    pub unavailable: Option<MetadataField>,
    reads: [AtomicUsize; FIELD_COUNT],
}

impl StaticVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: DependencyList::empty(),
            attributes: ImmutableAttributes::empty(),
            artifacts: ArtifactList::empty(),
            capabilities: Capabilities::empty(),
            unavailable: None,
            reads: Default::default(),
        }
    }

    /// A variant of `org.acme:base:1.0` with two dependencies and one of every other field.
    pub fn sample(name: impl Into<String>) -> Self {
        let id = ModuleComponentIdentifier::new("org.acme", "base", "1.0");
        Self {
            dependencies: DependencyList::from([
                DependencyMetadata::new(
                    ModuleComponentSelector::new("org.slf4j", "slf4j-api").with_version("2.0.9"),
                ),
                DependencyMetadata::new(
                    ModuleComponentSelector::new("com.google.guava", "guava")
                        .with_version("33.0.0-jre"),
                ),
            ]),
            attributes: ImmutableAttributes::of([
                ("org.gradle.usage", "java-api"),
                ("org.gradle.category", "library"),
            ]),
            artifacts: ArtifactList::from([ComponentArtifactMetadata::new(
                id,
                ArtifactName::of("base", "jar"),
            )]),
            capabilities: Capabilities::of([Capability::new("org.acme", "base").with_version("1.0")]),
            ..Self::new(name)
        }
    }

    pub fn reads(&self, field: MetadataField) -> usize {
        self.reads[slot(field)].load(Ordering::SeqCst)
    }

    fn read<T: Clone>(&self, field: MetadataField, value: &T) -> MetaResult<T> {
        self.reads[slot(field)].fetch_add(1, Ordering::SeqCst);
        if self.unavailable == Some(field) {
            return Err(MetaError::BaseUnavailable {
                field,
                variant: self.name.clone(),
                reason: "value withheld by the fixture".to_string(),
            });
        }
        Ok(value.clone())
    }
}

impl VariantMetadata for StaticVariant {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> MetaResult<DependencyList> {
        self.read(MetadataField::Dependencies, &self.dependencies)
    }

    fn attributes(&self) -> MetaResult<ImmutableAttributes> {
        self.read(MetadataField::Attributes, &self.attributes)
    }

    fn artifacts(&self) -> MetaResult<ArtifactList> {
        self.read(MetadataField::Artifacts, &self.artifacts)
    }

    fn capabilities(&self) -> MetaResult<Capabilities> {
        self.read(MetadataField::Capabilities, &self.capabilities)
    }
}
