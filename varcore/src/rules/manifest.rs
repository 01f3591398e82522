//! Declarative rules loaded from a TOML manifest.
//!
//! ```toml
//! [[variant]]
//! name = "runtime"                       # omit to target every variant
//! attributes = { "org.gradle.usage" = "java-runtime" }
//! remove-attributes = ["org.gradle.status"]
//! dependencies = ["org.slf4j:slf4j-api:2.0.9"]
//! remove-dependencies = ["commons-logging:commons-logging"]
//! capabilities = [{ group = "org.acme", name = "acme-logging", version = "1.0" }]
//! files = [{ name = "acme-native", type = "so", classifier = "linux-x86_64" }]
//! ```
//!
//! Each `[[variant]]` block registers its rules into a [`RuleRegistry`] in file order.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};
use varmodel::{
    ArtifactName, Capabilities, ComponentArtifactMetadata, DependencyMetadata, ExcludeMetadata,
    ImmutableAttributes, ModelError, ModuleComponentSelector,
};

use crate::{
    magic::{ENV_RULES_PATH, RULES_DIR_NAME, RULES_FILE_NAME},
    rules::registry::{RuleRegistry, VariantFilter},
    utils::error::{MetaError, MetaResult},
};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RulesManifest {
    #[serde(default, rename = "variant")]
    pub variants: Vec<VariantRules>,

    /// Where the manifest was read from, used in error messages.
    #[serde(skip)]
    origin: String,
}

/// Rules applying to the variants matched by `name` (every variant when absent).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VariantRules {
    #[serde(default)]
    pub name: Option<String>,
    /// Merged over the seed attributes; manifest values win.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub remove_attributes: Vec<String>,
    /// `group:module[:version]` coordinates appended to the dependencies.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// `group:module` coordinates removed from the dependencies, whatever their version.
    /// A versioned coordinate is rejected.
    #[serde(default)]
    pub remove_dependencies: Vec<String>,
    /// Declared over the seed capabilities; duplicate facets keep the last entry.
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Artifacts added to the variant, published by the variant's own component.
    #[serde(default)]
    pub files: Vec<ArtifactName>,
}

impl RulesManifest {
    /// Get the default path to the rules manifest.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(rules_path) = std::env::var(ENV_RULES_PATH) {
            return rules_path.into();
        }

        // Fallback to default paths based on OS
        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push(RULES_DIR_NAME);
        path.push(RULES_FILE_NAME);
        path
    }

    /// Load a manifest from a TOML file.
    pub fn load_from_toml(path: &Path) -> MetaResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str, &path.display().to_string())
    }

    /// Parse a manifest from TOML text; `origin` names the source in error messages.
    pub fn from_toml_str(toml_str: &str, origin: &str) -> MetaResult<Self> {
        let mut manifest: RulesManifest =
            toml::from_str(toml_str).map_err(|e| MetaError::ManifestParseError {
                source: e,
                file: origin.to_string(),
            })?;
        manifest.origin = origin.to_string();

        debug!(
            "Loaded rules manifest '{}' with {} variant block(s)",
            origin,
            manifest.variants.len()
        );
        Ok(manifest)
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Register every rule of this manifest into `registry`.
    ///
    /// All coordinates are validated before anything is registered, so a manifest
    /// with an invalid entry leaves `registry` untouched.
    pub fn register_into(&self, registry: &mut RuleRegistry) -> MetaResult<()> {
        let compiled = self
            .variants
            .iter()
            .map(|rules| self.compile(rules))
            .collect::<MetaResult<Vec<_>>>()?;

        for block in compiled {
            block.register_into(registry);
        }
        Ok(())
    }

    /// Build a registry holding only the rules of this manifest.
    pub fn to_registry(&self) -> MetaResult<RuleRegistry> {
        let mut registry = RuleRegistry::new();
        self.register_into(&mut registry)?;
        Ok(registry)
    }

    fn compile(&self, rules: &VariantRules) -> MetaResult<CompiledRules> {
        let invalid = |source| MetaError::InvalidCoordinates {
            source,
            file: self.origin.clone(),
        };

        let added_dependencies = rules
            .dependencies
            .iter()
            .map(|coords| {
                coords
                    .parse::<ModuleComponentSelector>()
                    .map(DependencyMetadata::new)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        let removed_dependencies = rules
            .remove_dependencies
            .iter()
            .map(|coords| -> Result<ExcludeMetadata, ModelError> {
                let selector = coords.parse::<ModuleComponentSelector>()?;
                if selector.version().is_some() {
                    return Err(ModelError::UnexpectedVersion(coords.clone()));
                }
                Ok(ExcludeMetadata {
                    group: Some(selector.group().to_string()),
                    module: Some(selector.module().to_string()),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        Ok(CompiledRules {
            filter: rules.name.clone().into(),
            attributes: ImmutableAttributes::of(rules.attributes.clone()),
            removed_attributes: rules.remove_attributes.clone(),
            added_dependencies,
            removed_dependencies,
            capabilities: rules.capabilities.clone(),
            files: rules.files.clone(),
        })
    }
}

/// A validated `[[variant]]` block, ready to be turned into registry actions.
struct CompiledRules {
    filter: VariantFilter,
    attributes: ImmutableAttributes,
    removed_attributes: Vec<String>,
    added_dependencies: Vec<DependencyMetadata>,
    removed_dependencies: Vec<ExcludeMetadata>,
    capabilities: Capabilities,
    files: Vec<ArtifactName>,
}

impl CompiledRules {
    fn register_into(self, registry: &mut RuleRegistry) {
        let CompiledRules {
            filter,
            attributes,
            removed_attributes,
            added_dependencies,
            removed_dependencies,
            capabilities,
            files,
        } = self;

        if !attributes.is_empty() || !removed_attributes.is_empty() {
            registry.add_attribute_rule(filter.clone(), move |_, seed| {
                let kept = removed_attributes
                    .iter()
                    .fold(seed, |acc, key| acc.without(key));
                Ok(kept.concat(&attributes))
            });
        }

        if !added_dependencies.is_empty() || !removed_dependencies.is_empty() {
            registry.add_dependency_rule(filter.clone(), move |_, seed| {
                let kept = seed.retain(|dep| {
                    !removed_dependencies
                        .iter()
                        .any(|exclude| exclude.matches(dep.selector()))
                });
                Ok(kept.with_all(added_dependencies.iter().cloned()))
            });
        }

        if !capabilities.is_empty() {
            registry.add_capability_rule(filter.clone(), move |_, seed: Capabilities| {
                Ok(capabilities
                    .iter()
                    .cloned()
                    .fold(seed, |acc, cap| acc.with(cap)))
            });
        }

        if !files.is_empty() {
            registry.add_artifact_rule(filter, move |_, seed, component_id| {
                Ok(seed.with_all(
                    files
                        .iter()
                        .map(|file| ComponentArtifactMetadata::new(component_id.clone(), file.clone())),
                ))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataField;

    #[test]
    fn parses_blocks_and_defaults() {
        let manifest = RulesManifest::from_toml_str(
            r#"
            [[variant]]
            attributes = { status = "release" }

            [[variant]]
            name = "runtime"
            dependencies = ["org.slf4j:slf4j-api:2.0.9"]
            files = [{ name = "native", type = "so" }]
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(manifest.origin(), "inline");
        assert_eq!(manifest.variants.len(), 2);
        assert_eq!(manifest.variants[0].name, None);
        assert_eq!(manifest.variants[1].name.as_deref(), Some("runtime"));
        assert_eq!(manifest.variants[1].files[0].kind, "so");
        assert_eq!(manifest.variants[1].files[0].extension, None);

        let registry = manifest.to_registry().unwrap();
        assert_eq!(registry.rule_count(MetadataField::Attributes), 1);
        assert_eq!(registry.rule_count(MetadataField::Dependencies), 1);
        assert_eq!(registry.rule_count(MetadataField::Artifacts), 1);
        assert_eq!(registry.rule_count(MetadataField::Capabilities), 0);
    }

    #[test]
    fn invalid_toml_is_reported_with_origin() {
        let err = RulesManifest::from_toml_str("[[variant]\nname = 1", "broken.toml").unwrap_err();
        match err {
            MetaError::ManifestParseError { file, .. } => assert_eq!(file, "broken.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_coordinates_leave_registry_untouched() {
        let manifest = RulesManifest::from_toml_str(
            r#"
            [[variant]]
            attributes = { a = "b" }

            [[variant]]
            dependencies = ["not-a-coordinate"]
            "#,
            "rules.toml",
        )
        .unwrap();

        let mut registry = RuleRegistry::new();
        let err = manifest.register_into(&mut registry).unwrap_err();
        assert!(matches!(err, MetaError::InvalidCoordinates { ref file, .. } if file == "rules.toml"));
        assert!(registry.is_empty());
    }

    #[test]
    fn versioned_removal_is_rejected() {
        let manifest = RulesManifest::from_toml_str(
            r#"
            [[variant]]
            remove-dependencies = ["org.slf4j:slf4j-api:9.9.9"]
            "#,
            "rules.toml",
        )
        .unwrap();

        let err = manifest.to_registry().err().unwrap();
        match err {
            MetaError::InvalidCoordinates { source, file } => {
                assert_eq!(file, "rules.toml");
                assert_eq!(
                    source,
                    ModelError::UnexpectedVersion("org.slf4j:slf4j-api:9.9.9".to_string())
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_capabilities_keep_the_last_entry() {
        let manifest = RulesManifest::from_toml_str(
            r#"
            [[variant]]
            capabilities = [
                { group = "a", name = "x", version = "1" },
                { group = "a", name = "x", version = "2" },
            ]
            "#,
            "rules.toml",
        )
        .unwrap();

        let caps = &manifest.variants[0].capabilities;
        assert_eq!(caps.len(), 1);
        assert_eq!(caps.find("a", "x").and_then(|c| c.version.as_deref()), Some("2"));
    }
}
