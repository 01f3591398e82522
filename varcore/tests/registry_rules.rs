use varcore::{
    MetaError, MetadataField, RuleAwareVariant, RuleRegistry, VariantMetadata,
    rules::{manifest::RulesManifest, registry::VariantFilter},
    tests_utils::StaticVariant,
};
use varmodel::{
    Capability, DependencyMetadata, ImmutableAttributes, ModuleComponentIdentifier,
    ModuleComponentSelector,
};

fn component() -> ModuleComponentIdentifier {
    ModuleComponentIdentifier::new("org.acme", "widgets", "2.1.0")
}

const MANIFEST: &str = r#"
[[variant]]
attributes = { "org.gradle.status" = "integration" }

[[variant]]
name = "runtimeWithNative"
attributes = { "org.gradle.usage" = "native-runtime" }
remove-attributes = ["org.gradle.category"]
dependencies = ["org.acme:widgets-native:2.1.0"]
remove-dependencies = ["com.google.guava:guava"]
capabilities = [{ group = "org.acme", name = "widgets-native", version = "2.1.0" }]
files = [{ name = "widgets-native", type = "so", extension = "so", classifier = "linux-x86_64" }]
"#;

#[test]
fn registry_applies_matching_rules_in_order() {
    let id = component();
    let mut rules = RuleRegistry::new();
    rules
        .add_attribute_rule(VariantFilter::All, |_, attrs| Ok(attrs.with("step", "first")))
        .add_attribute_rule("runtime", |_, attrs| {
            let previous = attrs.get("step").unwrap_or("none").to_string();
            Ok(attrs.with("step", format!("{previous}+second")))
        })
        .add_attribute_rule("api", |_, attrs| Ok(attrs.with("step", "unexpected")));

    let runtime =
        RuleAwareVariant::without_base("runtime", ImmutableAttributes::empty(), &id, &rules);
    let other = RuleAwareVariant::without_base("other", ImmutableAttributes::empty(), &id, &rules);

    assert_eq!(runtime.attributes().unwrap().get("step"), Some("first+second"));
    assert_eq!(other.attributes().unwrap().get("step"), Some("first"));
}

#[test]
fn registry_rules_see_the_variant_as_context() {
    let id = component();
    let mut rules = RuleRegistry::new();
    rules.add_dependency_rule(VariantFilter::All, |variant, deps| {
        let status = variant.attributes()?;
        let reason = format!(
            "added to {} ({})",
            variant.name(),
            status.get("org.gradle.status").unwrap_or("unknown")
        );
        Ok(deps.with(
            DependencyMetadata::new(ModuleComponentSelector::new("org.acme", "extras"))
                .with_reason(reason),
        ))
    });

    let variant = RuleAwareVariant::without_base(
        "runtime",
        ImmutableAttributes::of([("org.gradle.status", "release")]),
        &id,
        &rules,
    );

    let deps = variant.dependencies().unwrap();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].reason(), Some("added to runtime (release)"));
    assert!(variant.is_computed(MetadataField::Attributes));
}

#[test]
fn registry_rule_errors_reach_the_caller() {
    let id = component();
    let mut rules = RuleRegistry::new();
    rules.add_capability_rule("runtime", |variant, _| {
        Err(MetaError::RuleFailed {
            field: MetadataField::Capabilities,
            variant: variant.name().to_string(),
            reason: "conflicting capability".to_string(),
        })
    });

    let variant =
        RuleAwareVariant::without_base("runtime", ImmutableAttributes::empty(), &id, &rules);
    let err = variant.capabilities().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to apply capabilities rules to variant 'runtime': conflicting capability"
    );
}

#[test]
fn manifest_rules_shape_a_derived_variant() {
    let id = component();
    let base = StaticVariant::sample("runtime");
    let rules = RulesManifest::from_toml_str(MANIFEST, "widgets.toml")
        .unwrap()
        .to_registry()
        .unwrap();
    let variant = RuleAwareVariant::with_base("runtimeWithNative", &base, &id, &rules);

    let attrs = variant.attributes().unwrap();
    assert_eq!(attrs.get("org.gradle.status"), Some("integration"));
    assert_eq!(attrs.get("org.gradle.usage"), Some("native-runtime"));
    assert!(!attrs.contains("org.gradle.category"));

    let deps: Vec<String> = variant
        .dependencies()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        deps,
        ["org.slf4j:slf4j-api:2.0.9", "org.acme:widgets-native:2.1.0"]
    );

    let caps = variant.capabilities().unwrap();
    assert_eq!(caps.len(), 2);
    assert_eq!(
        caps.find("org.acme", "widgets-native"),
        Some(&Capability::new("org.acme", "widgets-native").with_version("2.1.0"))
    );

    let files: Vec<String> = variant
        .artifacts()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        files,
        [
            "base.jar (org.acme:base:1.0)",
            "widgets-native-linux-x86_64.so (org.acme:widgets:2.1.0)"
        ]
    );
}

#[test]
fn manifest_rules_skip_other_variants() {
    let id = component();
    let base = StaticVariant::sample("api");
    let rules = RulesManifest::from_toml_str(MANIFEST, "widgets.toml")
        .unwrap()
        .to_registry()
        .unwrap();
    let variant = RuleAwareVariant::with_base("apiCopy", &base, &id, &rules);

    // Only the unnamed block applies.
    let attrs = variant.attributes().unwrap();
    assert_eq!(attrs.get("org.gradle.status"), Some("integration"));
    assert_eq!(attrs.get("org.gradle.usage"), Some("java-api"));
    assert_eq!(variant.dependencies().unwrap(), base.dependencies);
    assert_eq!(variant.artifacts().unwrap(), base.artifacts);
}

#[test]
fn manifest_loads_from_disk() {
    let path = std::env::temp_dir().join(format!("varmeta-rules-{}.toml", std::process::id()));
    std::fs::write(&path, MANIFEST).unwrap();

    let manifest = RulesManifest::load_from_toml(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(manifest.variants.len(), 2);
    assert_eq!(manifest.origin(), path.display().to_string());
}

#[test]
fn missing_manifest_is_an_io_error() {
    let path = std::env::temp_dir().join("varmeta-rules-that-does-not-exist.toml");
    let err = RulesManifest::load_from_toml(&path).unwrap_err();
    assert!(matches!(err, MetaError::IoError(_)));
}
