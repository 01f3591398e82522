use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use varcore::{
    ConfigurationMetadata, RuleAwareVariant, RuleRegistry, VariantMetadata,
    rules::registry::VariantFilter, tests_utils::StaticVariant,
};
use varmodel::{DependencyMetadata, ModuleComponentIdentifier, ModuleComponentSelector};

fn build_rules() -> RuleRegistry {
    let mut rules = RuleRegistry::new();
    for i in 0..16 {
        rules
            .add_dependency_rule(VariantFilter::All, move |_, deps| {
                Ok(deps.with(DependencyMetadata::new(
                    ModuleComponentSelector::new("org.bench", format!("dep-{i}")).with_version("1.0"),
                )))
            })
            .add_attribute_rule(VariantFilter::All, move |_, attrs| {
                Ok(attrs.with(format!("bench.attr.{i}"), "on"))
            });
    }
    rules
}

fn bench_derivation(c: &mut Criterion) {
    let id = ModuleComponentIdentifier::new("org.bench", "component", "1.0");
    let base = StaticVariant::sample("runtime");
    let rules = build_rules();

    c.bench_function("first_derivation", |b| {
        b.iter(|| {
            let variant = RuleAwareVariant::with_base("derived", &base, &id, &rules);
            black_box(variant.dependencies().unwrap());
            black_box(variant.attributes().unwrap());
        })
    });

    let warm = RuleAwareVariant::with_base("derived", &base, &id, &rules);
    warm.dependencies().unwrap();
    warm.attributes().unwrap();

    c.bench_function("memoized_access", |b| {
        b.iter(|| {
            black_box(warm.dependencies().unwrap());
            black_box(warm.attributes().unwrap());
        })
    });

    c.bench_function("variant_set", |b| {
        b.iter(|| black_box(warm.variants().unwrap()))
    });
}

criterion_group!(benches, bench_derivation);
criterion_main!(benches);
