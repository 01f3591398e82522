//! Rule-aware derived variants for the dependency-resolution engine.
//!
//! A component published by a repository exposes a number of variants. Component
//! metadata rules can add new variants on the fly, either derived from an existing
//! one (the *base*) or starting from scratch. [`variant::RuleAwareVariant`] is such
//! a variant: its dependencies, attributes, capabilities and artifacts are computed
//! lazily, exactly once, by running the registered rules over the base values.
//!
//! Most consumers interact with the read contract in [`metadata`], the rule engine
//! contract in [`rules`] and the entity itself in [`variant`].

pub mod magic;
pub mod metadata;
pub mod rules;
#[cfg(any(test, feature = "test-utils"))]
pub mod tests_utils;
pub mod utils;
pub mod variant;

pub use metadata::{
    ConfigurationMetadata, DefaultVariantMetadata, MetadataField, VariantMetadata, VariantSet,
};
pub use rules::{NoRules, VariantMetadataRules, registry::RuleRegistry};
pub use utils::error::{MetaError, MetaResult};
pub use variant::{RuleAwareVariant, VariantSeed};
