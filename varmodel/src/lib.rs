//! Immutable metadata values describing the variants of a published component.
//!
//! Every container in this crate is cheap to clone: the payload sits behind an
//! [`std::sync::Arc`] and "modifying" operations such as [`ImmutableList::with`] or
//! [`ImmutableAttributes::with`] return a new value, leaving the receiver untouched.
//! This is what allows rule engines to receive a seed by value and hand back a
//! rewritten container without any risk of mutating metadata observed elsewhere.

pub mod artifact;
pub mod attributes;
pub mod capabilities;
pub mod component;
pub mod dependency;
pub mod display;
pub mod error;
pub mod list;

pub use artifact::{ArtifactList, ArtifactName, ComponentArtifactMetadata};
pub use attributes::ImmutableAttributes;
pub use capabilities::{Capabilities, Capability};
pub use component::{ModuleComponentIdentifier, ModuleComponentSelector};
pub use dependency::{DependencyList, DependencyMetadata, ExcludeMetadata};
pub use display::DisplayName;
pub use error::{ModelError, ModelResult};
pub use list::ImmutableList;
