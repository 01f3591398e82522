use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{component::ModuleComponentIdentifier, list::ImmutableList};

/// The name of an artifact published by a module, independent of the module itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArtifactName {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extension: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub classifier: Option<String>,
}

impl ArtifactName {
    /// An artifact whose extension is its type, without classifier (`name.kind`).
    pub fn of(name: impl Into<String>, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            name: name.into(),
            extension: Some(kind.clone()),
            kind,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// File name of the artifact: `name[-classifier][.extension]`.
    pub fn file_name(&self) -> String {
        let mut out = self.name.clone();
        if let Some(classifier) = &self.classifier {
            out.push('-');
            out.push_str(classifier);
        }
        if let Some(extension) = self.extension.as_deref().filter(|e| !e.is_empty()) {
            out.push('.');
            out.push_str(extension);
        }
        out
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// An artifact of a given component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentArtifactMetadata {
    component_id: ModuleComponentIdentifier,
    name: ArtifactName,
}

impl ComponentArtifactMetadata {
    pub fn new(component_id: ModuleComponentIdentifier, name: ArtifactName) -> Self {
        Self { component_id, name }
    }

    pub fn component_id(&self) -> &ModuleComponentIdentifier {
        &self.component_id
    }

    pub fn name(&self) -> &ArtifactName {
        &self.name
    }
}

impl fmt::Display for ComponentArtifactMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.component_id)
    }
}

pub type ArtifactList = ImmutableList<ComponentArtifactMetadata>;
