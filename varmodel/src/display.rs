use std::fmt;

use smallvec::SmallVec;

/// Human readable description of a model element, built from a few parts joined by spaces.
///
/// ```rust
/// # use varmodel::DisplayName;
/// let name = DisplayName::of(["org:core:1.0", "configuration", "runtime"]);
/// assert_eq!(name.display_name(), "org:core:1.0 configuration runtime");
/// assert_eq!(name.capitalized_display_name(), "Org:core:1.0 configuration runtime");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName {
    parts: SmallVec<[String; 3]>,
}

impl DisplayName {
    pub fn of<S: fmt::Display>(parts: impl IntoIterator<Item = S>) -> Self {
        Self {
            parts: parts.into_iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn display_name(&self) -> String {
        self.parts.join(" ")
    }

    pub fn capitalized_display_name(&self) -> String {
        let name = self.display_name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => name,
        }
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
