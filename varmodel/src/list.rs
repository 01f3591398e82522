use std::{ops::Deref, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered, shared, immutable sequence.
///
/// Cloning only bumps a reference count. Two lists compare equal when their
/// elements are equal; [`ImmutableList::ptr_eq`] tells whether they share the
/// same allocation.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ImmutableList<T>(Arc<[T]>);

impl<T> ImmutableList<T> {
    /// Create an empty list.
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// Returns `true` if both lists point to the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: Clone> ImmutableList<T> {
    /// Returns a new list made of this list's elements followed by `item`.
    pub fn with(&self, item: T) -> Self {
        let mut elems = Vec::with_capacity(self.0.len() + 1);
        elems.extend_from_slice(&self.0);
        elems.push(item);
        Self(Arc::from(elems))
    }

    /// Returns a new list made of this list's elements followed by `items`.
    pub fn with_all(&self, items: impl IntoIterator<Item = T>) -> Self {
        self.0.iter().cloned().chain(items).collect()
    }

    /// Returns a new list holding only the elements matching `predicate`.
    pub fn retain(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        self.0.iter().filter(|x| predicate(x)).cloned().collect()
    }
}

impl<T> Clone for ImmutableList<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for ImmutableList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for ImmutableList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> AsRef<[T]> for ImmutableList<T> {
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for ImmutableList<T> {
    fn from(value: Vec<T>) -> Self {
        Self(Arc::from(value))
    }
}

impl<T, const N: usize> From<[T; N]> for ImmutableList<T> {
    fn from(value: [T; N]) -> Self {
        Self(Arc::from(Vec::from(value)))
    }
}

impl<T> FromIterator<T> for ImmutableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a ImmutableList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
