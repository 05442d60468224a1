// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Name Registry — collision-free identifier allocation for generated code.
//!
//! A [`NameRegistry`] remembers every name handed out within one scope (all
//! resource interfaces of a run, or all methods of one interface) and hands
//! out the next free variant of a candidate name. Names are never released.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Registry of names already taken within a single naming scope.
///
/// Allocation is linear probing on a numeric suffix: `candidate`, then
/// `candidate1`, `candidate2`, ... The first caller for a base name always
/// receives the unsuffixed name, so results depend only on call order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRegistry {
    used: BTreeSet<String>,
}

impl NameRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self { Self::default() }

    /// Create a registry with `names` already marked as taken.
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { used: names.into_iter().map(Into::into).collect() }
    }

    /// Allocate the first free name derived from `candidate` and mark it used.
    pub fn allocate(&mut self, candidate: &str) -> String {
        let mut index: usize = 0;
        loop {
            let actual = if index == 0 {
                candidate.to_string()
            } else {
                format!("{}{}", candidate, index)
            };
            if !self.used.contains(&actual) {
                if index > 0 {
                    tracing::debug!("name '{}' taken, allocated '{}'", candidate, actual);
                }
                self.used.insert(actual.clone());
                return actual;
            }
            index += 1;
        }
    }

    /// Mark `name` as taken without probing.
    ///
    /// Returns `false` if the name was already in use.
    pub fn reserve(&mut self, name: &str) -> bool { self.used.insert(name.to_string()) }
}

/// Read-only view over a [`NameRegistry`].
pub trait NameRegistryReader {
    /// Whether `name` has already been handed out or reserved.
    fn contains(&self, name: &str) -> bool;

    /// All taken names in lexicographic order.
    fn names(&self) -> Vec<&str>;

    /// Number of taken names.
    fn len(&self) -> usize;

    /// Whether no name has been taken yet.
    fn is_empty(&self) -> bool { self.len() == 0 }
}

impl NameRegistryReader for NameRegistry {
    fn contains(&self, name: &str) -> bool { self.used.contains(name) }

    fn names(&self) -> Vec<&str> { self.used.iter().map(|s| s.as_str()).collect() }

    fn len(&self) -> usize { self.used.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_is_appended_to_candidate_not_previous_result() {
        let mut registry = NameRegistry::new();
        registry.allocate("A");
        registry.allocate("A1");
        // "A1" is taken by an explicit request, so the next "A" skips to "A2"
        assert_eq!(registry.allocate("A"), "A2");
        assert_eq!(registry.allocate("A1"), "A11");
    }
}
