// Generator Registry - fixed set of known generator names

use std::collections::BTreeSet;

use crate::domain::error::{DomainError, Result};

/// Names of the generators the producer can render.
///
/// Populated once at startup and read-only afterwards, so it is shared behind
/// an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    names: BTreeSet<String>,
}

impl GeneratorRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Fail-fast check used before any work is queued
    pub fn ensure_known(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(DomainError::UnknownGenerator(name.to_string()))
        }
    }

    /// Sorted generator names
    pub fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_generator_is_an_error_not_a_panic() {
        let registry = GeneratorRegistry::new(["maze", "julia"]);
        assert!(registry.ensure_known("maze").is_ok());
        let err = registry.ensure_known("teapot").unwrap_err();
        assert!(err.to_string().contains("teapot"));
    }

    #[test]
    fn test_names_are_sorted_and_deduplicated() {
        let registry = GeneratorRegistry::new(["maze", "julia", "maze"]);
        assert_eq!(registry.names(), vec!["julia", "maze"]);
        assert_eq!(registry.len(), 2);
    }
}
