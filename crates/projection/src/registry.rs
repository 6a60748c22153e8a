//! Process-wide projection name registry.
//!
//! Every projection construction registers its name here and receives a
//! stable integer id: the first construction of a distinct name (case-
//! insensitive) appends it and assigns the next id, later constructions
//! get the existing id back. The table is append-only and lives for the
//! process; entries are never removed.
//!
//! Ids are NOT authoritative for equality: two logically identical
//! projections constructed in different orders can disagree on id, so
//! callers compare projections by name/datum/zone instead.

use std::sync::{Mutex, OnceLock};

/// The append-only name table behind projection ids.
#[derive(Debug)]
pub struct ProjectionRegistry {
    names: Mutex<Vec<String>>,
}

impl ProjectionRegistry {
    fn new() -> Self {
        Self {
            names: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide registry instance.
    pub fn global() -> &'static ProjectionRegistry {
        static REGISTRY: OnceLock<ProjectionRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ProjectionRegistry::new)
    }

    /// Look up a name case-insensitively, appending it with the next id
    /// if absent. Safe to call from every projection constructor.
    pub fn register(&self, name: &str) -> u32 {
        let mut names = self.names.lock().expect("projection registry poisoned");
        if let Some(pos) = names.iter().position(|n| n.eq_ignore_ascii_case(name)) {
            return pos as u32;
        }
        names.push(name.to_string());
        let id = (names.len() - 1) as u32;
        tracing::debug!(name, id, "registered projection name");
        id
    }

    /// Look up a name without registering it.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        let names = self.names.lock().expect("projection registry poisoned");
        names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|pos| pos as u32)
    }

    /// Number of distinct names registered so far.
    pub fn len(&self) -> usize {
        self.names.lock().expect("projection registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global registry is shared across the whole test process, so
    // these assertions are relational rather than absolute.

    #[test]
    fn test_register_is_stable() {
        let registry = ProjectionRegistry::global();
        let a = registry.register("TestProjectionAlpha");
        let b = registry.register("TestProjectionAlpha");
        assert_eq!(a, b);
    }

    #[test]
    fn test_register_case_insensitive() {
        let registry = ProjectionRegistry::global();
        let a = registry.register("TestProjectionBeta");
        let b = registry.register("TESTPROJECTIONBETA");
        let c = registry.register("testprojectionbeta");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_distinct_names_get_distinct_ids() {
        let registry = ProjectionRegistry::global();
        let a = registry.register("TestProjectionGamma");
        let b = registry.register("TestProjectionDelta");
        assert_ne!(a, b);
    }

    #[test]
    fn test_lookup_does_not_register() {
        let registry = ProjectionRegistry::global();
        assert!(registry.lookup("TestProjectionNeverRegistered").is_none());

        let id = registry.register("TestProjectionEpsilon");
        assert_eq!(registry.lookup("testprojectionepsilon"), Some(id));
    }
}
