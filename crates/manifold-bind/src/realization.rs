//! Realizations: platform-specific implementations of abstract declarations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The implementation payload of a realization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Payload {
    /// The declaration's own platform-neutral body (concrete declarations).
    Neutral,
    /// Reference to a platform-specific implementation artifact.
    Artifact(String),
}

impl Payload {
    /// Whether this is the neutral payload.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Payload::Neutral)
    }
}

/// A (declaration, target) pair with its implementation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Realization {
    /// Declaration this realizes.
    pub declaration: String,
    /// Target the realization is declared on. Binding may return a
    /// realization declared on an ancestor of the requested target.
    pub target: String,
    /// Implementation payload.
    pub payload: Payload,
}

impl Realization {
    /// Create a realization carrying an artifact payload.
    pub fn artifact(
        declaration: impl Into<String>,
        target: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Realization {
            declaration: declaration.into(),
            target: target.into(),
            payload: Payload::Artifact(reference.into()),
        }
    }

    /// Create the neutral realization of a concrete declaration.
    pub fn neutral(declaration: impl Into<String>, target: impl Into<String>) -> Self {
        Realization {
            declaration: declaration.into(),
            target: target.into(),
            payload: Payload::Neutral,
        }
    }
}

/// All realizations of one package, keyed by (declaration, target).
///
/// Multiple registrations for the same key are retained rather than merged
/// so the binder can report the conflict instead of silently picking one.
#[derive(Debug, Clone, Default)]
pub struct RealizationStore {
    entries: BTreeMap<(String, String), Vec<Realization>>,
}

impl RealizationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        RealizationStore {
            entries: BTreeMap::new(),
        }
    }

    /// Register a realization.
    pub fn register(&mut self, realization: Realization) {
        let key = (realization.declaration.clone(), realization.target.clone());
        self.entries.entry(key).or_default().push(realization);
    }

    /// All realizations registered for a (declaration, target) pair.
    pub fn get(&self, declaration: &str, target: &str) -> &[Realization] {
        self.entries
            .get(&(declaration.to_string(), target.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over all registered realizations.
    pub fn iter(&self) -> impl Iterator<Item = &Realization> {
        self.entries.values().flatten()
    }

    /// Number of registered realizations (counting conflicts).
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut store = RealizationStore::new();
        store.register(Realization::artifact("a.Decl", "jvm", "src/jvm/Decl.impl"));

        let found = store.get("a.Decl", "jvm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].payload, Payload::Artifact("src/jvm/Decl.impl".into()));
        assert!(store.get("a.Decl", "js").is_empty());
    }

    #[test]
    fn conflicting_registrations_retained() {
        let mut store = RealizationStore::new();
        store.register(Realization::artifact("a.Decl", "jvm", "first"));
        store.register(Realization::artifact("a.Decl", "jvm", "second"));
        assert_eq!(store.get("a.Decl", "jvm").len(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn neutral_payload() {
        let r = Realization::neutral("a.Decl", "common");
        assert!(r.payload.is_neutral());
    }
}
