//! Nearest-ancestor declaration binding.
//!
//! `bind` is a pure lookup over immutable inputs, so results are memoized
//! per (declaration, target) pair. Re-running a bind with unchanged
//! configuration always returns the same realization.

use std::collections::HashMap;

use manifold_targets::TargetMatrix;

use crate::declaration::{DeclarationKind, DeclarationTable};
use crate::error::{BindError, Result};
use crate::realization::{Realization, RealizationStore};

/// Statistics about memo usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Resolves declarations to realizations over the target tree.
///
/// Holds shared references to the sealed matrix, declaration table, and
/// realization store; the only mutable state is the memo cache.
#[derive(Debug)]
pub struct Binder<'a> {
    matrix: &'a TargetMatrix,
    table: &'a DeclarationTable,
    store: &'a RealizationStore,
    memo: HashMap<(String, String), Realization>,
    hits: usize,
    misses: usize,
}

impl<'a> Binder<'a> {
    /// Create a binder over sealed configuration.
    pub fn new(
        matrix: &'a TargetMatrix,
        table: &'a DeclarationTable,
        store: &'a RealizationStore,
    ) -> Self {
        Binder {
            matrix,
            table,
            store,
            memo: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Check every registered realization against the declaration table and
    /// the target matrix.
    ///
    /// Rejects realizations of unknown or concrete declarations and
    /// realizations placed on unregistered targets. Run once after seeding,
    /// before any binding.
    pub fn validate_store(&self) -> Result<()> {
        for realization in self.store.iter() {
            let declaration = self.table.get(&realization.declaration).map_err(|_| {
                BindError::RealizationWithoutDeclaration {
                    declaration: realization.declaration.clone(),
                    target: realization.target.clone(),
                }
            })?;
            if declaration.kind == DeclarationKind::Concrete && !realization.payload.is_neutral() {
                return Err(BindError::RealizationForConcrete {
                    declaration: realization.declaration.clone(),
                    target: realization.target.clone(),
                });
            }
            self.matrix.get(&realization.target)?;
        }
        Ok(())
    }

    /// Bind a declaration against a target.
    ///
    /// Concrete declarations always bind to their neutral payload. Abstract
    /// declarations are resolved by walking the target's ancestor chain
    /// closest-first and taking the first target with a realization; two
    /// realizations on that target are a conflict, and an exhausted chain is
    /// a hard failure naming the declaration and the requested target.
    pub fn bind(&mut self, declaration: &str, target: &str) -> Result<Realization> {
        let key = (declaration.to_string(), target.to_string());
        if let Some(found) = self.memo.get(&key) {
            self.hits += 1;
            return Ok(found.clone());
        }
        self.misses += 1;

        let resolved = self.resolve(declaration, target)?;
        self.memo.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Bind every declaration in a target's compiled closure.
    ///
    /// The first failure aborts: a module is never built from a partially
    /// bound closure.
    pub fn bind_closure<I, S>(&mut self, target: &str, declarations: I) -> Result<Vec<Realization>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bound = Vec::new();
        for declaration in declarations {
            bound.push(self.bind(declaration.as_ref(), target)?);
        }
        Ok(bound)
    }

    /// Memo usage statistics.
    pub fn stats(&self) -> BindStats {
        BindStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.memo.len(),
        }
    }

    fn resolve(&self, declaration: &str, target: &str) -> Result<Realization> {
        let decl = self.table.get(declaration)?;
        // Both kinds report unknown targets; the concrete shortcut must not
        // mask a bad target name.
        self.matrix.get(target)?;

        if decl.kind == DeclarationKind::Concrete {
            let root = self.matrix.require_root()?;
            return Ok(Realization::neutral(declaration, root.name.clone()));
        }

        for ancestor in self.matrix.ancestors(target)? {
            let found = self.store.get(declaration, &ancestor.name);
            match found.len() {
                0 => continue,
                1 => return Ok(found[0].clone()),
                _ => {
                    return Err(BindError::AmbiguousRealization {
                        declaration: declaration.to_string(),
                        target: ancestor.name.clone(),
                    })
                }
            }
        }

        Err(BindError::UnboundDeclaration {
            declaration: declaration.to_string(),
            target: target.to_string(),
        })
    }
}
