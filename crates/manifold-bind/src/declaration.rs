//! The declaration table.
//!
//! Declarations are authored once and never mutated. The table is seeded
//! from configuration before binding begins and is passed by reference to
//! the binder and the module graph builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BindError, Result};

/// Classification of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationKind {
    /// Fully defined in the neutral form; needs no per-target realization.
    Concrete,
    /// Neutral signature only; every leaf target needs a realization,
    /// supplied directly or inherited from an ancestor.
    Abstract,
}

impl DeclarationKind {
    /// Stable kebab-case name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Concrete => "concrete",
            DeclarationKind::Abstract => "abstract",
        }
    }
}

/// A platform-neutral declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Declaration {
    /// Fully-qualified symbol name (e.g., "org.sample.anno.Contract").
    pub name: String,
    /// Concrete or abstract.
    pub kind: DeclarationKind,
}

impl Declaration {
    /// Create a declaration.
    pub fn new(name: impl Into<String>, kind: DeclarationKind) -> Self {
        Declaration {
            name: name.into(),
            kind,
        }
    }
}

/// The full set of declarations of one package, keyed by symbol name.
#[derive(Debug, Clone, Default)]
pub struct DeclarationTable {
    declarations: BTreeMap<String, Declaration>,
}

impl DeclarationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        DeclarationTable {
            declarations: BTreeMap::new(),
        }
    }

    /// Register a declaration; names must be unique.
    pub fn register(&mut self, declaration: Declaration) -> Result<()> {
        if self.declarations.contains_key(&declaration.name) {
            return Err(BindError::DuplicateDeclaration {
                name: declaration.name,
            });
        }
        self.declarations.insert(declaration.name.clone(), declaration);
        Ok(())
    }

    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Result<&Declaration> {
        self.declarations
            .get(name)
            .ok_or_else(|| BindError::UnknownDeclaration {
                name: name.to_string(),
            })
    }

    /// Iterate over all declarations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    /// Names of all declarations, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.keys().map(String::as_str)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
