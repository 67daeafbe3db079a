//! Binder error types.

use manifold_targets::ConfigurationError;

/// Errors that can occur while registering declarations or binding them to
/// targets.
///
/// Binding failures are authoring defects, not transient conditions: a
/// missing realization means the platform cannot express required behavior
/// at all, so every variant here aborts the whole build.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BindError {
    /// A declaration name was registered twice.
    #[error("declaration '{name}' is already registered")]
    DuplicateDeclaration { name: String },

    /// A bind was requested for a declaration that does not exist.
    #[error("unknown declaration: '{name}'")]
    UnknownDeclaration { name: String },

    /// A realization references a declaration that does not exist.
    #[error("realization for unknown declaration '{declaration}' on target '{target}'")]
    RealizationWithoutDeclaration { declaration: String, target: String },

    /// A realization was supplied for a concrete declaration.
    #[error("declaration '{declaration}' is concrete; realization on target '{target}' is not allowed")]
    RealizationForConcrete { declaration: String, target: String },

    /// No realization exists anywhere on the target's ancestor chain.
    #[error("no realization of abstract declaration '{declaration}' for target '{target}' or any of its ancestors")]
    UnboundDeclaration { declaration: String, target: String },

    /// Two realizations for the same (declaration, target) pair.
    #[error("conflicting realizations of '{declaration}' on target '{target}'")]
    AmbiguousRealization { declaration: String, target: String },

    /// Malformed target tree.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Result type alias for binder operations.
pub type Result<T> = std::result::Result<T, BindError>;
