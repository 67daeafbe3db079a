//! Module graph error types.

use manifold_bind::BindError;
use manifold_targets::ConfigurationError;

/// Errors that can occur while building modules or selecting variants.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModuleError {
    /// A declaration in the target's closure failed to bind.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Malformed target tree.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Modules are built for leaf targets only; the root and intermediate
    /// targets have no module of their own.
    #[error("target '{name}' is not a leaf target")]
    NotALeafTarget { name: String },

    /// Malformed artifact coordinate string.
    #[error("invalid coordinate '{input}' (expected 'group:name')")]
    InvalidCoordinate { input: String },

    /// No variant satisfies the requested attribute set.
    #[error("no variant matches requested attributes {requested}")]
    NoMatchingVariant { requested: String },

    /// More than one variant satisfies the requested attribute set equally
    /// well.
    #[error("ambiguous variant selection for {requested}: candidates {candidates:?}")]
    AmbiguousVariant {
        requested: String,
        candidates: Vec<String>,
    },
}

/// Result type alias for module graph operations.
pub type Result<T> = std::result::Result<T, ModuleError>;
