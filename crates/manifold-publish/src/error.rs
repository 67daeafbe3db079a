//! Publication error types.

use manifold_modules::{Coordinate, ModuleError};
use manifold_targets::ConfigurationError;

/// Errors that can occur while aggregating, resolving, or writing a
/// publication.
///
/// Partial publication of a package with inconsistent per-target symbol
/// sets is worse than failing the build, so every variant aborts
/// publication.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// A target present in the matrix has no corresponding module.
    #[error("no module for target '{target}' in the aggregate")]
    IncompletePublication { target: String },

    /// Two modules claim the same target.
    #[error("duplicate module for target '{target}'")]
    DuplicateModule { target: String },

    /// A module's target is not a leaf of the matrix.
    #[error("module '{coordinate}' targets '{target}', which is not a leaf target")]
    StrayModule { coordinate: Coordinate, target: String },

    /// The root slot was given a non-root module, or a target slot the root.
    #[error("module '{coordinate}' is not usable in this position of the aggregate")]
    MisplacedModule { coordinate: Coordinate },

    /// A target module's coordinate does not follow `<root>-<target>`.
    #[error("target module coordinate mismatch: expected '{expected}', found '{actual}'")]
    CoordinateMismatch { expected: Coordinate, actual: Coordinate },

    /// Modules disagree on the publication version.
    #[error("module '{coordinate}' has version '{actual}', expected '{expected}'")]
    VersionMismatch {
        coordinate: Coordinate,
        expected: String,
        actual: String,
    },

    /// An `available-at` pointer references a missing module or variant.
    #[error("available-at pointer to '{coordinate}' variant '{variant}' does not resolve")]
    DanglingRedirect { coordinate: Coordinate, variant: String },

    /// Module construction or variant selection failure.
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// Malformed target tree.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Descriptor serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Descriptor I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for publication operations.
pub type Result<T> = std::result::Result<T, PublishError>;
