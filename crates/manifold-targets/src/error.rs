//! Error types for target matrix construction and lookup.

/// Errors produced while building or querying the target matrix.
///
/// All of these indicate a malformed target tree in the project
/// configuration; none are recoverable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigurationError {
    /// A target was registered with a parent that does not exist.
    #[error("target '{target}' declares unknown parent '{parent}'")]
    UnknownParent { target: String, parent: String },

    /// A target name was registered twice.
    #[error("target '{name}' is already registered")]
    DuplicateTarget { name: String },

    /// Registering the target would introduce a cycle in the tree.
    #[error("target '{name}' would introduce a cycle in the target tree")]
    Cycle { name: String },

    /// A second parentless target was registered; the tree has one root.
    #[error("target '{second}' has no parent but '{first}' is already the root")]
    MultipleRoots { first: String, second: String },

    /// A lookup referenced a target that was never registered.
    #[error("unknown target: '{name}'")]
    UnknownTarget { name: String },

    /// The matrix has no targets at all.
    #[error("target matrix is empty (no root target registered)")]
    EmptyMatrix,
}

/// Result type alias for target matrix operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
