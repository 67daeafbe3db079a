//! Module graph builder for the Manifold publication pipeline.
//!
//! After binding succeeds, each leaf target's outputs are assembled into a
//! module: a named, versioned unit with attributed variants (api, runtime,
//! sources, docs). The root target gets a distinguished root module whose
//! variants reference the neutral declarations directly and which carries a
//! metadata variant describing the shape of every per-target module.
//!
//! Variant selection is an explicit attribute matcher with closest-match
//! disambiguation and hard no-match/ambiguous failures, not a resolver
//! heuristic.

pub mod attributes;
pub mod builder;
pub mod coordinate;
pub mod error;
pub mod matcher;
pub mod module;
pub mod variant;

// Re-exports for convenience.
pub use attributes::{AttributeSet, DocsKind, Usage};
pub use builder::{ArtifactLayout, ModuleBuilder};
pub use coordinate::Coordinate;
pub use error::{ModuleError, Result};
pub use matcher::select_variant;
pub use module::{Module, ModuleTarget};
pub use variant::{ArtifactRef, Variant, VariantPayload};
