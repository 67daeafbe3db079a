//! Declaration binder for the Manifold publication pipeline.
//!
//! A declaration is written once in a platform-neutral form. Concrete
//! declarations are fully defined in that form; abstract declarations carry
//! only a neutral signature and require a platform-specific realization per
//! target. The binder resolves each (declaration, target) pair to exactly one
//! realization by nearest-ancestor lookup over the target tree, failing hard
//! when none exists or when two compete at the same depth.

pub mod binder;
pub mod declaration;
pub mod error;
pub mod realization;

// Re-exports for convenience.
pub use binder::{BindStats, Binder};
pub use declaration::{Declaration, DeclarationKind, DeclarationTable};
pub use error::{BindError, Result};
pub use realization::{Payload, Realization, RealizationStore};
