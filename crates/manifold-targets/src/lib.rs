//! Target matrix for the Manifold publication pipeline.
//!
//! Targets form an inheritance tree rooted at the common (platform-neutral)
//! target. Each target carries a set of capability flags describing what kind
//! of artifacts it can produce. The matrix is built once at configuration
//! time and is read-only for the rest of the pipeline: the binder, the module
//! graph builder, and the aggregator all take it by shared reference.

pub mod capability;
pub mod error;
pub mod matrix;

// Re-exports for convenience.
pub use capability::{Capability, CapabilitySet};
pub use error::{ConfigurationError, Result};
pub use matrix::{Target, TargetMatrix};
