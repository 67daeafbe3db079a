//! Publication aggregator for the Manifold publication pipeline.
//!
//! Joins the per-target modules behind one root coordinate: each exposed
//! facet of every target module becomes an `available-at` variant on the
//! root, so resolving the root coordinate with a consumer's attributes
//! yields the correct per-target variant without the consumer knowing the
//! target module's coordinate. Also emits the on-disk descriptor layout a
//! package registry consumes.

pub mod descriptor;
pub mod error;
pub mod integrity;
pub mod publication;
pub mod resolve;

// Re-exports for convenience.
pub use descriptor::{write_publication, ModuleDescriptor};
pub use error::{PublishError, Result};
pub use integrity::ContentHash;
pub use publication::{aggregate, Publication};
pub use resolve::{resolve, Selection};
