//! Modules: versioned, publishable units of per-target output.

use manifold_bind::Realization;

use crate::coordinate::Coordinate;
use crate::variant::Variant;

/// Which target a module represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleTarget {
    /// The aggregate root module.
    Root,
    /// A leaf target module.
    Leaf(String),
}

impl ModuleTarget {
    /// Leaf target name, if any.
    pub fn leaf_name(&self) -> Option<&str> {
        match self {
            ModuleTarget::Root => None,
            ModuleTarget::Leaf(name) => Some(name),
        }
    }
}

/// A named, versioned unit of build output with attributed variants.
///
/// Owned exclusively by one publication; immutable once published.
#[derive(Debug, Clone)]
pub struct Module {
    /// Artifact coordinate.
    pub coordinate: Coordinate,
    /// Opaque version string, propagated unchanged from configuration.
    pub version: String,
    /// Target this module represents.
    pub target: ModuleTarget,
    /// Ordered variants.
    pub variants: Vec<Variant>,
    /// Realizations bound into this module's compiled closure. Empty for
    /// the root module, whose variants reference the neutral declarations
    /// directly.
    pub realizations: Vec<Realization>,
}

impl Module {
    /// Look up a variant by name.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Whether a variant with the given name exists.
    pub fn has_variant(&self, name: &str) -> bool {
        self.variant(name).is_some()
    }

    /// Whether this is the root module.
    pub fn is_root(&self) -> bool {
        matches!(self.target, ModuleTarget::Root)
    }

    /// Append a variant. Only valid while the module is being assembled;
    /// published modules are never mutated.
    pub fn push_variant(&mut self, variant: Variant) {
        self.variants.push(variant);
    }
}
