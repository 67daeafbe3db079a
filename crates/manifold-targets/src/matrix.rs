//! The target matrix: a tree of buildable platforms.
//!
//! Registration is only valid while the matrix is being seeded from
//! configuration; afterwards every component takes the matrix by shared
//! reference, so the structure is immutable for the rest of the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::capability::CapabilitySet;
use crate::error::{ConfigurationError, Result};

/// A buildable platform target.
///
/// Targets inherit shared source from their parent; the parentless target is
/// the common (platform-neutral) root of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Target {
    /// Target name (e.g., "jvm", "native-x64", "wasm-embedded").
    pub name: String,
    /// Capability flags of this target.
    pub capabilities: CapabilitySet,
    /// Parent target name; `None` only for the root.
    #[serde(default)]
    pub parent: Option<String>,
}

impl Target {
    /// Whether this is the root (common) target.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The tree of supported targets.
///
/// Invariants: exactly one root, every parent link points at an existing
/// target, no cycles. Enforced at registration time so lookups never fail
/// structurally.
#[derive(Debug, Clone, Default)]
pub struct TargetMatrix {
    targets: BTreeMap<String, Target>,
}

impl TargetMatrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        TargetMatrix {
            targets: BTreeMap::new(),
        }
    }

    /// Register a target node.
    ///
    /// The parent, if any, must already be registered; the root must be
    /// registered first and exactly once.
    pub fn register(
        &mut self,
        name: &str,
        capabilities: CapabilitySet,
        parent: Option<&str>,
    ) -> Result<()> {
        if self.targets.contains_key(name) {
            return Err(ConfigurationError::DuplicateTarget {
                name: name.to_string(),
            });
        }

        match parent {
            None => {
                if let Some(root) = self.root() {
                    return Err(ConfigurationError::MultipleRoots {
                        first: root.name.clone(),
                        second: name.to_string(),
                    });
                }
            }
            Some(parent_name) => {
                if parent_name == name {
                    return Err(ConfigurationError::Cycle {
                        name: name.to_string(),
                    });
                }
                if !self.targets.contains_key(parent_name) {
                    return Err(ConfigurationError::UnknownParent {
                        target: name.to_string(),
                        parent: parent_name.to_string(),
                    });
                }
                // Parents must pre-exist, so the chain above parent_name is
                // already acyclic; walking it guards the invariant anyway.
                let mut cursor = Some(parent_name.to_string());
                while let Some(current) = cursor {
                    if current == name {
                        return Err(ConfigurationError::Cycle {
                            name: name.to_string(),
                        });
                    }
                    cursor = self
                        .targets
                        .get(&current)
                        .and_then(|t| t.parent.clone());
                }
            }
        }

        self.targets.insert(
            name.to_string(),
            Target {
                name: name.to_string(),
                capabilities,
                parent: parent.map(str::to_string),
            },
        );
        Ok(())
    }

    /// Look up a target by name.
    pub fn get(&self, name: &str) -> Result<&Target> {
        self.targets
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownTarget {
                name: name.to_string(),
            })
    }

    /// The root (common) target, if the matrix is non-empty.
    pub fn root(&self) -> Option<&Target> {
        self.targets.values().find(|t| t.is_root())
    }

    /// The root target, or an error for an empty matrix.
    pub fn require_root(&self) -> Result<&Target> {
        self.root().ok_or(ConfigurationError::EmptyMatrix)
    }

    /// Ordered ancestor chain from the given target up to the root,
    /// inclusive of the target itself (closest first).
    pub fn ancestors(&self, name: &str) -> Result<Vec<&Target>> {
        let mut chain = Vec::new();
        let mut cursor = Some(self.get(name)?);
        while let Some(target) = cursor {
            chain.push(target);
            cursor = match &target.parent {
                Some(parent) => Some(self.get(parent)?),
                None => None,
            };
        }
        Ok(chain)
    }

    /// Leaf targets (targets with no children), sorted by name.
    pub fn leaves(&self) -> Vec<&Target> {
        self.targets
            .values()
            .filter(|t| {
                !self
                    .targets
                    .values()
                    .any(|c| c.parent.as_deref() == Some(t.name.as_str()))
            })
            .collect()
    }

    /// Direct children of the given target, sorted by name.
    pub fn children(&self, name: &str) -> Vec<&Target> {
        self.targets
            .values()
            .filter(|t| t.parent.as_deref() == Some(name))
            .collect()
    }

    /// All targets, sorted by name.
    pub fn all(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;

    fn seeded() -> TargetMatrix {
        let mut matrix = TargetMatrix::new();
        matrix.register("common", CapabilitySet::empty(), None).unwrap();
        matrix
            .register(
                "jvm",
                CapabilitySet::from_caps([Capability::Bytecode]),
                Some("common"),
            )
            .unwrap();
        matrix
            .register("non-jvm", CapabilitySet::empty(), Some("common"))
            .unwrap();
        matrix
            .register(
                "native-x64",
                CapabilitySet::from_caps([Capability::NativeBinary]),
                Some("non-jvm"),
            )
            .unwrap();
        matrix
            .register(
                "js-browser",
                CapabilitySet::from_caps([Capability::BrowserBundle]),
                Some("non-jvm"),
            )
            .unwrap();
        matrix
    }

    #[test]
    fn ancestors_closest_first() {
        let matrix = seeded();
        let chain = matrix.ancestors("native-x64").unwrap();
        let names: Vec<&str> = chain.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["native-x64", "non-jvm", "common"]);
    }

    #[test]
    fn root_ancestors_is_itself() {
        let matrix = seeded();
        let chain = matrix.ancestors("common").unwrap();
        assert_eq!(chain.len(), 1);
        assert!(chain[0].is_root());
    }

    #[test]
    fn leaves_exclude_intermediate_targets() {
        let matrix = seeded();
        let names: Vec<&str> = matrix.leaves().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["js-browser", "jvm", "native-x64"]);
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut matrix = TargetMatrix::new();
        matrix.register("common", CapabilitySet::empty(), None).unwrap();
        let err = matrix
            .register("jvm", CapabilitySet::empty(), Some("missing"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownParent { .. }));
    }

    #[test]
    fn duplicate_target_rejected() {
        let mut matrix = seeded();
        let err = matrix
            .register("jvm", CapabilitySet::empty(), Some("common"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateTarget { .. }));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let mut matrix = seeded();
        let err = matrix
            .register("loop", CapabilitySet::empty(), Some("loop"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Cycle { .. }));
    }

    #[test]
    fn second_root_rejected() {
        let mut matrix = seeded();
        let err = matrix
            .register("other-root", CapabilitySet::empty(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::MultipleRoots { .. }));
    }

    #[test]
    fn unknown_target_lookup() {
        let matrix = seeded();
        assert!(matches!(
            matrix.ancestors("nope").unwrap_err(),
            ConfigurationError::UnknownTarget { .. }
        ));
    }

    #[test]
    fn children_sorted() {
        let matrix = seeded();
        let names: Vec<&str> = matrix
            .children("non-jvm")
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["js-browser", "native-x64"]);
    }

    #[test]
    fn empty_matrix_has_no_root() {
        let matrix = TargetMatrix::new();
        assert!(matrix.root().is_none());
        assert!(matches!(
            matrix.require_root().unwrap_err(),
            ConfigurationError::EmptyMatrix
        ));
    }
}
