//! Aggregation of per-target modules behind one root coordinate.

use std::collections::BTreeMap;

use manifold_modules::{Module, Variant};
use manifold_targets::TargetMatrix;

use crate::error::{PublishError, Result};

/// Facets of a target module the root exposes through `available-at`
/// pointers.
const EXPOSED_FACETS: [&str; 3] = ["api", "runtime", "sources"];

/// The externally visible package: the root module plus every target module
/// it references.
///
/// A publication exclusively owns its modules; they are never shared.
#[derive(Debug, Clone)]
pub struct Publication {
    /// The root module consumers depend on.
    pub root: Module,
    /// Target modules, ordered by target name.
    pub targets: Vec<Module>,
}

impl Publication {
    /// Total module count (root + targets).
    pub fn module_count(&self) -> usize {
        1 + self.targets.len()
    }

    /// Look up a target module by coordinate.
    pub fn target_module(&self, coordinate: &manifold_modules::Coordinate) -> Option<&Module> {
        self.targets.iter().find(|m| &m.coordinate == coordinate)
    }

    /// Iterate over all modules, root first.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        std::iter::once(&self.root).chain(self.targets.iter())
    }
}

/// Aggregate a root module and its target modules into a publication.
///
/// Verifies that every leaf target of the matrix is covered exactly once,
/// that coordinates follow the `<root>-<target>` rule, and that the opaque
/// version string reached every module unchanged; then links each exposed
/// facet of every target module onto the root as an `available-at` variant.
pub fn aggregate(
    root: Module,
    target_modules: Vec<Module>,
    matrix: &TargetMatrix,
) -> Result<Publication> {
    if !root.is_root() {
        return Err(PublishError::MisplacedModule {
            coordinate: root.coordinate.clone(),
        });
    }

    let mut by_target: BTreeMap<String, Module> = BTreeMap::new();
    for module in target_modules {
        let target = match module.target.leaf_name() {
            Some(name) => name.to_string(),
            None => {
                return Err(PublishError::MisplacedModule {
                    coordinate: module.coordinate.clone(),
                })
            }
        };
        if by_target.contains_key(&target) {
            return Err(PublishError::DuplicateModule { target });
        }

        let leaf = matrix.get(&target).map_err(|_| PublishError::StrayModule {
            coordinate: module.coordinate.clone(),
            target: target.clone(),
        })?;
        if leaf.is_root() || !matrix.children(&target).is_empty() {
            return Err(PublishError::StrayModule {
                coordinate: module.coordinate.clone(),
                target,
            });
        }

        let expected = root.coordinate.for_target(&target);
        if module.coordinate != expected {
            return Err(PublishError::CoordinateMismatch {
                expected,
                actual: module.coordinate.clone(),
            });
        }
        if module.version != root.version {
            return Err(PublishError::VersionMismatch {
                coordinate: module.coordinate.clone(),
                expected: root.version.clone(),
                actual: module.version.clone(),
            });
        }

        by_target.insert(target, module);
    }

    for leaf in matrix.leaves() {
        if leaf.is_root() {
            continue;
        }
        if !by_target.contains_key(&leaf.name) {
            return Err(PublishError::IncompletePublication {
                target: leaf.name.clone(),
            });
        }
    }

    // Fan each exposed facet out onto the root. Only facets a target module
    // actually has are linked; a target without a runtime artifact simply
    // contributes no runtime pointer.
    let mut root = root;
    for (target, module) in &by_target {
        for facet in EXPOSED_FACETS {
            if let Some(variant) = module.variant(facet) {
                root.push_variant(Variant::available_at(
                    format!("{target}-{facet}"),
                    variant.attributes.clone(),
                    module.coordinate.clone(),
                    facet,
                ));
            }
        }
    }

    Ok(Publication {
        root,
        targets: by_target.into_values().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifold_bind::{Declaration, DeclarationKind, DeclarationTable, Realization, RealizationStore};
    use manifold_modules::{Coordinate, ModuleBuilder};
    use manifold_targets::{Capability, CapabilitySet};

    fn matrix() -> TargetMatrix {
        let mut m = TargetMatrix::new();
        m.register("common", CapabilitySet::empty(), None).unwrap();
        m.register(
            "jvm",
            CapabilitySet::from_caps([Capability::Bytecode]),
            Some("common"),
        )
        .unwrap();
        m.register(
            "native-x64",
            CapabilitySet::from_caps([Capability::NativeBinary]),
            Some("common"),
        )
        .unwrap();
        m
    }

    fn fixtures() -> (TargetMatrix, DeclarationTable, RealizationStore) {
        let matrix = matrix();
        let mut table = DeclarationTable::new();
        table
            .register(Declaration::new("org.sample.NotNull", DeclarationKind::Concrete))
            .unwrap();
        table
            .register(Declaration::new("org.sample.Contract", DeclarationKind::Abstract))
            .unwrap();
        let mut store = RealizationStore::new();
        store.register(Realization::artifact("org.sample.Contract", "common", "shared"));
        (matrix, table, store)
    }

    fn build_all(
        matrix: &TargetMatrix,
        table: &DeclarationTable,
        store: &RealizationStore,
    ) -> (Module, Vec<Module>) {
        ModuleBuilder::new(
            matrix,
            table,
            store,
            Coordinate::new("org.sample", "anno"),
            "1.0.0",
        )
        .build_all()
        .unwrap()
    }

    #[test]
    fn aggregate_counts_targets_plus_one() {
        let (matrix, table, store) = fixtures();
        let (root, targets) = build_all(&matrix, &table, &store);
        let leaf_count = targets.len();

        let publication = aggregate(root, targets, &matrix).unwrap();
        assert_eq!(publication.module_count(), leaf_count + 1);
    }

    #[test]
    fn target_coordinates_follow_naming_rule() {
        let (matrix, table, store) = fixtures();
        let (root, targets) = build_all(&matrix, &table, &store);
        let publication = aggregate(root, targets, &matrix).unwrap();

        for module in &publication.targets {
            let target = module.target.leaf_name().unwrap();
            assert_eq!(
                module.coordinate,
                publication.root.coordinate.for_target(target)
            );
        }
    }

    #[test]
    fn root_gains_available_at_variants() {
        let (matrix, table, store) = fixtures();
        let (root, targets) = build_all(&matrix, &table, &store);
        let publication = aggregate(root, targets, &matrix).unwrap();

        let jvm_api = publication.root.variant("jvm-api").unwrap();
        assert!(jvm_api.payload.is_redirect());
        // jvm distinguishes runtime; native does not.
        assert!(publication.root.has_variant("jvm-runtime"));
        assert!(!publication.root.has_variant("native-x64-runtime"));
        assert!(publication.root.has_variant("native-x64-sources"));
    }

    #[test]
    fn missing_target_module_is_incomplete() {
        let (matrix, table, store) = fixtures();
        let (root, mut targets) = build_all(&matrix, &table, &store);
        targets.retain(|m| m.target.leaf_name() != Some("native-x64"));

        let err = aggregate(root, targets, &matrix).unwrap_err();
        match err {
            PublishError::IncompletePublication { target } => assert_eq!(target, "native-x64"),
            other => panic!("expected IncompletePublication, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_target_module_rejected() {
        let (matrix, table, store) = fixtures();
        let (root, mut targets) = build_all(&matrix, &table, &store);
        targets.push(targets[0].clone());

        let err = aggregate(root, targets, &matrix).unwrap_err();
        assert!(matches!(err, PublishError::DuplicateModule { .. }));
    }

    #[test]
    fn renamed_target_module_rejected() {
        let (matrix, table, store) = fixtures();
        let (root, mut targets) = build_all(&matrix, &table, &store);
        targets[0].coordinate = Coordinate::new("org.sample", "anno-renamed");

        let err = aggregate(root, targets, &matrix).unwrap_err();
        assert!(matches!(err, PublishError::CoordinateMismatch { .. }));
    }

    #[test]
    fn version_drift_rejected() {
        let (matrix, table, store) = fixtures();
        let (root, mut targets) = build_all(&matrix, &table, &store);
        targets[0].version = "2.0.0".into();

        let err = aggregate(root, targets, &matrix).unwrap_err();
        assert!(matches!(err, PublishError::VersionMismatch { .. }));
    }

    #[test]
    fn non_root_in_root_slot_rejected() {
        let (matrix, table, store) = fixtures();
        let (_, targets) = build_all(&matrix, &table, &store);

        let err = aggregate(targets[0].clone(), Vec::new(), &matrix).unwrap_err();
        assert!(matches!(err, PublishError::MisplacedModule { .. }));
    }
}
