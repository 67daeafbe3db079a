//! Per-target module construction.
//!
//! For each leaf target the builder binds the target's compiled closure
//! (all-or-nothing: one unbound declaration fails the target, and any failed
//! target fails the whole build) and assembles the module's variants. The
//! root target gets a distinguished root module built from the neutral
//! declarations plus a metadata variant describing every target module.
//!
//! Targets have no data dependency on one another, so `build_all` runs them
//! in parallel; the matrix, table, and store are immutable once sealed and
//! shared without locking.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde_json::json;

use manifold_bind::{Binder, DeclarationTable, RealizationStore};
use manifold_targets::{Capability, CapabilitySet, Target, TargetMatrix};

use crate::attributes::{AttributeSet, DocsKind, Usage};
use crate::coordinate::Coordinate;
use crate::error::{ModuleError, Result};
use crate::module::{Module, ModuleTarget};
use crate::variant::{ArtifactRef, Variant};

/// Derives artifact locations under an output directory.
///
/// The actual compilation producing these files is an external toolchain
/// concern; the builder only declares where each facet's payload lives.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    out_dir: String,
}

impl ArtifactLayout {
    /// Create a layout rooted at the given output directory.
    pub fn new(out_dir: impl Into<String>) -> Self {
        ArtifactLayout {
            out_dir: out_dir.into(),
        }
    }

    /// Compiled-output extension for a capability set, mirroring each
    /// platform's packaging convention.
    fn extension(capabilities: &CapabilitySet) -> &'static str {
        if capabilities.has(Capability::Bytecode) {
            "jar"
        } else if capabilities.has(Capability::NativeBinary) {
            "klib"
        } else if capabilities.has(Capability::BrowserBundle) {
            "js"
        } else if capabilities.has(Capability::ScriptRuntime) {
            "wasm"
        } else {
            "zip"
        }
    }

    /// Location of a target's compiled output.
    pub fn compiled(&self, coordinate: &Coordinate, version: &str, target: &Target) -> ArtifactRef {
        let ext = Self::extension(&target.capabilities);
        ArtifactRef::new(format!(
            "{}/{}/{}-{version}.{ext}",
            self.out_dir, target.name, coordinate.name
        ))
    }

    /// Location of a classified auxiliary artifact (sources, docs).
    pub fn classified(
        &self,
        coordinate: &Coordinate,
        version: &str,
        target: &str,
        classifier: &str,
    ) -> ArtifactRef {
        ArtifactRef::new(format!(
            "{}/{target}/{}-{version}-{classifier}.zip",
            self.out_dir, coordinate.name
        ))
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        ArtifactLayout::new("out")
    }
}

/// Builds per-target modules and the aggregate root module.
#[derive(Debug)]
pub struct ModuleBuilder<'a> {
    matrix: &'a TargetMatrix,
    table: &'a DeclarationTable,
    store: &'a RealizationStore,
    coordinate: Coordinate,
    version: String,
    layout: ArtifactLayout,
    closure: Option<BTreeMap<String, BTreeSet<String>>>,
}

impl<'a> ModuleBuilder<'a> {
    /// Create a builder over sealed configuration.
    pub fn new(
        matrix: &'a TargetMatrix,
        table: &'a DeclarationTable,
        store: &'a RealizationStore,
        coordinate: Coordinate,
        version: impl Into<String>,
    ) -> Self {
        ModuleBuilder {
            matrix,
            table,
            store,
            coordinate,
            version: version.into(),
            layout: ArtifactLayout::default(),
            closure: None,
        }
    }

    /// Use a custom artifact layout.
    pub fn with_layout(mut self, layout: ArtifactLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Restrict each target's compiled closure to an externally computed
    /// reachability set. Without this, the closure is the entire declaration
    /// table and any unresolved abstract declaration is fatal.
    pub fn with_closure(mut self, closure: BTreeMap<String, BTreeSet<String>>) -> Self {
        self.closure = Some(closure);
        self
    }

    /// The root coordinate consumers depend on.
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    fn closure_for(&self, target: &str) -> Vec<String> {
        match &self.closure {
            Some(map) => map
                .get(target)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default(),
            None => self.table.names().map(str::to_string).collect(),
        }
    }

    /// Build the module for one leaf target.
    pub fn build(&self, target_name: &str) -> Result<Module> {
        let target = self.matrix.get(target_name)?;
        if target.is_root() || !self.matrix.children(target_name).is_empty() {
            return Err(ModuleError::NotALeafTarget {
                name: target_name.to_string(),
            });
        }

        let mut binder = Binder::new(self.matrix, self.table, self.store);
        binder.validate_store()?;
        let realizations = binder.bind_closure(target_name, self.closure_for(target_name))?;

        let coordinate = self.coordinate.for_target(target_name);
        let compiled = self.layout.compiled(&coordinate, &self.version, target);

        let mut variants = vec![Variant::artifact(
            "api",
            AttributeSet::new()
                .with_usage(Usage::Compile)
                .with_target(target_name)
                .with_capabilities(target.capabilities.clone()),
            compiled.clone(),
        )];

        // Bytecode targets ship the same archive in a distinct run-time
        // role; other targets consume the compile artifact directly.
        if target.capabilities.distinguishes_runtime() {
            variants.push(Variant::artifact(
                "runtime",
                AttributeSet::new()
                    .with_usage(Usage::Runtime)
                    .with_target(target_name)
                    .with_capabilities(target.capabilities.clone()),
                compiled,
            ));
        }

        variants.push(Variant::artifact(
            "sources",
            AttributeSet::new()
                .with_documentation(DocsKind::Sources)
                .with_target(target_name),
            self.layout
                .classified(&coordinate, &self.version, target_name, "sources"),
        ));

        Ok(Module {
            coordinate,
            version: self.version.clone(),
            target: ModuleTarget::Leaf(target_name.to_string()),
            variants,
            realizations,
        })
    }

    /// Build the distinguished root module.
    ///
    /// Its api and sources variants reference the neutral declarations
    /// directly; the metadata variant aggregates the shape of every target
    /// module for tooling introspection.
    pub fn build_root(&self, target_modules: &[Module]) -> Result<Module> {
        let root = self.matrix.require_root()?;

        let variants = vec![
            Variant::artifact(
                "api",
                AttributeSet::new()
                    .with_usage(Usage::Compile)
                    .with_capabilities(root.capabilities.clone()),
                self.layout.compiled(&self.coordinate, &self.version, root),
            ),
            Variant::artifact(
                "sources",
                AttributeSet::new().with_documentation(DocsKind::Sources),
                self.layout
                    .classified(&self.coordinate, &self.version, &root.name, "sources"),
            ),
            Variant::artifact(
                "docs",
                AttributeSet::new().with_documentation(DocsKind::Docs),
                self.layout
                    .classified(&self.coordinate, &self.version, &root.name, "docs"),
            ),
            Variant {
                name: "metadata".to_string(),
                attributes: AttributeSet::new(),
                payload: crate::variant::VariantPayload::Inline(Self::metadata(target_modules)),
            },
        ];

        Ok(Module {
            coordinate: self.coordinate.clone(),
            version: self.version.clone(),
            target: ModuleTarget::Root,
            variants,
            realizations: Vec::new(),
        })
    }

    /// Build every leaf target module in parallel, then the root.
    ///
    /// Any failed target fails the whole build; a publication is
    /// all-or-nothing across targets.
    pub fn build_all(&self) -> Result<(Module, Vec<Module>)> {
        let binder = Binder::new(self.matrix, self.table, self.store);
        binder.validate_store()?;
        self.matrix.require_root()?;

        let leaves: Vec<&Target> = self
            .matrix
            .leaves()
            .into_iter()
            .filter(|t| !t.is_root())
            .collect();

        let target_modules: Vec<Module> = leaves
            .par_iter()
            .map(|target| self.build(&target.name))
            .collect::<Result<Vec<_>>>()?;

        let root = self.build_root(&target_modules)?;
        Ok((root, target_modules))
    }

    fn metadata(target_modules: &[Module]) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = target_modules
            .iter()
            .map(|module| {
                json!({
                    "coordinate": module.coordinate.to_string(),
                    "target": module.target.leaf_name(),
                    "realizations": module.realizations.len(),
                    "variants": module
                        .variants
                        .iter()
                        .map(|v| {
                            json!({
                                "name": v.name,
                                "attributes": v.attributes.to_string(),
                            })
                        })
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        json!({ "modules": entries })
    }
}
