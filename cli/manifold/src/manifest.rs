//! `manifold.toml` manifest parsing and pipeline seeding.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use manifold_bind::{
    Declaration, DeclarationKind, DeclarationTable, Realization, RealizationStore,
};
use manifold_modules::Coordinate;
use manifold_targets::{Capability, CapabilitySet, TargetMatrix};

/// The top-level manifest structure for a Manifold package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifoldManifest {
    /// Package identity (required).
    pub package: PackageConfig,
    /// Target tree, keyed by target name.
    pub targets: BTreeMap<String, TargetConfig>,
    /// Declarations, keyed by fully-qualified symbol name.
    #[serde(default)]
    pub declarations: BTreeMap<String, DeclarationConfig>,
    /// Output configuration.
    #[serde(default)]
    pub outputs: Option<OutputsConfig>,
}

/// Package identity section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Coordinate group (e.g., "org.sample").
    pub group: String,
    /// Coordinate name; target module names derive from this.
    pub name: String,
    /// Publication version, treated as an opaque string.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// One target node in the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Parent target name; omitted only on the root.
    #[serde(default)]
    pub parent: Option<String>,
    /// Capability names (e.g., "bytecode", "native-binary").
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// One declaration in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationConfig {
    /// Concrete or abstract.
    pub kind: DeclarationKind,
    /// Per-target implementation references for abstract declarations.
    #[serde(default)]
    pub realizations: BTreeMap<String, String>,
}

/// Output configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputsConfig {
    /// Directory artifact locations are derived under.
    #[serde(default)]
    pub dir: Option<String>,
}

impl ManifoldManifest {
    /// Search upward from `start_dir` for a `manifold.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join("manifold.toml");
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: ManifoldManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing manifold.toml")
    }

    /// The root coordinate of the package.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.package.group.clone(), self.package.name.clone())
    }

    /// The publication version from the manifest.
    pub fn version(&self) -> &str {
        &self.package.version
    }

    /// The artifact output directory (default: "out").
    pub fn out_dir(&self) -> &str {
        self.outputs
            .as_ref()
            .and_then(|o| o.dir.as_deref())
            .unwrap_or("out")
    }

    /// Seed a target matrix from the manifest's target table.
    ///
    /// TOML tables carry no ordering guarantee, so targets are registered
    /// in dependency order: a node is registered once its parent is in the
    /// matrix. A stalled pass means an unknown parent or a parent cycle.
    pub fn build_matrix(&self) -> Result<TargetMatrix> {
        let mut matrix = TargetMatrix::new();
        let mut pending: BTreeMap<&str, &TargetConfig> = self
            .targets
            .iter()
            .map(|(name, config)| (name.as_str(), config))
            .collect();

        while !pending.is_empty() {
            let ready: Vec<&str> = pending
                .iter()
                .filter(|(_, config)| match config.parent.as_deref() {
                    None => true,
                    Some(parent) => matrix.get(parent).is_ok(),
                })
                .map(|(name, _)| *name)
                .collect();

            if ready.is_empty() {
                let stuck: Vec<&str> = pending.keys().copied().collect();
                bail!(
                    "targets with unknown or cyclic parents: {}",
                    stuck.join(", ")
                );
            }

            for name in ready {
                let config = pending.remove(name).unwrap();
                let capabilities = parse_capabilities(&config.capabilities)
                    .with_context(|| format!("target '{name}'"))?;
                matrix.register(name, capabilities, config.parent.as_deref())?;
            }
        }

        Ok(matrix)
    }

    /// Seed the declaration table and realization store.
    pub fn build_declarations(&self) -> Result<(DeclarationTable, RealizationStore)> {
        let mut table = DeclarationTable::new();
        let mut store = RealizationStore::new();
        for (name, config) in &self.declarations {
            table.register(Declaration::new(name.as_str(), config.kind))?;
            for (target, reference) in &config.realizations {
                store.register(Realization::artifact(
                    name.as_str(),
                    target.as_str(),
                    reference.as_str(),
                ));
            }
        }
        Ok((table, store))
    }

    /// Seed everything the module builder needs.
    pub fn seed(&self) -> Result<(TargetMatrix, DeclarationTable, RealizationStore)> {
        let matrix = self.build_matrix()?;
        let (table, store) = self.build_declarations()?;
        Ok((matrix, table, store))
    }
}

fn parse_capabilities(names: &[String]) -> Result<CapabilitySet> {
    let mut caps = Vec::new();
    for name in names {
        match Capability::parse(name) {
            Some(cap) => caps.push(cap),
            None => bail!("unknown capability '{name}'"),
        }
    }
    Ok(CapabilitySet::from_caps(caps))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[package]
group = "org.sample"
name = "annotations"
version = "24.1.0"

[targets.common]

[targets.jvm]
parent = "common"
capabilities = ["bytecode"]

[targets.native-x64]
parent = "common"
capabilities = ["native-binary"]

[declarations."org.sample.NotNull"]
kind = "concrete"

[declarations."org.sample.Contract"]
kind = "abstract"

[declarations."org.sample.Contract".realizations]
common = "src/common/Contract.impl"
"#;

    #[test]
    fn parse_full_manifest() {
        let manifest = ManifoldManifest::from_str(SAMPLE).unwrap();
        assert_eq!(manifest.package.group, "org.sample");
        assert_eq!(manifest.version(), "24.1.0");
        assert_eq!(manifest.targets.len(), 3);
        assert_eq!(manifest.declarations.len(), 2);
        assert_eq!(manifest.coordinate().to_string(), "org.sample:annotations");
        assert_eq!(manifest.out_dir(), "out");
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = ManifoldManifest::from_str(
            "[package]\ngroup = \"g\"\nname = \"n\"\n\n[targets.common]\n",
        )
        .unwrap();
        assert_eq!(manifest.version(), "0.1.0");
        assert!(manifest.declarations.is_empty());
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(ManifoldManifest::from_str("not toml [[[").is_err());
    }

    #[test]
    fn matrix_registers_parents_first() {
        // "aarch" sorts before its parent "zcommon"; seeding must not
        // depend on table order.
        let manifest = ManifoldManifest::from_str(
            r#"
[package]
group = "g"
name = "n"

[targets.zcommon]

[targets.aarch]
parent = "zcommon"
capabilities = ["native-binary"]
"#,
        )
        .unwrap();
        let matrix = manifest.build_matrix().unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.require_root().unwrap().name, "zcommon");
    }

    #[test]
    fn unknown_parent_reported() {
        let manifest = ManifoldManifest::from_str(
            r#"
[package]
group = "g"
name = "n"

[targets.common]

[targets.orphan]
parent = "missing"
"#,
        )
        .unwrap();
        let err = manifest.build_matrix().unwrap_err();
        assert!(err.to_string().contains("orphan"));
    }

    #[test]
    fn unknown_capability_rejected() {
        let manifest = ManifoldManifest::from_str(
            r#"
[package]
group = "g"
name = "n"

[targets.common]
capabilities = ["quantum"]
"#,
        )
        .unwrap();
        let err = manifest.build_matrix().unwrap_err();
        assert!(format!("{err:#}").contains("quantum"));
    }

    #[test]
    fn declarations_seed_table_and_store() {
        let manifest = ManifoldManifest::from_str(SAMPLE).unwrap();
        let (table, store) = manifest.build_declarations().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("org.sample.Contract", "common").len(), 1);
    }
}
