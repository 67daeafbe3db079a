//! Module descriptors and the on-disk publication layout.
//!
//! Each module is published as a JSON descriptor a registry or consumer
//! tooling can read without fetching artifacts. Layout:
//! ```text
//! <root>/
//!   <group>/
//!     <name>/
//!       <version>/
//!         <name>-<version>.module.json
//!         <name>-<version>.module.json.sha256
//! ```
//! Writing is deterministic, so re-publishing the same build overwrites the
//! previous descriptors instead of duplicating them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use manifold_modules::{AttributeSet, Coordinate, Module, VariantPayload};

use crate::error::Result;
use crate::integrity::ContentHash;
use crate::publication::Publication;

/// Descriptor format version, bumped on incompatible layout changes.
const FORMAT_VERSION: &str = "1.0";

/// Identity of the component a descriptor describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentId {
    pub group: String,
    pub name: String,
    pub version: String,
}

/// One variant entry in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VariantEntry {
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeSet,
    /// Artifact files of this variant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileEntry>,
    /// Pointer to another module's variant instead of files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_at: Option<AvailableAtEntry>,
    /// Inline structured payload (metadata variant).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<serde_json::Value>,
}

/// An artifact file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileEntry {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// An `available-at` pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AvailableAtEntry {
    pub group: String,
    pub name: String,
    pub variant: String,
}

/// The serialized form of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleDescriptor {
    pub format_version: String,
    pub component: ComponentId,
    pub variants: Vec<VariantEntry>,
}

impl ModuleDescriptor {
    /// Build a descriptor from a module.
    pub fn from_module(module: &Module) -> Self {
        let variants = module
            .variants
            .iter()
            .map(|variant| {
                let mut entry = VariantEntry {
                    name: variant.name.clone(),
                    attributes: variant.attributes.clone(),
                    files: Vec::new(),
                    available_at: None,
                    inline: None,
                };
                match &variant.payload {
                    VariantPayload::Artifact(artifact) => {
                        entry.files.push(FileEntry {
                            uri: artifact.uri.clone(),
                            sha256: artifact.sha256.clone(),
                        });
                    }
                    VariantPayload::AvailableAt { coordinate, variant } => {
                        entry.available_at = Some(AvailableAtEntry {
                            group: coordinate.group.clone(),
                            name: coordinate.name.clone(),
                            variant: variant.clone(),
                        });
                    }
                    VariantPayload::Inline(value) => {
                        entry.inline = Some(value.clone());
                    }
                }
                entry
            })
            .collect();

        ModuleDescriptor {
            format_version: FORMAT_VERSION.to_string(),
            component: ComponentId {
                group: module.coordinate.group.clone(),
                name: module.coordinate.name.clone(),
                version: module.version.clone(),
            },
            variants,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a descriptor from JSON.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Coordinate of the described component.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.component.group.clone(), self.component.name.clone())
    }

    fn descriptor_path(&self, root: &Path) -> PathBuf {
        root.join(&self.component.group)
            .join(&self.component.name)
            .join(&self.component.version)
            .join(format!(
                "{}-{}.module.json",
                self.component.name, self.component.version
            ))
    }
}

/// Write every module descriptor of a publication under `root`, with a
/// SHA-256 sidecar per descriptor. Returns the descriptor paths, root
/// module first.
pub fn write_publication(publication: &Publication, root: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for module in publication.modules() {
        let descriptor = ModuleDescriptor::from_module(module);
        let json = descriptor.to_json()?;
        let path = descriptor.descriptor_path(root);

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, &json)?;

        let digest = ContentHash::compute(json.as_bytes());
        let sidecar = path.with_extension("json.sha256");
        std::fs::write(&sidecar, format!("{digest}\n"))?;

        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::aggregate;
    use manifold_bind::{Declaration, DeclarationKind, DeclarationTable, Realization, RealizationStore};
    use manifold_modules::ModuleBuilder;
    use manifold_targets::{Capability, CapabilitySet, TargetMatrix};

    fn publication() -> Publication {
        let mut matrix = TargetMatrix::new();
        matrix.register("common", CapabilitySet::empty(), None).unwrap();
        matrix
            .register(
                "jvm",
                CapabilitySet::from_caps([Capability::Bytecode]),
                Some("common"),
            )
            .unwrap();

        let mut table = DeclarationTable::new();
        table
            .register(Declaration::new("org.sample.Contract", DeclarationKind::Abstract))
            .unwrap();
        let mut store = RealizationStore::new();
        store.register(Realization::artifact("org.sample.Contract", "jvm", "impl"));

        let (root, targets) = ModuleBuilder::new(
            &matrix,
            &table,
            &store,
            Coordinate::new("org.sample", "anno"),
            "1.0.0",
        )
        .build_all()
        .unwrap();
        aggregate(root, targets, &matrix).unwrap()
    }

    #[test]
    fn descriptor_round_trip() {
        let publication = publication();
        let descriptor = ModuleDescriptor::from_module(&publication.root);
        let json = descriptor.to_json().unwrap();
        let reparsed = ModuleDescriptor::parse(&json).unwrap();
        assert_eq!(descriptor, reparsed);
        assert_eq!(reparsed.coordinate().to_string(), "org.sample:anno");
    }

    #[test]
    fn redirect_serialized_as_available_at() {
        let publication = publication();
        let descriptor = ModuleDescriptor::from_module(&publication.root);
        let jvm_api = descriptor
            .variants
            .iter()
            .find(|v| v.name == "jvm-api")
            .unwrap();

        let pointer = jvm_api.available_at.as_ref().unwrap();
        assert_eq!(pointer.name, "anno-jvm");
        assert_eq!(pointer.variant, "api");
        assert!(jvm_api.files.is_empty());
    }

    #[test]
    fn write_layout_and_sidecars() {
        let publication = publication();
        let dir = tempfile::tempdir().unwrap();

        let written = write_publication(&publication, dir.path()).unwrap();
        assert_eq!(written.len(), publication.module_count());

        let root_descriptor = dir
            .path()
            .join("org.sample/anno/1.0.0/anno-1.0.0.module.json");
        assert!(root_descriptor.is_file());
        assert!(dir
            .path()
            .join("org.sample/anno-jvm/1.0.0/anno-jvm-1.0.0.module.json")
            .is_file());

        // Sidecar digest matches the descriptor bytes.
        let json = std::fs::read(&root_descriptor).unwrap();
        let sidecar = std::fs::read_to_string(
            root_descriptor.with_extension("json.sha256"),
        )
        .unwrap();
        assert!(ContentHash(sidecar.trim().to_string()).verify(&json));
    }

    #[test]
    fn republication_overwrites_deterministically() {
        let publication = publication();
        let dir = tempfile::tempdir().unwrap();

        let first = write_publication(&publication, dir.path()).unwrap();
        let before = std::fs::read(&first[0]).unwrap();
        let second = write_publication(&publication, dir.path()).unwrap();
        let after = std::fs::read(&second[0]).unwrap();

        assert_eq!(first, second);
        assert_eq!(before, after);
    }
}
