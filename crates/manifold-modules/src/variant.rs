//! Variants: attributed facets of a module.

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeSet;
use crate::coordinate::Coordinate;

/// A reference to an artifact payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtifactRef {
    /// Location of the artifact relative to the publication root.
    pub uri: String,
    /// SHA-256 hex digest of the artifact, when known at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ArtifactRef {
    /// Create an artifact reference without a checksum.
    pub fn new(uri: impl Into<String>) -> Self {
        ArtifactRef {
            uri: uri.into(),
            sha256: None,
        }
    }

    /// Attach a checksum.
    pub fn with_sha256(mut self, digest: impl Into<String>) -> Self {
        self.sha256 = Some(digest.into());
        self
    }
}

/// What a variant points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantPayload {
    /// An artifact of this module.
    Artifact(ArtifactRef),
    /// A pointer to another module's variant. Used on the root module so
    /// one coordinate fans out to the per-target modules at resolution
    /// time.
    AvailableAt {
        coordinate: Coordinate,
        variant: String,
    },
    /// Inline structured data (the root module's metadata variant).
    Inline(serde_json::Value),
}

impl VariantPayload {
    /// Whether this payload is an `available-at` indirection.
    pub fn is_redirect(&self) -> bool {
        matches!(self, VariantPayload::AvailableAt { .. })
    }
}

/// A named, attributed facet of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Variant {
    /// Variant name (e.g., "api", "runtime", "sources", "native-x64-api").
    pub name: String,
    /// Attributes describing how the variant may be consumed.
    pub attributes: AttributeSet,
    /// Artifact payload or redirection.
    pub payload: VariantPayload,
}

impl Variant {
    /// Create a variant with an artifact payload.
    pub fn artifact(name: impl Into<String>, attributes: AttributeSet, artifact: ArtifactRef) -> Self {
        Variant {
            name: name.into(),
            attributes,
            payload: VariantPayload::Artifact(artifact),
        }
    }

    /// Create an `available-at` variant pointing at another module.
    pub fn available_at(
        name: impl Into<String>,
        attributes: AttributeSet,
        coordinate: Coordinate,
        variant: impl Into<String>,
    ) -> Self {
        Variant {
            name: name.into(),
            attributes,
            payload: VariantPayload::AvailableAt {
                coordinate,
                variant: variant.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Usage;

    #[test]
    fn redirect_detection() {
        let direct = Variant::artifact("api", AttributeSet::new(), ArtifactRef::new("a.jar"));
        let redirect = Variant::available_at(
            "jvm-api",
            AttributeSet::new().with_usage(Usage::Compile),
            Coordinate::new("org.sample", "anno-jvm"),
            "api",
        );
        assert!(!direct.payload.is_redirect());
        assert!(redirect.payload.is_redirect());
    }

    #[test]
    fn artifact_checksum_attachment() {
        let artifact = ArtifactRef::new("out/jvm/anno.jar").with_sha256("abc123");
        assert_eq!(artifact.sha256.as_deref(), Some("abc123"));
    }
}
