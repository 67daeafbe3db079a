//! Variant attributes.
//!
//! Every variant carries an attribute set describing how it may be consumed;
//! consumers request an attribute set and resolution selects exactly one
//! variant. Only the attributes a consumer actually requests participate in
//! eligibility; the matcher in `matcher.rs` handles disambiguation.

use serde::{Deserialize, Serialize};

use manifold_targets::CapabilitySet;

/// Consumption role of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Usage {
    /// Consumed at compile time (API surface).
    Compile,
    /// Consumed at run time.
    Runtime,
}

impl Usage {
    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Usage::Compile => "compile",
            Usage::Runtime => "runtime",
        }
    }

    /// Parse a kebab-case usage name.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "compile" => Some(Usage::Compile),
            "runtime" => Some(Usage::Runtime),
            _ => None,
        }
    }
}

/// Documentation classification of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocsKind {
    /// Source archive.
    Sources,
    /// Generated documentation.
    Docs,
}

impl DocsKind {
    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocsKind::Sources => "sources",
            DocsKind::Docs => "docs",
        }
    }

    /// Parse a kebab-case documentation kind.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "sources" => Some(DocsKind::Sources),
            "docs" => Some(DocsKind::Docs),
            _ => None,
        }
    }
}

/// An attribute set: the consumable description of a variant, or a
/// consumer's request.
///
/// Unset fields on a request mean "don't care"; unset fields on a variant
/// mean the variant does not carry that attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AttributeSet {
    /// Compile-time or run-time consumption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Documentation classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<DocsKind>,
    /// Owning target, for platform-specific variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Capability flags of the owning target.
    #[serde(default, skip_serializing_if = "CapabilitySet::is_empty")]
    pub capabilities: CapabilitySet,
}

impl AttributeSet {
    /// An empty attribute set.
    pub fn new() -> Self {
        AttributeSet::default()
    }

    /// Set the usage attribute.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Set the documentation attribute.
    pub fn with_documentation(mut self, docs: DocsKind) -> Self {
        self.documentation = Some(docs);
        self
    }

    /// Set the owning target attribute.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the capability flags.
    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Whether this variant attribute set satisfies a request.
    ///
    /// Every attribute present on the request must be present and equal
    /// here; requested capabilities must all be carried. Attributes the
    /// request leaves unset are ignored.
    pub fn satisfies(&self, requested: &AttributeSet) -> bool {
        if let Some(usage) = requested.usage {
            if self.usage != Some(usage) {
                return false;
            }
        }
        if let Some(docs) = requested.documentation {
            if self.documentation != Some(docs) {
                return false;
            }
        }
        if let Some(ref target) = requested.target {
            if self.target.as_deref() != Some(target.as_str()) {
                return false;
            }
        }
        requested.capabilities.iter().all(|c| self.capabilities.has(c))
    }

    /// Number of attributes carried here beyond what the request names.
    ///
    /// Used as the closest-match measure: among eligible variants, the one
    /// with the fewest surplus attributes wins, so a common variant beats a
    /// platform-specific one when no target was requested.
    pub fn surplus(&self, requested: &AttributeSet) -> usize {
        let mut count = 0;
        if self.usage.is_some() && requested.usage.is_none() {
            count += 1;
        }
        if self.documentation.is_some() && requested.documentation.is_none() {
            count += 1;
        }
        if self.target.is_some() && requested.target.is_none() {
            count += 1;
        }
        count += self
            .capabilities
            .iter()
            .filter(|c| !requested.capabilities.has(*c))
            .count();
        count
    }
}

impl std::fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(usage) = self.usage {
            parts.push(format!("usage={}", usage.as_str()));
        }
        if let Some(docs) = self.documentation {
            parts.push(format!("documentation={}", docs.as_str()));
        }
        if let Some(ref target) = self.target {
            parts.push(format!("target={target}"));
        }
        if !self.capabilities.is_empty() {
            parts.push(format!("capabilities={}", self.capabilities));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifold_targets::Capability;

    #[test]
    fn empty_request_matches_anything() {
        let variant = AttributeSet::new()
            .with_usage(Usage::Compile)
            .with_target("jvm");
        assert!(variant.satisfies(&AttributeSet::new()));
    }

    #[test]
    fn requested_attribute_must_be_equal() {
        let variant = AttributeSet::new().with_usage(Usage::Compile);
        assert!(variant.satisfies(&AttributeSet::new().with_usage(Usage::Compile)));
        assert!(!variant.satisfies(&AttributeSet::new().with_usage(Usage::Runtime)));
    }

    #[test]
    fn missing_attribute_fails_request() {
        let variant = AttributeSet::new().with_documentation(DocsKind::Sources);
        assert!(!variant.satisfies(&AttributeSet::new().with_usage(Usage::Compile)));
    }

    #[test]
    fn requested_capabilities_are_subset_matched() {
        let variant = AttributeSet::new()
            .with_capabilities(CapabilitySet::from_caps([Capability::Bytecode]));
        let wanted = AttributeSet::new()
            .with_capabilities(CapabilitySet::from_caps([Capability::Bytecode]));
        let unwanted = AttributeSet::new()
            .with_capabilities(CapabilitySet::from_caps([Capability::NativeBinary]));
        assert!(variant.satisfies(&wanted));
        assert!(!variant.satisfies(&unwanted));
    }

    #[test]
    fn surplus_counts_unrequested_attributes() {
        let request = AttributeSet::new().with_documentation(DocsKind::Sources);
        let common = AttributeSet::new().with_documentation(DocsKind::Sources);
        let platform = AttributeSet::new()
            .with_documentation(DocsKind::Sources)
            .with_target("native-x64")
            .with_capabilities(CapabilitySet::from_caps([Capability::NativeBinary]));
        assert_eq!(common.surplus(&request), 0);
        assert_eq!(platform.surplus(&request), 2);
    }

    #[test]
    fn display_lists_present_attributes() {
        let attrs = AttributeSet::new()
            .with_usage(Usage::Compile)
            .with_target("jvm");
        assert_eq!(attrs.to_string(), "{usage=compile, target=jvm}");
    }
}
