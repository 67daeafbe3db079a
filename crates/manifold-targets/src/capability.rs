//! Capability flags for target platforms.
//!
//! A capability describes what kind of build output a target can produce.
//! The flags drive variant construction: a target whose compiled artifact is
//! consumed differently at compile time and at run time (bytecode) gets a
//! separate `runtime` variant, while targets whose compile and run artifacts
//! are identical do not.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single capability of a target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Produces a native binary (static library or object archive).
    NativeBinary,
    /// Produces bytecode loaded by a virtual machine.
    Bytecode,
    /// Produces a script bundle for browser consumption.
    BrowserBundle,
    /// Produces a module for an embedded script runtime.
    ScriptRuntime,
}

impl Capability {
    /// Stable kebab-case name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::NativeBinary => "native-binary",
            Capability::Bytecode => "bytecode",
            Capability::BrowserBundle => "browser-bundle",
            Capability::ScriptRuntime => "script-runtime",
        }
    }

    /// Parse a kebab-case capability name.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "native-binary" => Some(Capability::NativeBinary),
            "bytecode" => Some(Capability::Bytecode),
            "browser-bundle" => Some(Capability::BrowserBundle),
            "script-runtime" => Some(Capability::ScriptRuntime),
            _ => None,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ordered set of capabilities.
///
/// Ordered so that serialized output and derived attribute sets are stable
/// across rebuilds.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// Create an empty capability set (the common/neutral target).
    pub fn empty() -> Self {
        CapabilitySet(BTreeSet::new())
    }

    /// Create a set from a list of capabilities.
    pub fn from_caps(caps: impl IntoIterator<Item = Capability>) -> Self {
        CapabilitySet(caps.into_iter().collect())
    }

    /// Whether the set contains the given capability.
    pub fn has(&self, cap: Capability) -> bool {
        self.0.contains(&cap)
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of capabilities in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over capabilities in stable order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Whether this target's compile-time and run-time artifacts differ.
    ///
    /// Bytecode targets ship one artifact for compilation against the API
    /// and another for execution; everything else consumes the same artifact
    /// in both roles.
    pub fn distinguishes_runtime(&self) -> bool {
        self.has(Capability::Bytecode)
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        CapabilitySet(iter.into_iter().collect())
    }
}

impl std::fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|c| c.as_str()).collect();
        write!(f, "{}", names.join("+"))
    }
}
