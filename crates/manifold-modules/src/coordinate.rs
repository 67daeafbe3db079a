//! Artifact coordinates.
//!
//! A coordinate is the externally addressable name of a module:
//! `group:name`, e.g. `org.sample:anno`. Target module coordinates are
//! derived from the root coordinate as `<root>-<target-name>`; the
//! derivation is deterministic so re-publication overwrites rather than
//! duplicates.

use serde::{Deserialize, Serialize};

use crate::error::{ModuleError, Result};

/// A `group:name` artifact coordinate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Coordinate {
    /// Group identifier (e.g., "org.sample").
    pub group: String,
    /// Artifact name (e.g., "anno").
    pub name: String,
}

impl Coordinate {
    /// Create a coordinate.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Coordinate {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Parse a `group:name` string.
    pub fn parse(input: &str) -> Result<Self> {
        match input.split_once(':') {
            Some((group, name)) if !group.is_empty() && !name.is_empty() && !name.contains(':') => {
                Ok(Coordinate::new(group, name))
            }
            _ => Err(ModuleError::InvalidCoordinate {
                input: input.to_string(),
            }),
        }
    }

    /// Derive the coordinate of a target module: `<root>-<target-name>`.
    pub fn for_target(&self, target: &str) -> Coordinate {
        Coordinate {
            group: self.group.clone(),
            name: format!("{}-{target}", self.name),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let c = Coordinate::parse("org.sample:anno").unwrap();
        assert_eq!(c.group, "org.sample");
        assert_eq!(c.name, "anno");
        assert_eq!(c.to_string(), "org.sample:anno");
    }

    #[test]
    fn target_derivation_is_deterministic() {
        let root = Coordinate::new("org.sample", "anno");
        let a = root.for_target("native-x64");
        let b = root.for_target("native-x64");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "org.sample:anno-native-x64");
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "nocolon", ":name", "group:", "a:b:c"] {
            assert!(Coordinate::parse(bad).is_err(), "accepted {bad:?}");
        }
    }
}
