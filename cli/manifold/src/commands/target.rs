//! `manifold target` — target matrix inspection.

use anyhow::Result;

use manifold_targets::{Target, TargetMatrix};

use crate::manifest::ManifoldManifest;

/// List all targets with capabilities and parents.
pub fn list(manifest: &ManifoldManifest) -> Result<()> {
    let matrix = manifest.build_matrix()?;

    println!("Targets:");
    for target in matrix.all() {
        let capabilities = if target.capabilities.is_empty() {
            "-".to_string()
        } else {
            target.capabilities.to_string()
        };
        let parent = target.parent.as_deref().unwrap_or("(root)");
        println!("  {:<20} {:<28} {parent}", target.name, capabilities);
    }
    Ok(())
}

/// Show the target tree.
pub fn tree(manifest: &ManifoldManifest) -> Result<()> {
    let matrix = manifest.build_matrix()?;
    print!("{}", format_tree(&matrix)?);
    Ok(())
}

/// Format the target matrix as a human-readable ASCII tree:
/// ```text
/// common
/// ├── jvm [bytecode]
/// └── non-jvm
///     ├── js-browser [browser-bundle]
///     └── native-x64 [native-binary]
/// ```
pub fn format_tree(matrix: &TargetMatrix) -> Result<String> {
    let root = matrix.require_root()?;
    let mut out = format!("{}\n", label(root));

    let children = matrix.children(&root.name);
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        format_node(&mut out, matrix, child, "", i == count - 1);
    }
    Ok(out)
}

fn format_node(out: &mut String, matrix: &TargetMatrix, target: &Target, prefix: &str, is_last: bool) {
    let connector = if is_last { "└── " } else { "├── " };
    out.push_str(&format!("{prefix}{connector}{}\n", label(target)));

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let children = matrix.children(&target.name);
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        format_node(out, matrix, child, &child_prefix, i == count - 1);
    }
}

fn label(target: &Target) -> String {
    if target.capabilities.is_empty() {
        target.name.clone()
    } else {
        format!("{} [{}]", target.name, target.capabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifold_targets::{Capability, CapabilitySet};

    #[test]
    fn tree_shows_nesting_and_capabilities() {
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

        let rendered = format_tree(&matrix).unwrap();
        assert_eq!(
            rendered,
            "common\n\
             ├── jvm [bytecode]\n\
             └── non-jvm\n\
             \u{20}   └── native-x64 [native-binary]\n"
        );
    }

    #[test]
    fn empty_matrix_tree_fails() {
        let matrix = TargetMatrix::new();
        assert!(format_tree(&matrix).is_err());
    }
}
