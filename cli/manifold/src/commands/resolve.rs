//! `manifold resolve` — answer a consumer request against the publication.

use anyhow::{bail, Result};

use manifold_modules::{
    ArtifactLayout, AttributeSet, DocsKind, ModuleBuilder, Usage,
};
use manifold_publish::aggregate;

use crate::manifest::ManifoldManifest;

pub fn run(
    manifest: &ManifoldManifest,
    usage: Option<&str>,
    documentation: Option<&str>,
    target: Option<&str>,
) -> Result<()> {
    // An unconstrained request would match every variant and fall through
    // to whichever carries the fewest attributes, which is a guess, not a
    // resolution.
    if usage.is_none() && documentation.is_none() {
        bail!("specify at least one of --usage or --documentation");
    }

    let (matrix, table, store) = manifest.seed()?;

    let builder = ModuleBuilder::new(
        &matrix,
        &table,
        &store,
        manifest.coordinate(),
        manifest.version(),
    )
    .with_layout(ArtifactLayout::new(manifest.out_dir()));
    let (root, targets) = builder.build_all()?;
    let publication = aggregate(root, targets, &matrix)?;

    let mut request = AttributeSet::new();
    if let Some(name) = usage {
        match Usage::parse(name) {
            Some(parsed) => request = request.with_usage(parsed),
            None => bail!("unknown usage '{name}' (expected compile or runtime)"),
        }
    }
    if let Some(name) = documentation {
        match DocsKind::parse(name) {
            Some(parsed) => request = request.with_documentation(parsed),
            None => bail!("unknown documentation kind '{name}' (expected sources or docs)"),
        }
    }

    let selection = manifold_publish::resolve(&publication, &request, target)?;
    println!(
        "{} v{} (variant '{}')",
        selection.coordinate,
        publication.root.version,
        selection.variant
    );
    Ok(())
}
