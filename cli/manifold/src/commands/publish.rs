//! `manifold publish` — aggregate modules and write the publication.

use std::path::Path;

use anyhow::Result;

use manifold_modules::{ArtifactLayout, ModuleBuilder};
use manifold_publish::{aggregate, write_publication};

use crate::manifest::ManifoldManifest;

pub fn run(
    project_dir: &Path,
    manifest: &ManifoldManifest,
    out: Option<&str>,
    version: Option<&str>,
    snapshot: bool,
    dry_run: bool,
) -> Result<()> {
    let (matrix, table, store) = manifest.seed()?;

    let mut version = version.unwrap_or(manifest.version()).to_string();
    if snapshot && !version.ends_with("-SNAPSHOT") {
        version.push_str("-SNAPSHOT");
    }

    let builder = ModuleBuilder::new(
        &matrix,
        &table,
        &store,
        manifest.coordinate(),
        version.as_str(),
    )
    .with_layout(ArtifactLayout::new(manifest.out_dir()));
    let (root, targets) = builder.build_all()?;
    let publication = aggregate(root, targets, &matrix)?;

    if dry_run {
        println!(
            "dry run: {} v{version} validated, {} modules would be published",
            publication.root.coordinate,
            publication.module_count()
        );
        return Ok(());
    }

    let repo = project_dir.join(out.unwrap_or("publish"));
    let written = write_publication(&publication, &repo)?;
    for path in &written {
        println!("  wrote {}", path.display());
    }
    println!(
        "published {} v{version} ({} modules) to {}",
        publication.root.coordinate,
        written.len(),
        repo.display()
    );
    Ok(())
}
