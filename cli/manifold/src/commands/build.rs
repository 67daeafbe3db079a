//! `manifold build` — construct per-target modules and the root module.

use anyhow::Result;

use manifold_modules::{ArtifactLayout, ModuleBuilder};

use crate::manifest::ManifoldManifest;

pub fn run(
    manifest: &ManifoldManifest,
    version: Option<&str>,
    out: Option<&str>,
) -> Result<()> {
    let (matrix, table, store) = manifest.seed()?;
    let version = version.unwrap_or(manifest.version());

    let builder = ModuleBuilder::new(&matrix, &table, &store, manifest.coordinate(), version)
        .with_layout(ArtifactLayout::new(out.unwrap_or(manifest.out_dir())));
    let (root, targets) = builder.build_all()?;

    println!("{} v{}", root.coordinate, root.version);
    for module in &targets {
        let variants: Vec<&str> = module.variants.iter().map(|v| v.name.as_str()).collect();
        println!("  {:<32} {}", module.coordinate.to_string(), variants.join(", "));
    }
    println!();
    println!("built {} modules", targets.len() + 1);
    Ok(())
}
