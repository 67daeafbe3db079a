//! `manifold check` — validate configuration and dry-run binding.

use anyhow::Result;

use manifold_bind::Binder;

use crate::manifest::ManifoldManifest;

/// Seed the pipeline from the manifest and bind every leaf target's
/// closure without building modules.
pub fn run(manifest: &ManifoldManifest) -> Result<()> {
    let (matrix, table, store) = manifest.seed()?;

    let mut binder = Binder::new(&matrix, &table, &store);
    binder.validate_store()?;

    let leaves: Vec<_> = matrix
        .leaves()
        .into_iter()
        .filter(|t| !t.is_root())
        .collect();
    for target in &leaves {
        let bound = binder.bind_closure(&target.name, table.names())?;
        println!("  {:<20} {} declarations bound", target.name, bound.len());
    }

    let stats = binder.stats();
    println!();
    println!(
        "ok: {} leaf targets, {} declarations ({} lookups memoized)",
        leaves.len(),
        table.len(),
        stats.hits
    );
    Ok(())
}
