//! Attribute-based variant selection.
//!
//! Given a set of candidate variants and a requested attribute set, select
//! exactly one variant or fail. Eligibility requires every requested
//! attribute to be present and equal; among eligible variants the one
//! carrying the fewest attributes beyond the request wins, so a common
//! variant beats a platform-specific one unless the platform was asked for.
//! A remaining tie is an explicit ambiguity error, never a guess.

use crate::attributes::AttributeSet;
use crate::error::{ModuleError, Result};
use crate::variant::Variant;

/// Select exactly one variant matching the requested attributes.
pub fn select_variant<'a>(variants: &'a [Variant], requested: &AttributeSet) -> Result<&'a Variant> {
    let eligible: Vec<&Variant> = variants
        .iter()
        .filter(|v| v.attributes.satisfies(requested))
        .collect();

    if eligible.is_empty() {
        return Err(ModuleError::NoMatchingVariant {
            requested: requested.to_string(),
        });
    }

    let best = eligible
        .iter()
        .map(|v| v.attributes.surplus(requested))
        .min()
        .unwrap_or(0);
    let closest: Vec<&Variant> = eligible
        .into_iter()
        .filter(|v| v.attributes.surplus(requested) == best)
        .collect();

    match closest.as_slice() {
        &[single] => Ok(single),
        _ => Err(ModuleError::AmbiguousVariant {
            requested: requested.to_string(),
            candidates: closest.iter().map(|v| v.name.clone()).collect(),
        }),
    }
}
