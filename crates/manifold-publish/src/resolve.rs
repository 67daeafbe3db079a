//! Consumer-facing resolution.
//!
//! A consumer depends on the root coordinate and declares an attribute set
//! (and optionally the target it is configured for). Resolution selects
//! exactly one variant: either directly on the root, or through an
//! `available-at` pointer to a target module. Ambiguous or unsatisfiable
//! requests fail rather than guessing.

use manifold_modules::{select_variant, AttributeSet, Coordinate, VariantPayload};

use crate::error::{PublishError, Result};
use crate::publication::Publication;

/// The outcome of resolution: the module to fetch and the variant to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Coordinate of the module carrying the artifact.
    pub coordinate: Coordinate,
    /// Selected variant name on that module.
    pub variant: String,
}

/// Resolve a request against a publication's root module.
///
/// When `consumer_target` is given, the request is narrowed to that
/// target's variants; `available-at` pointers are followed to the owning
/// target module.
pub fn resolve(
    publication: &Publication,
    requested: &AttributeSet,
    consumer_target: Option<&str>,
) -> Result<Selection> {
    let mut request = requested.clone();
    if let Some(target) = consumer_target {
        request.target = Some(target.to_string());
    }

    let selected = select_variant(&publication.root.variants, &request)?;

    match &selected.payload {
        VariantPayload::AvailableAt { coordinate, variant } => {
            let module = publication.target_module(coordinate).ok_or_else(|| {
                PublishError::DanglingRedirect {
                    coordinate: coordinate.clone(),
                    variant: variant.clone(),
                }
            })?;
            if !module.has_variant(variant) {
                return Err(PublishError::DanglingRedirect {
                    coordinate: coordinate.clone(),
                    variant: variant.clone(),
                });
            }
            Ok(Selection {
                coordinate: coordinate.clone(),
                variant: variant.clone(),
            })
        }
        _ => Ok(Selection {
            coordinate: publication.root.coordinate.clone(),
            variant: selected.name.clone(),
        }),
    }
}
