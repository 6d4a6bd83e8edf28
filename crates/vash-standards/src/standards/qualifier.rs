use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use super::authority::AuthorityDefinition;
use super::calculator::effective_standard;
use super::domain::{Diagnostic, Listing, QualificationResult, SkipReason, VoucherContext};
use super::error::StandardsError;
use super::resolver::{resolve_tier, TierResolutions};

/// Results and skipped listings from one qualification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualificationReport {
    pub results: Vec<QualificationResult>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualificationSummary {
    pub processed: usize,
    pub qualifying: usize,
    pub non_qualifying: usize,
    pub skipped: usize,
}

impl QualificationReport {
    pub fn qualifying(&self) -> impl Iterator<Item = &QualificationResult> {
        self.results.iter().filter(|result| result.qualifies)
    }

    pub fn summary(&self) -> QualificationSummary {
        let qualifying = self.qualifying().count();
        QualificationSummary {
            processed: self.results.len(),
            qualifying,
            non_qualifying: self.results.len() - qualifying,
            skipped: self.diagnostics.len(),
        }
    }
}

/// Compares every listing's rent against its location's effective standard.
///
/// Listings whose location has no tier, whose unit size is unknown, or whose
/// size was not searched are reported in `diagnostics` and the rest of the batch
/// is still processed. Results are ordered by largest margin first, then lowest
/// rent, then input position.
pub fn qualify(
    authority: &AuthorityDefinition,
    listings: &[Listing],
    context: &VoucherContext,
    resolutions: &TierResolutions,
) -> QualificationReport {
    let mut results = Vec::with_capacity(listings.len());
    let mut diagnostics = Vec::new();

    for (index, listing) in listings.iter().enumerate() {
        match qualify_listing(authority, index, listing, context, resolutions) {
            Ok(result) => results.push(result),
            Err(diagnostic) => {
                debug!(
                    listing = index,
                    location = %diagnostic.location,
                    reason = ?diagnostic.reason,
                    "listing skipped"
                );
                diagnostics.push(diagnostic);
            }
        }
    }

    results.sort_by(rank);

    QualificationReport {
        results,
        diagnostics,
    }
}

fn qualify_listing(
    authority: &AuthorityDefinition,
    index: usize,
    listing: &Listing,
    context: &VoucherContext,
    resolutions: &TierResolutions,
) -> Result<QualificationResult, Diagnostic> {
    let tier = match resolutions.get(&listing.location) {
        Some(outcome) => outcome.clone(),
        None => resolve_tier(authority, &listing.location),
    }
    .map_err(|err| diagnostic(index, listing, &err))?;

    let unit_bedrooms = listing
        .bedrooms
        .ok_or_else(|| diagnostic(index, listing, &StandardsError::IndeterminateBedroomSize))?;

    if !context.search_bedrooms.is_empty() && !context.search_bedrooms.contains(&unit_bedrooms) {
        return Err(Diagnostic {
            listing_index: Some(index),
            listing_id: listing.listing_id.clone(),
            location: listing.location.clone(),
            reason: SkipReason::OutsideSearchedSizes,
            detail: format!("{} unit is outside the searched sizes", unit_bedrooms.label()),
        });
    }

    let standard = effective_standard(
        authority,
        &tier,
        context.voucher_bedrooms,
        Some(unit_bedrooms),
    )
    .map_err(|err| diagnostic(index, listing, &err))?;

    let margin = i64::from(standard.amount) - i64::from(listing.rent);

    Ok(QualificationResult {
        listing_index: index,
        listing_id: listing.listing_id.clone(),
        address: listing.address.clone(),
        location: listing.location.clone(),
        tier,
        unit_bedrooms,
        effective_bedrooms: standard.bedrooms,
        effective_standard: standard.amount,
        rent: listing.rent,
        qualifies: listing.rent <= standard.amount,
        margin,
    })
}

fn diagnostic(index: usize, listing: &Listing, err: &StandardsError) -> Diagnostic {
    Diagnostic {
        listing_index: Some(index),
        listing_id: listing.listing_id.clone(),
        location: listing.location.clone(),
        reason: err.skip_reason().unwrap_or(SkipReason::UnknownLocation),
        detail: err.to_string(),
    }
}

fn rank(a: &QualificationResult, b: &QualificationResult) -> Ordering {
    b.margin
        .cmp(&a.margin)
        .then(a.rent.cmp(&b.rent))
        .then(a.listing_index.cmp(&b.listing_index))
}
