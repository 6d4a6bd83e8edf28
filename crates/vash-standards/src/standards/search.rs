use std::collections::HashSet;

use serde::Serialize;

use super::authority::AuthorityDefinition;
use super::calculator::standard_for;
use super::domain::{BedroomSize, Diagnostic, Location, TierId, VoucherContext, ZipCode};
use super::error::StandardsError;
use super::resolver::{expand_location, TierResolutions};

/// Standard at the voucher size for one ZIP code, shown before listings load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentLimit {
    pub zip_code: ZipCode,
    pub tier: TierId,
    pub bedrooms: BedroomSize,
    pub amount: u32,
}

/// What to ask the listings source for, and what each ZIP code pays.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPlan {
    pub authority: String,
    pub voucher_bedrooms: BedroomSize,
    pub zip_codes: Vec<ZipCode>,
    pub payment_limits: Vec<PaymentLimit>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    pub resolutions: TierResolutions,
}

/// Expands the requested towns and ZIP codes into the ZIP codes to query.
///
/// Unknown locations are reported as diagnostics; the plan still covers every
/// location that resolved. ZIP codes keep the order they were first requested in.
pub fn plan_search(
    authority: &AuthorityDefinition,
    context: &VoucherContext,
) -> Result<SearchPlan, StandardsError> {
    context.validate()?;

    let mut resolutions = TierResolutions::default();
    let mut diagnostics = Vec::new();
    let mut requested = HashSet::new();
    let mut seen = HashSet::new();
    let mut zip_codes = Vec::new();

    for raw in context.locations.iter().filter(|raw| !raw.trim().is_empty()) {
        if !requested.insert(Location::parse(raw)) {
            continue;
        }

        if let Err(err) = resolutions.resolve(authority, raw) {
            if let Some(reason) = err.skip_reason() {
                diagnostics.push(Diagnostic {
                    listing_index: None,
                    listing_id: None,
                    location: Location::parse(raw).as_str().to_string(),
                    reason,
                    detail: err.to_string(),
                });
            }
            continue;
        }

        for zip in expand_location(authority, raw)? {
            if seen.insert(zip.clone()) {
                resolutions.resolve(authority, zip.as_str());
                zip_codes.push(zip);
            }
        }
    }

    let mut payment_limits = Vec::with_capacity(zip_codes.len());
    for zip in &zip_codes {
        let Some(tier) = authority.table.tier_for_zip(zip) else {
            continue;
        };
        payment_limits.push(PaymentLimit {
            zip_code: zip.clone(),
            tier: tier.clone(),
            bedrooms: context.voucher_bedrooms,
            amount: standard_for(authority, tier, context.voucher_bedrooms)?,
        });
    }

    Ok(SearchPlan {
        authority: authority.key.clone(),
        voucher_bedrooms: context.voucher_bedrooms,
        zip_codes,
        payment_limits,
        diagnostics,
        resolutions,
    })
}
