use serde::Serialize;

use super::authority::AuthorityDefinition;
use super::domain::{BedroomSize, TierId};
use super::error::StandardsError;
use super::table::TierTable;

/// Outcome of the lesser-of rule for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveStandard {
    /// `min(voucher, unit)`.
    pub bedrooms: BedroomSize,
    /// Size actually read from the table after clamping to the ceiling.
    pub table_bedrooms: BedroomSize,
    pub amount: u32,
}

/// Applies the lesser-of rule: the standard for `min(voucher, unit)` bedrooms.
///
/// An unknown unit size is an error; defaulting to the voucher size would
/// overstate the standard for units that may be smaller. Sizes above the table
/// ceiling are paid at the ceiling.
pub fn effective_standard(
    authority: &AuthorityDefinition,
    tier: &TierId,
    voucher_bedrooms: BedroomSize,
    unit_bedrooms: Option<BedroomSize>,
) -> Result<EffectiveStandard, StandardsError> {
    let unit_bedrooms = unit_bedrooms.ok_or(StandardsError::IndeterminateBedroomSize)?;
    let bedrooms = voucher_bedrooms.min(unit_bedrooms);
    let amount = standard_for(authority, tier, bedrooms)?;

    Ok(EffectiveStandard {
        bedrooms,
        table_bedrooms: clamp_to_ceiling(&authority.table, bedrooms),
        amount,
    })
}

/// Table amount for a single bedroom size, clamped to the ceiling.
pub fn standard_for(
    authority: &AuthorityDefinition,
    tier: &TierId,
    bedrooms: BedroomSize,
) -> Result<u32, StandardsError> {
    authority
        .table
        .rate(tier, bedrooms)
        .ok_or_else(|| StandardsError::UnknownTier {
            authority: authority.abbreviation.clone(),
            tier: tier.clone(),
        })
}

fn clamp_to_ceiling(table: &TierTable, bedrooms: BedroomSize) -> BedroomSize {
    bedrooms.min(table.ceiling())
}
