use super::domain::{SkipReason, TierId};

/// Request- and item-level failures raised by the engine.
///
/// `UnsupportedCounty` and `InvalidRequest` abort a whole request. The remaining
/// variants describe a single location or listing and are turned into
/// diagnostics by batch operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StandardsError {
    #[error("county '{county}' is not served by a configured housing authority")]
    UnsupportedCounty { county: String },
    #[error("location '{location}' has no payment standard tier under {authority}")]
    UnknownLocation { authority: String, location: String },
    #[error("unit bedroom count is unknown; the lesser-of rule cannot be applied")]
    IndeterminateBedroomSize,
    #[error("tier '{tier}' is not defined for {authority}")]
    UnknownTier { authority: String, tier: TierId },
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

impl StandardsError {
    /// Diagnostic reason for per-item failures; `None` for request-level errors.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            StandardsError::UnknownLocation { .. } => Some(SkipReason::UnknownLocation),
            StandardsError::IndeterminateBedroomSize => Some(SkipReason::IndeterminateBedroomSize),
            StandardsError::UnsupportedCounty { .. }
            | StandardsError::UnknownTier { .. }
            | StandardsError::InvalidRequest(_) => None,
        }
    }
}
