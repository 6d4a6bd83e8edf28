//! Payment standard tables and the operations caseworkers run against them.
//!
//! Authorities are loaded once into an [`AuthorityRegistry`] and never mutated,
//! so the registry can be shared across request handlers behind an `Arc`.

pub mod authority;
pub mod calculator;
pub mod domain;
pub mod error;
pub mod qualifier;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod search;
pub mod table;

#[cfg(test)]
mod tests;

pub use authority::{AuthorityDefinition, AuthorityDocument, AuthoritySummary};
pub use calculator::{effective_standard, standard_for, EffectiveStandard};
pub use domain::{
    BedroomSize, Diagnostic, Listing, Location, QualificationResult, SkipReason, TierId,
    VoucherContext, ZipCode,
};
pub use error::StandardsError;
pub use qualifier::{qualify, QualificationReport, QualificationSummary};
pub use registry::{AuthorityRegistry, RegistryError};
pub use resolver::{expand_location, resolve_location, resolve_tier, towns, TierResolutions};
pub use router::{
    standards_router, LocationStandard, QualifyRequest, QualifyResponse, StandardsRequest,
    StandardsResponse,
};
pub use search::{plan_search, PaymentLimit, SearchPlan};
pub use table::{ConfigurationError, RawTierTable, TierTable, TownEntry};
