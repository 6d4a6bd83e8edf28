use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::standards::table::{RawTierRow, RawTierTable, RawTown};
use crate::standards::{
    standards_router, AuthorityDefinition, AuthorityDocument, AuthorityRegistry, BedroomSize,
    Listing, TierTable, VoucherContext,
};

/// Rates: studio 1000, 1BR 1200, 2BR 1500, 3BR 1800 in tier T1.
pub(super) fn raw_table() -> RawTierTable {
    RawTierTable {
        bedroom_ceiling: 3,
        tiers: vec![
            RawTierRow {
                tier: "T1".to_string(),
                rates: vec![1000, 1200, 1500, 1800],
            },
            RawTierRow {
                tier: "T2".to_string(),
                rates: vec![1100, 1350, 1650, 1950],
            },
        ],
        zip_codes: BTreeMap::from([
            ("60001".to_string(), "T1".to_string()),
            ("60002".to_string(), "T1".to_string()),
            ("60003".to_string(), "T2".to_string()),
        ]),
        towns: vec![
            RawTown {
                name: "Springfield".to_string(),
                tier: None,
                zip_codes: vec!["60001".to_string(), "60002".to_string()],
            },
            RawTown {
                name: "Shelbyville".to_string(),
                tier: Some("T2".to_string()),
                zip_codes: vec!["60003".to_string(), "60002".to_string()],
            },
        ],
    }
}

pub(super) fn authority() -> AuthorityDefinition {
    AuthorityDefinition {
        key: "sangamon".to_string(),
        county: "Sangamon County".to_string(),
        name: "Springfield Housing Authority".to_string(),
        abbreviation: "SHA".to_string(),
        effective_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
        source_url: "https://example.org/payment-standards".to_string(),
        explainer: String::new(),
        table: TierTable::from_raw("SHA", raw_table()).expect("valid table"),
    }
}

pub(super) fn document(key: &str, county: &str, abbreviation: &str) -> AuthorityDocument {
    AuthorityDocument {
        key: key.to_string(),
        county: county.to_string(),
        authority: format!("{county} Housing Authority"),
        abbreviation: abbreviation.to_string(),
        effective_date: "2026-01-01".to_string(),
        source_url: "https://example.org".to_string(),
        explainer: String::new(),
        table: raw_table(),
    }
}

pub(super) fn registry() -> AuthorityRegistry {
    AuthorityRegistry::new([authority()]).expect("single authority")
}

pub(super) fn size(bedrooms: u8) -> BedroomSize {
    BedroomSize::new(bedrooms)
}

pub(super) fn context(voucher: u8, sizes: &[u8], locations: &[&str]) -> VoucherContext {
    VoucherContext::new(
        size(voucher),
        sizes.iter().copied().map(size),
        locations.iter().copied(),
    )
}

pub(super) fn listing(id: &str, location: &str, rent: u32, bedrooms: Option<u8>) -> Listing {
    let mut listing = Listing::new(location, rent, bedrooms.map(size));
    listing.listing_id = Some(id.to_string());
    listing
}

pub(super) fn router() -> axum::Router {
    standards_router(Arc::new(registry()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
