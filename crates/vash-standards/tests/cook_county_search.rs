use vash_standards::listings::from_rentcast_json;
use vash_standards::standards::{
    plan_search, qualify, resolve_tier, AuthorityRegistry, BedroomSize, SkipReason, TierId,
    VoucherContext,
};

fn registry() -> AuthorityRegistry {
    AuthorityRegistry::builtin().expect("bundled authority documents are valid")
}

#[test]
fn cook_county_resolves_to_hacc() {
    let registry = registry();
    for query in ["Cook", "Cook County", "cook county", "HACC"] {
        let authority = registry.get_authority(query).expect("cook is configured");
        assert_eq!(authority.abbreviation, "HACC");
    }
    assert!(registry.get_authority("Kane County").is_err());
}

#[test]
fn alsip_zip_and_town_share_tier_c() {
    let registry = registry();
    let cook = registry.get_authority("cook").expect("cook");

    assert_eq!(resolve_tier(cook, "60803"), Ok(TierId::new("C")));
    assert_eq!(resolve_tier(cook, "alsip"), Ok(TierId::new("C")));
    assert_eq!(resolve_tier(cook, "Oak Lawn"), Ok(TierId::new("B")));
}

#[test]
fn two_bedroom_voucher_search_in_alsip() {
    let registry = registry();
    let cook = registry.get_authority("cook").expect("cook");
    let context = VoucherContext::new(
        BedroomSize::new(2),
        [BedroomSize::new(1), BedroomSize::new(2), BedroomSize::new(3)],
        ["Alsip"],
    );

    let plan = plan_search(cook, &context).expect("valid request");
    assert_eq!(plan.zip_codes.len(), 1);
    assert_eq!(plan.payment_limits[0].amount, 1400);

    let response = r#"[
        {"id": "two-at-limit", "zipCode": "60803", "price": 1400, "bedrooms": 2},
        {"id": "three-lesser-of", "zipCode": "60803", "price": 1399.5, "bedrooms": 3},
        {"id": "one-over", "zipCode": "60803", "price": 1250, "bedrooms": 1},
        {"id": "no-size", "zipCode": "60803", "price": 1000},
        {"id": "no-price", "zipCode": "60803", "bedrooms": 2}
    ]"#;
    let import = from_rentcast_json(response.as_bytes()).expect("valid response");
    assert_eq!(import.rejected.len(), 1);
    assert_eq!(import.rejected[0].reason, SkipReason::MalformedListing);

    let report = qualify(cook, &import.listings, &context, &plan.resolutions);
    let summary = report.summary();
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.qualifying, 2);
    assert_eq!(summary.skipped, 1);

    let three = report
        .results
        .iter()
        .find(|result| result.listing_id.as_deref() == Some("three-lesser-of"))
        .expect("three bedroom processed");
    assert_eq!(three.effective_bedrooms, BedroomSize::new(2));
    assert_eq!(three.effective_standard, 1400);
    assert_eq!(three.rent, 1400);
    assert!(three.qualifies);

    let one = report
        .results
        .iter()
        .find(|result| result.listing_id.as_deref() == Some("one-over"))
        .expect("one bedroom processed");
    assert_eq!(one.effective_standard, 1220);
    assert!(!one.qualifies);
}

#[test]
fn oak_park_town_expands_to_its_zip_codes() {
    let registry = registry();
    let cook = registry.get_authority("cook").expect("cook");
    let context = VoucherContext::new(
        BedroomSize::new(1),
        [BedroomSize::new(1)],
        ["Oak Park", "60302", "60000Z"],
    );

    let plan = plan_search(cook, &context).expect("valid request");
    let zips: Vec<&str> = plan.zip_codes.iter().map(|zip| zip.as_str()).collect();
    assert_eq!(zips, vec!["60301", "60302", "60304", "60305"]);
    assert!(plan
        .payment_limits
        .iter()
        .all(|limit| limit.amount == 1555));
    assert_eq!(plan.diagnostics.len(), 1);
    assert_eq!(plan.diagnostics[0].location, "60000Z");
}

#[test]
fn every_builtin_authority_publishes_a_summary() {
    let registry = registry();
    let summaries: Vec<_> = registry.authorities().map(|a| a.summary()).collect();
    let keys: Vec<&str> = summaries.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["cook", "dupage", "lake", "will"]);
    assert!(summaries
        .iter()
        .all(|summary| summary.town_count > 0 && summary.zip_count > 0));
}
