use super::common::*;
use crate::standards::{qualify, AuthorityRegistry, SkipReason, TierResolutions};

#[test]
fn rent_equal_to_standard_qualifies() {
    let authority = authority();
    let listings = vec![
        listing("at", "60001", 1500, Some(2)),
        listing("over", "60001", 1501, Some(2)),
    ];
    let report = qualify(
        &authority,
        &listings,
        &context(2, &[2], &["60001"]),
        &TierResolutions::default(),
    );

    assert_eq!(report.results.len(), 2);
    let at = &report.results[0];
    assert_eq!(at.listing_id.as_deref(), Some("at"));
    assert!(at.qualifies);
    assert_eq!(at.margin, 0);

    let over = &report.results[1];
    assert!(!over.qualifies);
    assert_eq!(over.margin, -1);
}

#[test]
fn unknown_location_excludes_only_its_listing() {
    let authority = authority();
    let listings = vec![
        listing("a", "60001", 1400, Some(2)),
        listing("b", "60000Z", 900, Some(2)),
        listing("c", "Springfield", 1300, Some(1)),
    ];
    let context = context(2, &[1, 2], &["60001", "60000Z"]);
    let resolutions = TierResolutions::resolve_all(&authority, &context.locations);

    let report = qualify(&authority, &listings, &context, &resolutions);

    assert_eq!(report.results.len(), 2);
    assert!(report
        .results
        .iter()
        .all(|result| result.location != "60000Z"));
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.reason, SkipReason::UnknownLocation);
    assert_eq!(diagnostic.location, "60000Z");
    assert_eq!(diagnostic.listing_index, Some(1));
}

#[test]
fn unknown_bedroom_count_skips_one_listing() {
    let authority = authority();
    let listings = vec![
        listing("first", "60001", 1100, Some(1)),
        listing("second", "60001", 1000, None),
        listing("third", "60003", 1600, Some(2)),
    ];

    let report = qualify(
        &authority,
        &listings,
        &context(2, &[1, 2], &["60001", "60003"]),
        &TierResolutions::default(),
    );

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(
        report.diagnostics[0].reason,
        SkipReason::IndeterminateBedroomSize
    );
    assert_eq!(report.diagnostics[0].listing_id.as_deref(), Some("second"));
}

#[test]
fn sizes_outside_the_search_are_reported() {
    let authority = authority();
    let listings = vec![
        listing("two", "60001", 1400, Some(2)),
        listing("studio", "60001", 800, Some(0)),
    ];

    let report = qualify(
        &authority,
        &listings,
        &context(2, &[2], &["60001"]),
        &TierResolutions::default(),
    );

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.diagnostics[0].reason, SkipReason::OutsideSearchedSizes);

    let unfiltered = qualify(
        &authority,
        &listings,
        &context(2, &[], &["60001"]),
        &TierResolutions::default(),
    );
    assert_eq!(unfiltered.results.len(), 2);
}

#[test]
fn results_rank_by_margin_then_rent_then_position() {
    let authority = authority();
    let listings = vec![
        listing("tight", "60001", 1450, Some(2)),
        listing("roomy", "60001", 1100, Some(2)),
        listing("small", "60001", 1050, Some(1)),
        listing("tight-twin", "60001", 1450, Some(2)),
        listing("over", "60003", 1700, Some(2)),
    ];

    let report = qualify(
        &authority,
        &listings,
        &context(2, &[1, 2], &["60001"]),
        &TierResolutions::default(),
    );

    let order: Vec<_> = report
        .results
        .iter()
        .map(|result| result.listing_id.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(order, vec!["roomy", "small", "tight", "tight-twin", "over"]);
}

#[test]
fn qualifying_twice_gives_the_same_report() {
    let authority = authority();
    let listings = vec![
        listing("a", "60002", 1500, Some(3)),
        listing("b", "Shelbyville", 1300, Some(1)),
        listing("c", "nowhere", 100, Some(1)),
        listing("d", "60003", 900, None),
    ];
    let context = context(2, &[1, 2, 3], &["Springfield", "Shelbyville"]);
    let resolutions = TierResolutions::resolve_all(&authority, &context.locations);

    let first = qualify(&authority, &listings, &context, &resolutions);
    let second = qualify(&authority, &listings, &context, &resolutions);
    assert_eq!(first, second);
}

#[test]
fn summary_counts_each_outcome() {
    let authority = authority();
    let listings = vec![
        listing("ok", "60001", 1000, Some(1)),
        listing("high", "60001", 2000, Some(1)),
        listing("unknown", "99999", 1000, Some(1)),
    ];

    let report = qualify(
        &authority,
        &listings,
        &context(1, &[1], &["60001"]),
        &TierResolutions::default(),
    );
    let summary = report.summary();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.qualifying, 1);
    assert_eq!(summary.non_qualifying, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(report.qualifying().count(), 1);
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthorityRegistry>();

    let registry = std::sync::Arc::new(registry());
    let handles: Vec<_> = (0..4u32)
        .map(|offset| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                let authority = registry.get_authority("sangamon").expect("configured");
                let listings = vec![listing("x", "60001", 1400 + offset, Some(2))];
                qualify(
                    authority,
                    &listings,
                    &context(2, &[2], &["60001"]),
                    &TierResolutions::default(),
                )
                .summary()
                .qualifying
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread completes"), 1);
    }
}
