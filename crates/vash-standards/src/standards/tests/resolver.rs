use super::common::*;
use crate::standards::{
    expand_location, resolve_tier, towns, Location, StandardsError, TierId, TierResolutions,
};

#[test]
fn resolves_zip_codes_and_towns() {
    let authority = authority();
    assert_eq!(resolve_tier(&authority, "60003"), Ok(TierId::new("T2")));
    assert_eq!(resolve_tier(&authority, " springfield "), Ok(TierId::new("T1")));
    assert_eq!(resolve_tier(&authority, "SHELBYVILLE"), Ok(TierId::new("T2")));
}

#[test]
fn zip_plus_four_and_short_zips_are_normalized() {
    let authority = authority();
    assert_eq!(resolve_tier(&authority, "60001-4410"), Ok(TierId::new("T1")));
    assert!(matches!(
        resolve_tier(&authority, "6001"),
        Err(StandardsError::UnknownLocation { location, .. }) if location == "06001"
    ));
}

#[test]
fn malformed_zip_is_treated_as_unknown_town() {
    let authority = authority();
    match resolve_tier(&authority, "60000Z") {
        Err(StandardsError::UnknownLocation {
            authority,
            location,
        }) => {
            assert_eq!(authority, "SHA");
            assert_eq!(location, "60000Z");
        }
        other => panic!("expected unknown location, got {other:?}"),
    }
}

#[test]
fn batch_resolution_keeps_good_locations_past_a_typo() {
    let authority = authority();
    let resolutions =
        TierResolutions::resolve_all(&authority, ["60001", "60002", "6000X", "60003", "60001"]);

    assert_eq!(resolutions.len(), 4);
    assert_eq!(resolutions.resolved().count(), 3);
    let unresolved: Vec<_> = resolutions.unresolved().map(|(loc, _)| loc.clone()).collect();
    assert_eq!(unresolved, vec![Location::Town("6000X".to_string())]);
    assert_eq!(resolutions.get("60003"), Some(&Ok(TierId::new("T2"))));
}

#[test]
fn towns_expand_to_their_zip_codes() {
    let authority = authority();
    let zips = expand_location(&authority, "Shelbyville").expect("known town");
    let zips: Vec<&str> = zips.iter().map(|zip| zip.as_str()).collect();
    assert_eq!(zips, vec!["60003", "60002"]);

    let single = expand_location(&authority, "60002").expect("known zip");
    assert_eq!(single.len(), 1);

    assert!(expand_location(&authority, "60099").is_err());
    assert!(expand_location(&authority, "Capital City").is_err());
}

#[test]
fn town_names_are_listed_alphabetically() {
    let authority = authority();
    assert_eq!(towns(&authority), vec!["Shelbyville", "Springfield"]);
}
