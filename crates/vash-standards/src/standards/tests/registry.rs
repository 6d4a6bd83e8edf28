use super::common::*;
use crate::config::StandardsConfig;
use crate::standards::{
    AuthorityDefinition, AuthorityRegistry, ConfigurationError, RegistryError, StandardsError,
};

#[test]
fn lookup_accepts_key_county_and_abbreviation() {
    let registry = registry();
    for query in ["sangamon", "Sangamon", "Sangamon County", "sangamon county", "sha"] {
        let authority = registry.get_authority(query).expect("configured county");
        assert_eq!(authority.key, "sangamon", "query {query}");
    }
}

#[test]
fn unknown_county_is_unsupported() {
    let registry = registry();
    match registry.get_authority("Kane") {
        Err(StandardsError::UnsupportedCounty { county }) => assert_eq!(county, "Kane"),
        other => panic!("expected unsupported county, got {other:?}"),
    }
}

#[test]
fn duplicate_keys_are_rejected() {
    let documents = vec![
        document("sangamon", "Sangamon County", "SHA"),
        document("Sangamon", "Sangamon County", "SHA2"),
    ];
    match AuthorityRegistry::from_documents(documents) {
        Err(RegistryError::Configuration(ConfigurationError::DuplicateAuthority { key })) => {
            assert_eq!(key, "sangamon")
        }
        other => panic!("expected duplicate authority, got {other:?}"),
    }
}

#[test]
fn ragged_rate_rows_abort_loading() {
    let mut document = document("sangamon", "Sangamon County", "SHA");
    document.table.tiers[0].rates.truncate(2);
    assert!(matches!(
        AuthorityRegistry::from_documents(vec![document]),
        Err(RegistryError::Configuration(
            ConfigurationError::IncompleteTierRow { .. }
        ))
    ));
}

#[test]
fn ambiguous_towns_abort_loading() {
    let mut document = document("sangamon", "Sangamon County", "SHA");
    document.table.towns[1].tier = None;
    assert!(matches!(
        AuthorityRegistry::from_documents(vec![document]),
        Err(RegistryError::Configuration(
            ConfigurationError::AmbiguousTownTier { .. }
        ))
    ));
}

#[test]
fn bad_effective_date_aborts_loading() {
    let mut document = document("sangamon", "Sangamon County", "SHA");
    document.effective_date = "01/01/2026".to_string();
    assert!(matches!(
        AuthorityDefinition::from_document(document),
        Err(ConfigurationError::InvalidEffectiveDate { .. })
    ));
}

#[test]
fn authorities_are_listed_in_key_order() {
    let registry = AuthorityRegistry::from_documents(vec![
        document("will", "Will County", "HAJ"),
        document("cook", "Cook County", "HACC"),
    ])
    .expect("valid documents");

    let keys: Vec<_> = registry.authorities().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["cook", "will"]);

    let summary = registry
        .get_authority("HAJ")
        .expect("configured")
        .summary();
    assert_eq!(summary.town_count, 2);
    assert_eq!(summary.zip_count, 3);
    assert_eq!(summary.tier_count, 2);
}

#[test]
fn builtin_registry_covers_the_four_counties() {
    let registry = AuthorityRegistry::builtin().expect("bundled documents are valid");
    assert_eq!(registry.len(), 4);
    for county in ["Cook", "DuPage", "Lake", "Will"] {
        assert!(registry.get_authority(county).is_ok(), "{county}");
    }
}

#[test]
fn config_without_directory_uses_builtin_set() {
    let registry =
        AuthorityRegistry::from_config(&StandardsConfig::default()).expect("builtin set");
    assert_eq!(registry.get_authority("HACC").expect("cook").key, "cook");
}

#[test]
fn directory_without_documents_is_an_error() {
    let dir = std::env::temp_dir().join(format!("vash-empty-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");

    let result = AuthorityRegistry::from_dir(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(matches!(result, Err(RegistryError::Empty { .. })));
}

#[test]
fn directory_documents_are_loaded() {
    let source = concat!(env!("CARGO_MANIFEST_DIR"), "/data/authorities");
    let registry = AuthorityRegistry::from_dir(source).expect("bundled directory loads");
    assert_eq!(registry.len(), 4);
}
