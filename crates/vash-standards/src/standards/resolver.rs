use std::collections::BTreeMap;

use super::authority::AuthorityDefinition;
use super::domain::{Location, TierId, ZipCode};
use super::error::StandardsError;

/// Maps a ZIP code or town name to the authority's tier.
///
/// ZIP-shaped input is only looked up among ZIP keys and everything else among
/// town keys, so a town that happens to share a ZIP's spelling cannot shadow it.
pub fn resolve_tier(
    authority: &AuthorityDefinition,
    location: &str,
) -> Result<TierId, StandardsError> {
    resolve_location(authority, &Location::parse(location))
}

pub fn resolve_location(
    authority: &AuthorityDefinition,
    location: &Location,
) -> Result<TierId, StandardsError> {
    let tier = match location {
        Location::Zip(zip) => authority.table.tier_for_zip(zip),
        Location::Town(town) => authority.table.town(town).map(|entry| &entry.tier),
    };

    tier.cloned().ok_or_else(|| unknown_location(authority, location))
}

/// ZIP codes covered by a location: a ZIP expands to itself, a town to its ZIP list.
pub fn expand_location(
    authority: &AuthorityDefinition,
    location: &str,
) -> Result<Vec<ZipCode>, StandardsError> {
    let location = Location::parse(location);
    match &location {
        Location::Zip(zip) if authority.table.tier_for_zip(zip).is_some() => {
            Ok(vec![zip.clone()])
        }
        Location::Town(town) => authority
            .table
            .town(town)
            .map(|entry| entry.zip_codes.clone())
            .ok_or_else(|| unknown_location(authority, &location)),
        Location::Zip(_) => Err(unknown_location(authority, &location)),
    }
}

/// Town display names served by the authority, alphabetically.
pub fn towns(authority: &AuthorityDefinition) -> Vec<&str> {
    authority
        .table
        .towns()
        .into_iter()
        .map(|entry| entry.name.as_str())
        .collect()
}

fn unknown_location(authority: &AuthorityDefinition, location: &Location) -> StandardsError {
    StandardsError::UnknownLocation {
        authority: authority.abbreviation.clone(),
        location: location.as_str().to_string(),
    }
}

/// Per-location outcomes of a batch resolution. One bad location never hides
/// the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierResolutions {
    entries: BTreeMap<Location, Result<TierId, StandardsError>>,
}

impl TierResolutions {
    pub fn resolve_all<I, S>(authority: &AuthorityDefinition, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolutions = Self::default();
        for raw in locations {
            resolutions.resolve(authority, raw.as_ref());
        }
        resolutions
    }

    /// Resolves and records `raw` unless it was already seen.
    pub fn resolve(
        &mut self,
        authority: &AuthorityDefinition,
        raw: &str,
    ) -> &Result<TierId, StandardsError> {
        let location = Location::parse(raw);
        self.entries
            .entry(location)
            .or_insert_with_key(|location| resolve_location(authority, location))
    }

    pub fn get(&self, raw: &str) -> Option<&Result<TierId, StandardsError>> {
        self.entries.get(&Location::parse(raw))
    }

    pub fn resolved(&self) -> impl Iterator<Item = (&Location, &TierId)> {
        self.entries
            .iter()
            .filter_map(|(location, outcome)| outcome.as_ref().ok().map(|tier| (location, tier)))
    }

    pub fn unresolved(&self) -> impl Iterator<Item = (&Location, &StandardsError)> {
        self.entries
            .iter()
            .filter_map(|(location, outcome)| outcome.as_ref().err().map(|err| (location, err)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
