use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use super::domain::{normalize_town, BedroomSize, TierId, ZipCode};

/// Raw tier table as it appears in an authority document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTierTable {
    /// Largest tabulated bedroom size; larger units are paid at this size.
    pub bedroom_ceiling: u8,
    pub tiers: Vec<RawTierRow>,
    pub zip_codes: BTreeMap<String, String>,
    #[serde(default)]
    pub towns: Vec<RawTown>,
}

/// One rate row: studio first, then one amount per bedroom up to the ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTierRow {
    pub tier: String,
    pub rates: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTown {
    pub name: String,
    /// Required when the town's ZIP codes fall in more than one tier.
    #[serde(default)]
    pub tier: Option<String>,
    pub zip_codes: Vec<String>,
}

/// Integrity failures detected while loading payment standard tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{authority}: tier '{tier}' is used by '{location}' but has no rate row")]
    MissingTierRow {
        authority: String,
        tier: String,
        location: String,
    },
    #[error("{authority}: tier '{tier}' lists {found} rates, expected {expected} (studio through the {ceiling} ceiling)")]
    IncompleteTierRow {
        authority: String,
        tier: String,
        found: usize,
        expected: usize,
        ceiling: BedroomSize,
    },
    #[error("{authority}: tier '{tier}' pays less for {larger} than for {smaller}")]
    DecreasingRates {
        authority: String,
        tier: String,
        smaller: BedroomSize,
        larger: BedroomSize,
    },
    #[error("{authority}: tier '{tier}' is defined more than once")]
    DuplicateTier { authority: String, tier: String },
    #[error("{authority}: '{value}' is not a 5-digit ZIP code")]
    InvalidZipCode { authority: String, value: String },
    #[error("{authority}: ZIP code {zip} appears more than once")]
    DuplicateZipCode { authority: String, zip: String },
    #[error("{authority}: town '{town}' is listed more than once")]
    DuplicateTown { authority: String, town: String },
    #[error("{authority}: town '{town}' lists no ZIP codes")]
    EmptyTown { authority: String, town: String },
    #[error("{authority}: town '{town}' covers ZIP code {zip}, which has no tier")]
    UnmappedTownZip {
        authority: String,
        town: String,
        zip: String,
    },
    #[error("{authority}: town '{town}' spans tiers {tiers}; an explicit tier is required")]
    AmbiguousTownTier {
        authority: String,
        town: String,
        tiers: String,
    },
    #[error("{authority}: effective date '{value}' is not YYYY-MM-DD")]
    InvalidEffectiveDate { authority: String, value: String },
    #[error("authority key '{key}' is configured more than once")]
    DuplicateAuthority { key: String },
}

/// A town and the ZIP codes it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownEntry {
    pub name: String,
    pub tier: TierId,
    pub zip_codes: Vec<ZipCode>,
}

/// Validated payment standard table for one authority.
///
/// Every tier reachable from a ZIP code or town has a full, non-decreasing rate row
/// from studio to the ceiling, so rate lookups for known tiers cannot miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    ceiling: BedroomSize,
    rates: BTreeMap<TierId, Vec<u32>>,
    zip_tiers: BTreeMap<ZipCode, TierId>,
    towns: BTreeMap<String, TownEntry>,
}

impl TierTable {
    pub fn from_raw(authority: &str, raw: RawTierTable) -> Result<Self, ConfigurationError> {
        let ceiling = BedroomSize::new(raw.bedroom_ceiling);
        let expected = ceiling.index() + 1;

        let mut rates = BTreeMap::new();
        for row in raw.tiers {
            if row.rates.len() != expected {
                return Err(ConfigurationError::IncompleteTierRow {
                    authority: authority.to_string(),
                    tier: row.tier,
                    found: row.rates.len(),
                    expected,
                    ceiling,
                });
            }

            if let Some(position) = row.rates.windows(2).position(|pair| pair[1] < pair[0]) {
                return Err(ConfigurationError::DecreasingRates {
                    authority: authority.to_string(),
                    tier: row.tier,
                    smaller: BedroomSize::new(position as u8),
                    larger: BedroomSize::new(position as u8 + 1),
                });
            }

            let tier = TierId::new(row.tier.trim());
            if rates.insert(tier.clone(), row.rates).is_some() {
                return Err(ConfigurationError::DuplicateTier {
                    authority: authority.to_string(),
                    tier: tier.as_str().to_string(),
                });
            }
        }

        let mut zip_tiers = BTreeMap::new();
        for (raw_zip, raw_tier) in raw.zip_codes {
            let zip = strict_zip(authority, &raw_zip)?;
            let tier = TierId::new(raw_tier.trim());
            if !rates.contains_key(&tier) {
                return Err(ConfigurationError::MissingTierRow {
                    authority: authority.to_string(),
                    tier: tier.as_str().to_string(),
                    location: zip.as_str().to_string(),
                });
            }
            if zip_tiers.insert(zip.clone(), tier).is_some() {
                return Err(ConfigurationError::DuplicateZipCode {
                    authority: authority.to_string(),
                    zip: zip.as_str().to_string(),
                });
            }
        }

        let mut towns = BTreeMap::new();
        for town in raw.towns {
            let entry = town_entry(authority, town, &zip_tiers, &rates)?;
            let key = normalize_town(&entry.name);
            if towns.contains_key(&key) {
                return Err(ConfigurationError::DuplicateTown {
                    authority: authority.to_string(),
                    town: entry.name,
                });
            }
            towns.insert(key, entry);
        }

        Ok(Self {
            ceiling,
            rates,
            zip_tiers,
            towns,
        })
    }

    pub fn ceiling(&self) -> BedroomSize {
        self.ceiling
    }

    pub fn tier_for_zip(&self, zip: &ZipCode) -> Option<&TierId> {
        self.zip_tiers.get(zip)
    }

    /// Looks up a town by its normalized (uppercased) name.
    pub fn town(&self, normalized_name: &str) -> Option<&TownEntry> {
        self.towns.get(normalized_name)
    }

    /// Amount for `tier` at `bedrooms`, clamping sizes above the ceiling.
    pub fn rate(&self, tier: &TierId, bedrooms: BedroomSize) -> Option<u32> {
        let row = self.rates.get(tier)?;
        row.get(bedrooms.min(self.ceiling).index()).copied()
    }

    pub fn has_tier(&self, tier: &TierId) -> bool {
        self.rates.contains_key(tier)
    }

    pub fn tiers(&self) -> impl Iterator<Item = (&TierId, &[u32])> {
        self.rates.iter().map(|(tier, row)| (tier, row.as_slice()))
    }

    pub fn zip_codes(&self) -> impl Iterator<Item = (&ZipCode, &TierId)> {
        self.zip_tiers.iter()
    }

    /// Towns ordered by display name.
    pub fn towns(&self) -> Vec<&TownEntry> {
        let mut towns: Vec<&TownEntry> = self.towns.values().collect();
        towns.sort_by(|a, b| a.name.cmp(&b.name));
        towns
    }

    pub fn zip_count(&self) -> usize {
        self.zip_tiers.len()
    }

    pub fn town_count(&self) -> usize {
        self.towns.len()
    }
}

fn strict_zip(authority: &str, raw: &str) -> Result<ZipCode, ConfigurationError> {
    let trimmed = raw.trim();
    let well_formed = trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit());
    match ZipCode::parse(trimmed) {
        Some(zip) if well_formed => Ok(zip),
        _ => Err(ConfigurationError::InvalidZipCode {
            authority: authority.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn town_entry(
    authority: &str,
    town: RawTown,
    zip_tiers: &BTreeMap<ZipCode, TierId>,
    rates: &BTreeMap<TierId, Vec<u32>>,
) -> Result<TownEntry, ConfigurationError> {
    let name = town.name.split_whitespace().collect::<Vec<_>>().join(" ");
    if town.zip_codes.is_empty() {
        return Err(ConfigurationError::EmptyTown {
            authority: authority.to_string(),
            town: name,
        });
    }

    let mut zip_codes = Vec::with_capacity(town.zip_codes.len());
    let mut covered = BTreeSet::new();
    for raw in &town.zip_codes {
        let zip = strict_zip(authority, raw)?;
        let tier = zip_tiers
            .get(&zip)
            .ok_or_else(|| ConfigurationError::UnmappedTownZip {
                authority: authority.to_string(),
                town: name.clone(),
                zip: zip.as_str().to_string(),
            })?;
        covered.insert(tier.clone());
        if !zip_codes.contains(&zip) {
            zip_codes.push(zip);
        }
    }

    let tier = match town.tier {
        Some(explicit) => {
            let tier = TierId::new(explicit.trim());
            if !rates.contains_key(&tier) {
                return Err(ConfigurationError::MissingTierRow {
                    authority: authority.to_string(),
                    tier: tier.as_str().to_string(),
                    location: name,
                });
            }
            tier
        }
        None if covered.len() == 1 => covered.into_iter().next().ok_or_else(|| {
            ConfigurationError::EmptyTown {
                authority: authority.to_string(),
                town: name.clone(),
            }
        })?,
        None => {
            return Err(ConfigurationError::AmbiguousTownTier {
                authority: authority.to_string(),
                town: name,
                tiers: covered
                    .iter()
                    .map(TierId::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    };

    Ok(TownEntry {
        name,
        tier,
        zip_codes,
    })
}
