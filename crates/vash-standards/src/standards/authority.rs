use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::table::{ConfigurationError, RawTierTable, TierTable};

/// Authority document as stored on disk (one JSON file per county).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorityDocument {
    pub key: String,
    pub county: String,
    pub authority: String,
    pub abbreviation: String,
    pub effective_date: String,
    pub source_url: String,
    #[serde(default)]
    pub explainer: String,
    #[serde(flatten)]
    pub table: RawTierTable,
}

/// A housing authority and the payment standard table it publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityDefinition {
    pub key: String,
    pub county: String,
    pub name: String,
    pub abbreviation: String,
    pub effective_date: NaiveDate,
    pub source_url: String,
    pub explainer: String,
    pub table: TierTable,
}

impl AuthorityDefinition {
    pub fn from_document(document: AuthorityDocument) -> Result<Self, ConfigurationError> {
        let AuthorityDocument {
            key,
            county,
            authority,
            abbreviation,
            effective_date,
            source_url,
            explainer,
            table,
        } = document;

        let abbreviation = abbreviation.trim().to_string();
        let effective_date = NaiveDate::parse_from_str(effective_date.trim(), "%Y-%m-%d")
            .map_err(|_| ConfigurationError::InvalidEffectiveDate {
                authority: abbreviation.clone(),
                value: effective_date.clone(),
            })?;
        let table = TierTable::from_raw(&abbreviation, table)?;

        Ok(Self {
            key: key.trim().to_ascii_lowercase(),
            county: county.trim().to_string(),
            name: authority.trim().to_string(),
            abbreviation,
            effective_date,
            source_url: source_url.trim().to_string(),
            explainer: explainer.trim().to_string(),
            table,
        })
    }

    /// True when `query` names this authority by key, county or abbreviation.
    pub fn answers_to(&self, query: &str) -> bool {
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        if query.is_empty() {
            return false;
        }

        let county = self.county.as_str();
        let county_short = county
            .strip_suffix(" County")
            .or_else(|| county.strip_suffix(" county"))
            .unwrap_or(county);

        [self.key.as_str(), county, county_short, self.abbreviation.as_str()]
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(&query))
    }

    pub fn summary(&self) -> AuthoritySummary {
        AuthoritySummary {
            key: self.key.clone(),
            county: self.county.clone(),
            authority: self.name.clone(),
            abbreviation: self.abbreviation.clone(),
            effective_date: self.effective_date,
            source_url: self.source_url.clone(),
            explainer: self.explainer.clone(),
            bedroom_ceiling: self.table.ceiling(),
            tier_count: self.table.tiers().count(),
            town_count: self.table.town_count(),
            zip_count: self.table.zip_count(),
        }
    }
}

/// Landing-page view of an authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthoritySummary {
    pub key: String,
    pub county: String,
    pub authority: String,
    pub abbreviation: String,
    pub effective_date: NaiveDate,
    pub source_url: String,
    pub explainer: String,
    pub bedroom_ceiling: super::domain::BedroomSize,
    pub tier_count: usize,
    pub town_count: usize,
    pub zip_count: usize,
}
