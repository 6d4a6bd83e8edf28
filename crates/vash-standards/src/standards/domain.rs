use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of bedrooms in a unit or voucher. Zero is a studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BedroomSize(u8);

impl BedroomSize {
    pub const STUDIO: BedroomSize = BedroomSize(0);

    pub const fn new(bedrooms: u8) -> Self {
        Self(bedrooms)
    }

    pub const fn count(self) -> u8 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn label(self) -> String {
        match self.0 {
            0 => "Studio".to_string(),
            n => format!("{n} Bedroom"),
        }
    }
}

impl fmt::Display for BedroomSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("studio"),
            n => write!(f, "{n}BR"),
        }
    }
}

/// Five-digit ZIP code, always zero-padded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    /// Accepts 1-5 digits (left-padded) or ZIP+4 (`60601-1234`).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = match trimmed.split_once('-') {
            Some((zip, plus_four))
                if zip.len() == 5
                    && plus_four.len() == 4
                    && plus_four.bytes().all(|b| b.is_ascii_digit()) =>
            {
                zip
            }
            Some(_) => return None,
            None => trimmed,
        };

        if digits.is_empty() || digits.len() > 5 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self(format!("{digits:0>5}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payment standard tier (HACC calls these "ranges").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(String);

impl TierId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A caseworker- or listing-supplied location after normalization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    Zip(ZipCode),
    Town(String),
}

impl Location {
    /// ZIP-shaped input becomes [`Location::Zip`]; anything else is a town name,
    /// uppercased with internal whitespace collapsed.
    pub fn parse(raw: &str) -> Self {
        match ZipCode::parse(raw) {
            Some(zip) => Self::Zip(zip),
            None => Self::Town(normalize_town(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Zip(zip) => zip.as_str(),
            Self::Town(town) => town,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn normalize_town(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_uppercase()
}

/// Caseworker input describing a voucher search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherContext {
    pub voucher_bedrooms: BedroomSize,
    pub search_bedrooms: BTreeSet<BedroomSize>,
    pub locations: Vec<String>,
}

impl VoucherContext {
    pub fn new(
        voucher_bedrooms: BedroomSize,
        search_bedrooms: impl IntoIterator<Item = BedroomSize>,
        locations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            voucher_bedrooms,
            search_bedrooms: search_bedrooms.into_iter().collect(),
            locations: locations.into_iter().map(Into::into).collect(),
        }
    }

    /// Rejects requests that cannot produce a meaningful search.
    pub fn validate(&self) -> Result<(), super::StandardsError> {
        if self.search_bedrooms.is_empty() {
            return Err(super::StandardsError::InvalidRequest(
                "select at least one unit size to search".to_string(),
            ));
        }
        if self.locations.iter().all(|location| location.trim().is_empty()) {
            return Err(super::StandardsError::InvalidRequest(
                "select at least one town or ZIP code".to_string(),
            ));
        }
        Ok(())
    }
}

/// Listing as returned by the external listings source. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub location: String,
    /// Advertised monthly rent in whole dollars.
    pub rent: u32,
    #[serde(default)]
    pub bedrooms: Option<BedroomSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
}

impl Listing {
    pub fn new(location: impl Into<String>, rent: u32, bedrooms: Option<BedroomSize>) -> Self {
        Self {
            listing_id: None,
            address: None,
            location: location.into(),
            rent,
            bedrooms,
            square_footage: None,
            property_type: None,
        }
    }
}

/// Comparison record for one processed listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationResult {
    pub listing_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub location: String,
    pub tier: TierId,
    pub unit_bedrooms: BedroomSize,
    pub effective_bedrooms: BedroomSize,
    pub effective_standard: u32,
    pub rent: u32,
    pub qualifies: bool,
    /// `effective_standard - rent`; negative when the rent is over the standard.
    pub margin: i64,
}

/// Why a listing or location was left out of the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownLocation,
    IndeterminateBedroomSize,
    OutsideSearchedSizes,
    MalformedListing,
}

impl SkipReason {
    pub const fn label(self) -> &'static str {
        match self {
            SkipReason::UnknownLocation => "location has no payment standard tier",
            SkipReason::IndeterminateBedroomSize => "bedroom count not listed",
            SkipReason::OutsideSearchedSizes => "unit size not in searched sizes",
            SkipReason::MalformedListing => "listing record is incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    pub location: String,
    pub reason: SkipReason,
    pub detail: String,
}
