//! Turns listing-source exports into [`Listing`]s the qualifier can compare.
//!
//! Records that cannot become a listing (no location, no usable rent) are
//! returned as `MalformedListing` diagnostics next to the listings that did
//! parse. Only unreadable or syntactically broken input fails the import.

mod csv_export;
mod rentcast;

use std::path::Path;

use crate::standards::{BedroomSize, Diagnostic, Listing, SkipReason};

pub use csv_export::from_csv;
pub use rentcast::from_rentcast_json;

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    UnsupportedFormat(String),
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listings: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listings CSV: {}", err),
            ListingImportError::Json(err) => write!(f, "invalid listings JSON: {}", err),
            ListingImportError::UnsupportedFormat(path) => write!(
                f,
                "cannot tell the listings format of {}; expected .json or .csv",
                path
            ),
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
            ListingImportError::Json(err) => Some(err),
            ListingImportError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ListingImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Listings that parsed plus the records that did not.
///
/// `listing_index` on a rejected record is its position in the source export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingImport {
    pub listings: Vec<Listing>,
    pub rejected: Vec<Diagnostic>,
}

impl ListingImport {
    pub(crate) fn push(&mut self, outcome: Result<Listing, Diagnostic>) {
        match outcome {
            Ok(listing) => self.listings.push(listing),
            Err(diagnostic) => self.rejected.push(diagnostic),
        }
    }
}

/// Reads a `.json` (RentCast) or `.csv` export, chosen by file extension.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ListingImport, ListingImportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => from_rentcast_json(std::fs::File::open(path)?),
        Some("csv") => from_csv(std::fs::File::open(path)?),
        _ => Err(ListingImportError::UnsupportedFormat(
            path.display().to_string(),
        )),
    }
}

/// Source-neutral view of one record before validation.
#[derive(Debug, Default)]
pub(crate) struct RawListing {
    pub(crate) id: Option<String>,
    pub(crate) address: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) rent: Option<f64>,
    pub(crate) bedrooms: Option<f64>,
    pub(crate) square_footage: Option<f64>,
    pub(crate) property_type: Option<String>,
}

impl RawListing {
    pub(crate) fn into_listing(self, index: usize) -> Result<Listing, Diagnostic> {
        let location = match non_blank(self.location) {
            Some(location) => location,
            None => return Err(malformed(index, self.id, String::new(), "no ZIP code or town")),
        };

        let rent = match self.rent.and_then(whole_dollars) {
            Some(rent) => rent,
            None => {
                let detail = match self.rent {
                    Some(value) => format!("rent {value} is not a usable amount"),
                    None => "no advertised rent".to_string(),
                };
                return Err(malformed(index, self.id, location, &detail));
            }
        };

        Ok(Listing {
            listing_id: non_blank(self.id),
            address: non_blank(self.address),
            location,
            rent,
            bedrooms: self.bedrooms.and_then(bedroom_count),
            square_footage: self.square_footage.and_then(whole_number),
            property_type: non_blank(self.property_type),
        })
    }
}

/// Rounds up so a fractional rent never slips under a whole-dollar standard.
fn whole_dollars(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let rounded = value.ceil();
    (rounded <= f64::from(u32::MAX)).then_some(rounded as u32)
}

fn bedroom_count(value: f64) -> Option<BedroomSize> {
    let integral = value.is_finite() && value >= 0.0 && value.fract() == 0.0;
    (integral && value <= f64::from(u8::MAX)).then(|| BedroomSize::new(value as u8))
}

fn whole_number(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value.round() as u32)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|value| !value.is_empty())
}

fn malformed(index: usize, id: Option<String>, location: String, detail: &str) -> Diagnostic {
    Diagnostic {
        listing_index: Some(index),
        listing_id: non_blank(id),
        location,
        reason: SkipReason::MalformedListing,
        detail: detail.to_string(),
    }
}
