use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::{ListingImport, ListingImportError, RawListing};
use crate::standards::{Diagnostic, SkipReason};

/// Parses a listings CSV with headers
/// `id,address,location,rent,bedrooms,square_footage,property_type`.
pub fn from_csv<R: Read>(reader: R) -> Result<ListingImport, ListingImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut import = ListingImport::default();

    for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
        let row = record?;
        import.push(row.into_raw().and_then(|raw| raw.into_listing(index)).map_err(
            |mut diagnostic| {
                diagnostic.listing_index = Some(index);
                diagnostic
            },
        ));
    }

    Ok(import)
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rent: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bedrooms: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    square_footage: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    property_type: Option<String>,
}

impl ListingRow {
    fn into_raw(self) -> Result<RawListing, Diagnostic> {
        let parsed_rent = self.rent.as_deref().map(parse_amount);
        let rent = match parsed_rent {
            Some(Some(rent)) => Some(rent),
            Some(None) => {
                return Err(Diagnostic {
                    listing_index: None,
                    listing_id: self.id,
                    location: self.location.unwrap_or_default(),
                    reason: SkipReason::MalformedListing,
                    detail: format!(
                        "rent '{}' is not a number",
                        self.rent.unwrap_or_default()
                    ),
                })
            }
            None => None,
        };

        Ok(RawListing {
            id: self.id,
            address: self.address,
            location: self.location,
            rent,
            bedrooms: self.bedrooms.as_deref().and_then(parse_amount),
            square_footage: self.square_footage.as_deref().and_then(parse_amount),
            property_type: self.property_type,
        })
    }
}

/// Accepts `1650`, `1,650.00` and `$1650`.
fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse::<f64>().ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.replace(['\u{feff}', '\u{200b}'], ""))
        .filter(|value| !value.trim().is_empty()))
}
