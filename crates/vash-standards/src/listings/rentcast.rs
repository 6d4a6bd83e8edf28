use std::io::Read;

use serde::Deserialize;

use super::{ListingImport, ListingImportError, RawListing};
use crate::standards::{Diagnostic, SkipReason};

/// Parses a RentCast rental-listings response (a JSON array of listings).
///
/// A record whose fields have the wrong JSON type is rejected on its own; only
/// a body that is not a JSON array fails the import.
pub fn from_rentcast_json<R: Read>(reader: R) -> Result<ListingImport, ListingImportError> {
    let records: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
    let mut import = ListingImport::default();

    for (index, value) in records.into_iter().enumerate() {
        let outcome = match serde_json::from_value::<RentcastRecord>(value) {
            Ok(record) => record.into_raw().into_listing(index),
            Err(err) => Err(Diagnostic {
                listing_index: Some(index),
                listing_id: None,
                location: String::new(),
                reason: SkipReason::MalformedListing,
                detail: err.to_string(),
            }),
        };
        import.push(outcome);
    }

    Ok(import)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RentcastRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    zip_code: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    bedrooms: Option<f64>,
    #[serde(default)]
    square_footage: Option<f64>,
    #[serde(default)]
    property_type: Option<String>,
}

impl RentcastRecord {
    fn into_raw(self) -> RawListing {
        let zip_code = self.zip_code.filter(|zip| !zip.trim().is_empty());
        RawListing {
            id: self.id,
            address: self.formatted_address,
            location: zip_code.or(self.city),
            rent: self.price,
            bedrooms: self.bedrooms,
            square_footage: self.square_footage,
            property_type: self.property_type,
        }
    }
}
