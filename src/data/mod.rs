//! Raw table ingestion.
//!
//! The booking and tariff tables are request-scoped: read from disk,
//! transformed, consumed, and discarded. Only the fitted artifacts are
//! process-wide state.

mod locations;
mod records;

pub use locations::{
    EXCLUDED_LOCATIONS, LOCATION_CODES, infer_location_code, location_name, selectable_locations,
};
pub use records::{RawBooking, RawTariff};

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Load the bookings table and the tariff table.
pub fn load_tables(bookings: &Path, tariffs: &Path) -> Result<(Vec<RawBooking>, Vec<RawTariff>)> {
    let bookings = read_csv(bookings)?;
    let tariffs = read_csv(tariffs)?;
    Ok((bookings, tariffs))
}

/// Deserialize every row of a CSV file.
pub fn read_csv<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct TransformedRow {
    location: String,
}

/// Distinct depot names from the pre-transformed dataset, for the UI list.
pub fn load_location_index(path: &Path) -> Result<Vec<String>> {
    let rows: Vec<TransformedRow> = read_csv(path)?;
    let mut names: Vec<String> = rows.into_iter().map(|r| r.location).collect();
    names.sort();
    names.dedup();
    Ok(names)
}
