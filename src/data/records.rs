//! Serde row structs matching the CSV headers of the source tables.
//!
//! Columns that arrive in inconsistent shapes (dates, durations, money) are
//! read as optional strings and coerced during preprocessing.

use serde::Deserialize;

/// One row of the bookings export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBooking {
    #[serde(rename = "booking_id")]
    pub booking_id: Option<String>,

    #[serde(rename = "Contract")]
    pub contract: Option<String>,

    #[serde(rename = "booking_tariff")]
    pub tariff: Option<String>,

    #[serde(rename = "location_office_use")]
    pub location_office_use: Option<String>,

    #[serde(rename = "location_description")]
    pub location_description: Option<String>,

    #[serde(rename = "booking_start")]
    pub start: Option<String>,

    #[serde(rename = "booking_end")]
    pub end: Option<String>,

    #[serde(rename = "booking_actual_start")]
    pub actual_start: Option<String>,

    #[serde(rename = "booking_actual_end")]
    pub actual_end: Option<String>,

    #[serde(rename = "booking_billed_start")]
    pub billed_start: Option<String>,

    #[serde(rename = "booking_billed_end")]
    pub billed_end: Option<String>,

    #[serde(rename = "booking_created_at")]
    pub created_at: Option<String>,

    #[serde(rename = "booking_cancelled_at")]
    pub cancelled_at: Option<String>,

    #[serde(rename = "booking_duration")]
    pub duration: Option<String>,

    #[serde(rename = "booking_actual_duration")]
    pub actual_duration: Option<String>,

    #[serde(rename = "booking_billed_duration")]
    pub billed_duration: Option<String>,

    #[serde(rename = "booking_mileage")]
    pub mileage: Option<String>,

    #[serde(rename = "booking_rates_hours")]
    pub rates_hours: Option<String>,

    #[serde(rename = "booking_rates_24hours")]
    pub rates_24hours: Option<String>,

    #[serde(rename = "booking_rates_overnight")]
    pub rates_overnight: Option<String>,

    #[serde(rename = "booking_actual_cost_distance")]
    pub actual_cost_distance: Option<String>,

    #[serde(rename = "booking_actual_cost_time")]
    pub actual_cost_time: Option<String>,

    #[serde(rename = "booking_actual_cost_total")]
    pub actual_cost_total: Option<String>,
}

/// One row of the tariff table, joined to bookings by tariff name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTariff {
    #[serde(rename = "Tariff")]
    pub tariff: Option<String>,

    #[serde(rename = "PAYG or Contract")]
    pub payg_or_contract: Option<String>,

    #[serde(rename = "Vehicle Type")]
    pub vehicle_type: Option<String>,

    /// Header is `Petrol Or EV` in the export; semantically the fuel type.
    #[serde(rename = "Petrol Or EV")]
    pub fuel_type: Option<String>,

    #[serde(rename = "Size Category")]
    pub size_category: Option<String>,

    #[serde(rename = "Notes")]
    pub notes: Option<String>,
}
