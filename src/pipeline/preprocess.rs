//! Data-shaping rules: cleaning, joining, feature engineering, capping.
//!
//! The steps run in a fixed order; several later statistics (the peak-hour
//! threshold, the IQR fences) are computed over the dataset as it stands at
//! that point in the order, so moving a step moves prices.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::data::{RawBooking, RawTariff, infer_location_code, location_name};
use crate::pipeline::{Booking, Season, is_holiday};
use crate::stats::{iqr_bounds, percentile, round_to};
use crate::tariff::rate_of;

/// Booking-tariff name that is reassigned to the contract fleet during
/// cleaning.
const CONTRACT_REASSIGNED_TARIFF: &str = "McCarthy & Stone EV";

/// Timestamp formats seen in the exports.
const DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d",
];

/// Lenient timestamp coercion: unparseable values become missing.
fn parse_datetime(value: Option<&str>) -> Option<NaiveDateTime> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return Some(d.and_hms_opt(0, 0, 0).expect("midnight is valid"));
        }
    }
    None
}

/// Integer coercion: parse through f64 and truncate; unparseable becomes 0.
fn coerce_int(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(f64::trunc)
        .unwrap_or(0.0)
}

/// Float coercion: unparseable becomes missing.
fn coerce_float(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn hour_of(dt: Option<NaiveDateTime>) -> f64 {
    dt.map(|d| d.hour() as f64).unwrap_or(f64::NAN)
}

fn dayofweek_of(dt: Option<NaiveDateTime>) -> f64 {
    // Monday = 0, matching the statistics the models were fitted on.
    dt.map(|d| d.weekday().num_days_from_monday() as f64)
        .unwrap_or(f64::NAN)
}

fn month_of(dt: Option<NaiveDateTime>) -> f64 {
    dt.map(|d| d.month() as f64).unwrap_or(f64::NAN)
}

fn year_of(dt: Option<NaiveDateTime>) -> f64 {
    dt.map(|d| d.year() as f64).unwrap_or(f64::NAN)
}

struct WorkRow {
    booking_id: Option<String>,
    booking: Booking,
}

/// Run the full preprocessing pass over the raw tables.
pub fn preprocess(raw: &[RawBooking], tariffs: &[RawTariff]) -> Vec<Booking> {
    // PAYG fleet only, on both tables.
    let mut bookings: Vec<RawBooking> = raw
        .iter()
        .filter(|b| b.contract.as_deref() == Some("PAYG"))
        .cloned()
        .collect();
    let tariffs: Vec<&RawTariff> = tariffs
        .iter()
        .filter(|t| t.payg_or_contract.as_deref() == Some("PAYG"))
        .collect();

    // Tariff-name anomaly: the McCarthy & Stone EV fleet belongs to the
    // contract side; the reassignment happens after the PAYG filter, so the
    // rows themselves stay.
    for booking in &mut bookings {
        if booking.tariff.as_deref() == Some(CONTRACT_REASSIGNED_TARIFF) {
            booking.contract = Some("Contract".to_string());
        }
    }

    let mut rows: Vec<WorkRow> = Vec::with_capacity(bookings.len());
    let mut dropped_unbilled = 0usize;

    for booking in &bookings {
        // Rows with neither location column are unusable.
        if booking.location_office_use.is_none() && booking.location_description.is_none() {
            continue;
        }

        let code = infer_location_code(
            booking.location_office_use.as_deref(),
            booking.location_description.as_deref(),
        );
        let location = code
            .as_deref()
            .and_then(location_name)
            .map(str::to_string);

        // Tariff join, first match by name.
        let tariff = booking.tariff.as_deref().and_then(|name| {
            tariffs
                .iter()
                .find(|t| t.tariff.as_deref() == Some(name))
                .copied()
        });
        let vehicle_type = tariff.and_then(|t| t.vehicle_type.clone());
        let fuel_type = tariff.and_then(|t| t.fuel_type.clone());
        let size_category = tariff.and_then(|t| t.size_category.clone());

        if size_category.as_deref() == Some("Various") {
            continue;
        }

        let Some(billed_start) = parse_datetime(booking.billed_start.as_deref()) else {
            dropped_unbilled += 1;
            continue;
        };
        let billed_end = parse_datetime(booking.billed_end.as_deref());
        let created_at = parse_datetime(booking.created_at.as_deref());

        let rates = rate_of(
            billed_start.year(),
            billed_start.month(),
            location.as_deref(),
            vehicle_type.as_deref(),
            fuel_type.as_deref(),
            size_category.as_deref(),
        );

        let billed_start_dayofweek = billed_start.weekday().num_days_from_monday() as f64;

        rows.push(WorkRow {
            booking_id: booking.booking_id.clone(),
            booking: Booking {
                location,
                vehicle_type,
                fuel_type,
                billed_start,
                billed_start_hour: billed_start.hour() as f64,
                billed_start_dayofweek,
                billed_start_month: billed_start.month() as f64,
                billed_start_year: billed_start.year() as f64,
                billed_end_hour: hour_of(billed_end),
                billed_end_dayofweek: dayofweek_of(billed_end),
                billed_end_month: month_of(billed_end),
                billed_end_year: year_of(billed_end),
                created_at_hour: hour_of(created_at),
                created_at_dayofweek: dayofweek_of(created_at),
                created_at_month: month_of(created_at),
                created_at_year: year_of(created_at),
                is_weekend: billed_start_dayofweek == 5.0 || billed_start_dayofweek == 6.0,
                is_peak_hour: false, // set below from the global histogram
                season: Season::of(billed_start.month(), billed_start.day()),
                is_holiday: is_holiday(billed_start.month(), billed_start.day()),
                actual_duration: coerce_int(booking.actual_duration.as_deref()),
                billed_duration: coerce_int(booking.billed_duration.as_deref()),
                mileage: coerce_float(booking.mileage.as_deref()),
                actual_cost_distance: coerce_float(booking.actual_cost_distance.as_deref()),
                actual_cost_time: coerce_float(booking.actual_cost_time.as_deref()),
                actual_cost_total: coerce_float(booking.actual_cost_total.as_deref()),
                rates_hours: coerce_float(booking.rates_hours.as_deref()),
                rates_24hours: coerce_int(booking.rates_24hours.as_deref()),
                rates_overnight: coerce_int(booking.rates_overnight.as_deref()),
                hourly_rate: rates.hourly,
                daily_rate: rates.daily,
                per_mile: rates.per_mile,
            },
        });
    }

    if dropped_unbilled > 0 {
        tracing::debug!(count = dropped_unbilled, "dropped bookings without a billed start");
    }

    // Global peak hours from the created-hour histogram, computed before
    // deduplication as the source statistics were.
    let peak_hours = peak_hours_of(rows.iter().map(|r| r.booking.created_at_hour));
    for row in &mut rows {
        row.booking.is_peak_hour = row.booking.created_at_hour.is_finite()
            && peak_hours.contains(&(row.booking.created_at_hour as i64));
    }

    // Deduplicate on booking id, first row wins.
    let mut seen: HashSet<Option<String>> = HashSet::new();
    rows.retain(|row| seen.insert(row.booking_id.clone()));

    let mut bookings: Vec<Booking> = rows.into_iter().map(|r| r.booking).collect();
    cap_outliers(&mut bookings);
    bookings
}

/// Hours whose booking count reaches the rounded 75th percentile of the
/// per-hour counts.
pub fn peak_hours_of(hours: impl IntoIterator<Item = f64>) -> Vec<i64> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for hour in hours {
        if hour.is_finite() {
            *counts.entry(hour as i64).or_default() += 1;
        }
    }
    if counts.is_empty() {
        return Vec::new();
    }
    let values: Vec<f64> = counts.values().map(|&c| c as f64).collect();
    let threshold = round_to(percentile(&values, 75.0).expect("non-empty"), 0) as i64;
    let mut peak: Vec<i64> = counts
        .into_iter()
        .filter(|&(_, count)| count as i64 >= threshold)
        .map(|(hour, _)| hour)
        .collect();
    peak.sort_unstable();
    peak
}

/// Cap and floor the six numeric fields at the Tukey fences computed once
/// over the cleaned dataset.
fn cap_outliers(bookings: &mut [Booking]) {
    macro_rules! cap_field {
        ($field:ident) => {
            let values: Vec<f64> = bookings.iter().map(|b| b.$field).collect();
            if let Some(bounds) = iqr_bounds(&values) {
                for b in bookings.iter_mut() {
                    if b.$field > bounds.upper {
                        b.$field = bounds.upper;
                    } else if b.$field < bounds.lower {
                        b.$field = bounds.lower;
                    }
                }
            }
        };
    }
    cap_field!(actual_duration);
    cap_field!(billed_duration);
    cap_field!(mileage);
    cap_field!(actual_cost_distance);
    cap_field!(actual_cost_time);
    cap_field!(actual_cost_total);
}
