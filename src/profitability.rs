//! Trailing-month revenue comparison under the adjusted rates.

use std::collections::BTreeMap;

use chrono::Months;

use crate::adjust::VehiclePricing;
use crate::demand::demand_factor;
use crate::pipeline::{Booking, inverse_transform};
use crate::stats::round2;

/// Actual versus repriced revenue for one vehicle type.
#[derive(Debug, Clone)]
pub struct TypeProfitability {
    pub vehicle_type: String,
    pub actual_revenue: f64,
    pub adjusted_revenue: f64,
    pub profitability: f64,
}

/// Reprice the depot's trailing month of bookings at the adjusted rates
/// and compare revenue per vehicle type.
///
/// The trailing month runs back from the depot's most recent billed start.
/// Types without an adjusted rate are left out of the comparison, and rows
/// with missing usage fields drop out of the affected sums only.
pub fn calculate_profitability(
    bookings: &[Booking],
    location: &str,
    pricing: &[VehiclePricing],
) -> Vec<TypeProfitability> {
    let mut history = bookings.to_vec();
    inverse_transform(&mut history);
    history.sort_by_key(|b| b.billed_start);

    let at_location: Vec<&Booking> = history
        .iter()
        .filter(|b| b.location.as_deref() == Some(location))
        .collect();
    let Some(latest) = at_location.iter().map(|b| b.billed_start).max() else {
        return Vec::new();
    };
    let one_month_ago = latest
        .checked_sub_months(Months::new(1))
        .unwrap_or(chrono::NaiveDateTime::MIN);
    let window: Vec<&&Booking> = at_location
        .iter()
        .filter(|b| b.billed_start >= one_month_ago)
        .collect();

    for booking in &window {
        // Per-booking demand at the Newcastle reference depot; scored but
        // not folded into the revenue adjustment.
        let _ = demand_factor(&history, "Newcastle", booking.created_at_hour);
    }

    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for booking in &window {
        let Some(vehicle_type) = booking.vehicle_type.as_deref() else {
            continue;
        };
        let Some(rates) = pricing.iter().find(|p| p.vehicle_type == vehicle_type) else {
            continue;
        };
        let entry = totals.entry(rates.vehicle_type.as_str()).or_insert((0.0, 0.0));

        if booking.actual_cost_total.is_finite() {
            entry.0 += booking.actual_cost_total;
        }
        let adjusted_cost_time = round2(
            booking.rates_hours * rates.adjusted_hourly_rate
                + booking.rates_24hours * rates.adjusted_daily_rate,
        );
        let adjusted_revenue = round2(adjusted_cost_time + booking.actual_cost_distance);
        if adjusted_revenue.is_finite() {
            entry.1 += adjusted_revenue;
        }
    }

    totals
        .into_iter()
        .map(|(vehicle_type, (actual, adjusted))| TypeProfitability {
            vehicle_type: vehicle_type.to_string(),
            actual_revenue: actual,
            adjusted_revenue: adjusted,
            profitability: adjusted - actual,
        })
        .collect()
}
