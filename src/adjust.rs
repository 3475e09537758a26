//! Demand-based price adjustment with an average-rate ceiling.

use std::collections::HashMap;

use crate::pipeline::Booking;
use crate::predict::RatePrediction;
use crate::stats::{nan_mean, round2};

/// Final pricing for one vehicle type at a depot.
#[derive(Debug, Clone)]
pub struct VehiclePricing {
    pub vehicle_type: String,
    pub current_hourly_rate: f64,
    pub current_daily_rate: f64,
    pub adjusted_hourly_rate: f64,
    pub adjusted_daily_rate: f64,
    pub rates_hours: f64,
    pub rates_24hours: f64,
}

/// Mean historical hourly/daily rates per vehicle type at one depot.
#[derive(Debug, Clone, Default)]
pub struct AverageRates {
    by_type: HashMap<String, (f64, f64)>,
}

impl AverageRates {
    pub fn get(&self, vehicle_type: &str) -> Option<(f64, f64)> {
        self.by_type.get(vehicle_type).copied()
    }
}

/// Average the historical rates per vehicle type at a depot. Missing rates
/// ride as NaN and are excluded from the means.
pub fn average_rates(bookings: &[Booking], location: &str) -> AverageRates {
    let mut groups: HashMap<&str, Vec<(f64, f64)>> = HashMap::new();
    for b in bookings {
        if b.location.as_deref() != Some(location) {
            continue;
        }
        if let Some(vehicle_type) = b.vehicle_type.as_deref() {
            groups
                .entry(vehicle_type)
                .or_default()
                .push((b.hourly_rate, b.daily_rate));
        }
    }
    let by_type = groups
        .into_iter()
        .map(|(vehicle_type, rates)| {
            let hourly = nan_mean(rates.iter().map(|r| r.0));
            let daily = nan_mean(rates.iter().map(|r| r.1));
            (vehicle_type.to_string(), (hourly, daily))
        })
        .collect();
    AverageRates { by_type }
}

/// Ceiling clamp: an adjusted rate more than 50% above the depot average
/// falls back to 10% above the average.
fn clamp(adjusted: f64, average: f64) -> f64 {
    if adjusted > average + average * 50.0 / 100.0 {
        average + average * 10.0 / 100.0
    } else {
        adjusted
    }
}

/// Apply the demand uplift to each prediction, then gate and clamp it.
///
/// The uplift only sticks when it would not lower the revenue of the
/// booking it was scored from; otherwise the current rates stand. A type
/// with no historical average also keeps its current rates rather than
/// clamping against nothing.
pub fn apply_pricing_strategy(
    predictions: &[RatePrediction],
    demand: f64,
    averages: &AverageRates,
) -> Vec<VehiclePricing> {
    predictions
        .iter()
        .map(|p| {
            let adjusted_hourly = round2(p.predicted_hourly + demand * p.predicted_hourly);
            let adjusted_daily = round2(p.predicted_daily + demand * p.predicted_daily);
            let adjusted_cost_time =
                round2(p.rates_hours * adjusted_hourly + p.rates_24hours * adjusted_daily);
            let adjusted_revenue = round2(adjusted_cost_time + p.actual_cost_distance);

            let (final_hourly, final_daily) = if adjusted_revenue < p.actual_revenue {
                (p.current_hourly_rate, p.current_daily_rate)
            } else {
                match averages.get(&p.vehicle_type) {
                    Some((avg_hourly, avg_daily)) => (
                        clamp(adjusted_hourly, avg_hourly),
                        clamp(adjusted_daily, avg_daily),
                    ),
                    None => {
                        tracing::warn!(
                            vehicle_type = %p.vehicle_type,
                            "no average rates to clamp against"
                        );
                        (p.current_hourly_rate, p.current_daily_rate)
                    }
                }
            };

            VehiclePricing {
                vehicle_type: p.vehicle_type.clone(),
                current_hourly_rate: p.current_hourly_rate,
                current_daily_rate: p.current_daily_rate,
                adjusted_hourly_rate: final_hourly,
                adjusted_daily_rate: final_daily,
                rates_hours: p.rates_hours,
                rates_24hours: p.rates_24hours,
            }
        })
        .collect()
}
