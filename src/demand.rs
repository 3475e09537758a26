//! Demand estimation from historical booking density.
//!
//! Both factors share the same shape: bucket the history, mark the buckets
//! at or above the rounded 75th-percentile count as high-demand, and score
//! demand as the mean bucket count normalised by the busiest bucket. The
//! factor applies only when the requested hour or depot falls in a
//! high-demand bucket; otherwise it contributes zero.

use std::collections::BTreeMap;

use crate::pipeline::Booking;
use crate::stats::{percentile, round2, round_to};

fn demand_threshold(counts: &[f64]) -> f64 {
    percentile(counts, 75.0)
        .map(|p| p.round_ties_even())
        .unwrap_or(f64::INFINITY)
}

fn normalised_mean(counts: &[f64]) -> f64 {
    let max = counts.iter().copied().fold(f64::MIN, f64::max);
    round2(counts.iter().map(|c| c / max).sum::<f64>() / counts.len() as f64)
}

/// Demand contribution of the requested hour at one depot, plus the depot's
/// high-demand hours. The hour list is returned whether or not the
/// requested hour falls in it.
pub fn peak_hour_factor(bookings: &[Booking], location: &str, hour: f64) -> (f64, Vec<f64>) {
    let mut by_hour: BTreeMap<i64, usize> = BTreeMap::new();
    for b in bookings {
        if b.location.as_deref() != Some(location) {
            continue;
        }
        // Bookings with no creation timestamp carry a NaN hour; they do
        // not belong to any bucket.
        if b.created_at_hour.is_nan() {
            continue;
        }
        *by_hour.entry(b.created_at_hour as i64).or_insert(0) += 1;
    }
    if by_hour.is_empty() {
        return (0.0, Vec::new());
    }

    let counts: Vec<f64> = by_hour.values().map(|&c| c as f64).collect();
    let threshold = demand_threshold(&counts);
    let peak_hours: Vec<f64> = by_hour
        .iter()
        .filter(|&(_, &count)| count as f64 >= threshold)
        .map(|(&h, _)| h as f64)
        .collect();
    let factor = if peak_hours.contains(&hour) {
        normalised_mean(&counts)
    } else {
        0.0
    };
    (factor, peak_hours)
}

/// Demand contribution of the depot itself, relative to the whole fleet.
pub fn popular_location_factor(bookings: &[Booking], location: &str) -> f64 {
    let mut by_location: BTreeMap<&str, usize> = BTreeMap::new();
    for b in bookings {
        if let Some(loc) = b.location.as_deref() {
            *by_location.entry(loc).or_insert(0) += 1;
        }
    }
    let Some(&own_count) = by_location.get(location) else {
        return 0.0;
    };

    let counts: Vec<f64> = by_location.values().map(|&c| c as f64).collect();
    let threshold = demand_threshold(&counts);
    if (own_count as f64) >= threshold {
        normalised_mean(&counts)
    } else {
        0.0
    }
}

/// Combined demand factor for a depot and hour, with the depot's peak hours.
pub fn demand_factor(bookings: &[Booking], location: &str, hour: f64) -> (f64, Vec<f64>) {
    let (hour_factor, peak_hours) = peak_hour_factor(bookings, location, hour);
    let location_factor = popular_location_factor(bookings, location);
    let combined = round_to((hour_factor + location_factor) / 2.0, 5);
    (combined, peak_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testutil;

    fn booking(location: &str, created_at_hour: f64) -> Booking {
        let mut b = testutil::booking();
        b.location = Some(location.to_string());
        b.created_at_hour = created_at_hour;
        b
    }

    fn history() -> Vec<Booking> {
        let mut bookings = Vec::new();
        // Bristol: 4 bookings at 09:00, one at 14:00, one at 22:00.
        for _ in 0..4 {
            bookings.push(booking("Bristol", 9.0));
        }
        bookings.push(booking("Bristol", 14.0));
        bookings.push(booking("Bristol", 22.0));
        // A quieter depot.
        bookings.push(booking("Perth", 9.0));
        bookings
    }

    #[test]
    fn test_peak_hour_in_peak() {
        // Counts [4, 1, 1]: p75 = 2.5 rounds to 2, so only 09:00 is peak.
        let (factor, peaks) = peak_hour_factor(&history(), "Bristol", 9.0);
        assert_eq!(peaks, vec![9.0]);
        // mean(4/4, 1/4, 1/4) = 0.5.
        assert_eq!(factor, 0.5);
    }

    #[test]
    fn test_peak_hours_returned_even_off_peak() {
        let (factor, peaks) = peak_hour_factor(&history(), "Bristol", 14.0);
        assert_eq!(factor, 0.0);
        assert_eq!(peaks, vec![9.0]);
    }

    #[test]
    fn test_unknown_location_has_no_peaks() {
        let (factor, peaks) = peak_hour_factor(&history(), "Atlantis", 9.0);
        assert_eq!(factor, 0.0);
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_missing_created_at_rows_are_skipped() {
        let mut bookings = history();
        bookings.push(booking("Bristol", f64::NAN));
        let (_, peaks) = peak_hour_factor(&bookings, "Bristol", 9.0);
        assert_eq!(peaks, vec![9.0]);
    }

    #[test]
    fn test_popular_location_above_threshold() {
        // Counts [6, 1]: p75 = 4.75 rounds to 5, Bristol qualifies.
        // mean(6/6, 1/6) = 0.58 after rounding.
        assert_eq!(popular_location_factor(&history(), "Bristol"), 0.58);
        assert_eq!(popular_location_factor(&history(), "Perth"), 0.0);
    }

    #[test]
    fn test_combined_factor_averages_both() {
        let (factor, peaks) = demand_factor(&history(), "Bristol", 9.0);
        assert_eq!(peaks, vec![9.0]);
        assert_eq!(factor, (0.5 + 0.58) / 2.0);
    }
}
