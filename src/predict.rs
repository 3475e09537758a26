//! Per-vehicle-type rate prediction from the encoded frame.

use crate::model::ArtifactRegistry;
use crate::pipeline::ScaledFrame;
use crate::pipeline::schema::{
    IDX_COST_DISTANCE, IDX_COST_TIME, IDX_COST_TOTAL, IDX_HOURLY_RATE, IDX_RATES_24HOURS,
    IDX_RATES_HOURS, IDX_VEHICLE_TYPE, LOG_FIELDS, VEHICLE_TYPES, model_input,
};
use crate::stats::round2;

/// One vehicle type's predicted rates at a depot, with the read-backs from
/// its most recent booking that the price adjuster needs.
#[derive(Debug, Clone)]
pub struct RatePrediction {
    pub vehicle_type: String,
    pub current_hourly_rate: f64,
    pub current_daily_rate: f64,
    pub predicted_hourly: f64,
    pub predicted_daily: f64,
    pub actual_cost_distance: f64,
    pub actual_cost_time: f64,
    pub actual_revenue: f64,
    pub rates_hours: f64,
    pub rates_24hours: f64,
}

/// Predict hourly and daily rates for every vehicle type at a depot.
///
/// Each type is scored from its single most recent booking at the depot.
/// A type with no bookings, no loaded model family, or a failing forward
/// pass is skipped; prediction degrades per type rather than failing the
/// request.
pub fn predict_rates(
    frame: &ScaledFrame,
    registry: &ArtifactRegistry,
    location: &str,
) -> Vec<RatePrediction> {
    let mut at_location: Vec<_> = frame
        .rows
        .iter()
        .filter(|row| {
            let mut bits = [0.0; crate::encoders::LOCATION_BITS];
            bits.copy_from_slice(&row.features[..crate::encoders::LOCATION_BITS]);
            registry.binary.inverse(&bits) == Some(location)
        })
        .collect();
    at_location.sort_by_key(|row| row.billed_start);

    let mut predictions = Vec::new();
    for (offset, vehicle_type) in VEHICLE_TYPES.iter().enumerate() {
        let Some(row) = at_location
            .iter()
            .rfind(|row| row.features[IDX_VEHICLE_TYPE + offset] == 1.0)
        else {
            tracing::debug!(vehicle_type, location, "no bookings for vehicle type");
            continue;
        };

        let Some(family) = registry.family(vehicle_type) else {
            tracing::warn!(vehicle_type, "no model family loaded");
            continue;
        };

        // The read-backs come out of log space first.
        let mut raw = row.features;
        for idx in LOG_FIELDS {
            raw[idx] = raw[idx].exp_m1();
        }

        let (pred_hourly, pred_daily) = match family.predict(&model_input(&row.features)) {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(vehicle_type, error = %err, "rate prediction failed");
                continue;
            }
        };

        predictions.push(RatePrediction {
            vehicle_type: vehicle_type.to_string(),
            current_hourly_rate: raw[IDX_HOURLY_RATE],
            current_daily_rate: raw[IDX_HOURLY_RATE + 1],
            predicted_hourly: round2(pred_hourly),
            predicted_daily: round2(pred_daily),
            actual_cost_distance: round2(raw[IDX_COST_DISTANCE]),
            actual_cost_time: round2(raw[IDX_COST_TIME]),
            actual_revenue: round2(raw[IDX_COST_TOTAL]),
            rates_hours: round2(raw[IDX_RATES_HOURS]),
            rates_24hours: round2(raw[IDX_RATES_24HOURS]),
        });
    }
    predictions
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::encoders::BinaryEncoder;
    use crate::model::{ModelFamily, Predictor, RegressionTree};
    use crate::pipeline::{encode, testutil, transform};

    fn constant_tree(value: f64) -> Predictor {
        Predictor::Tree(RegressionTree {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![0.0],
            value: vec![value],
        })
    }

    fn registry() -> ArtifactRegistry {
        let mut families = HashMap::new();
        families.insert(
            "City".to_string(),
            ModelFamily {
                hourly: constant_tree(6.13),
                daily: constant_tree(48.0),
                scaler: None,
            },
        );
        ArtifactRegistry::for_tests(
            BinaryEncoder::new(vec!["Bristol".to_string(), "Perth".to_string()]),
            testutil::one_hot(),
            families,
        )
    }

    fn frame_of(bookings: Vec<crate::pipeline::Booking>) -> ScaledFrame {
        let mut bookings = bookings;
        transform(&mut bookings);
        let registry = registry();
        encode(&bookings, &registry.binary, &registry.one_hot).unwrap()
    }

    #[test]
    fn test_predicts_from_latest_booking() {
        let mut older = testutil::booking();
        older.hourly_rate = 4.0;
        let mut newer = testutil::booking();
        newer.billed_start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        newer.hourly_rate = 5.0;

        // Insertion order must not matter.
        let frame = frame_of(vec![newer.clone(), older.clone()]);
        let predictions = predict_rates(&frame, &registry(), "Bristol");
        assert_eq!(predictions.len(), 1);
        let p = &predictions[0];
        assert_eq!(p.vehicle_type, "City");
        assert_eq!(p.current_hourly_rate, 5.0);
        assert_eq!((p.predicted_hourly, p.predicted_daily), (6.13, 48.0));
        // Read-backs from the latest booking, back out of log space.
        assert_eq!(p.actual_revenue, 14.98);
        assert_eq!(p.rates_hours, 2.0);
    }

    #[test]
    fn test_other_locations_are_ignored() {
        let mut elsewhere = testutil::booking();
        elsewhere.location = Some("Perth".to_string());
        let frame = frame_of(vec![elsewhere]);
        assert!(predict_rates(&frame, &registry(), "Bristol").is_empty());
    }

    #[test]
    fn test_types_without_models_are_skipped() {
        let mut van = testutil::booking();
        van.vehicle_type = Some("Van".to_string());
        let frame = frame_of(vec![testutil::booking(), van]);
        let predictions = predict_rates(&frame, &registry(), "Bristol");
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].vehicle_type, "City");
    }
}
