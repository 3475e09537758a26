//! Log transform and categorical encoding into the frozen frame layout.

use chrono::NaiveDateTime;

use crate::encoders::{BinaryEncoder, LOCATION_BITS, OneHotEncoder};
use crate::error::{PricingError, Result};
use crate::pipeline::Booking;
use crate::pipeline::schema::{
    FRAME_WIDTH, IDX_FUEL_TYPE, IDX_HOURLY_RATE, IDX_IS_HOLIDAY, IDX_IS_PEAK_HOUR, IDX_IS_WEEKEND,
    IDX_SEASON, IDX_VEHICLE_TYPE,
};

/// One encoded row in the frozen schema. The billed-start timestamp rides
/// alongside for sorting; it is not a feature value.
#[derive(Debug, Clone)]
pub struct ScaledRow {
    pub billed_start: NaiveDateTime,
    pub features: [f64; FRAME_WIDTH],
}

/// The encoded frame consumed by the rate predictor.
#[derive(Debug, Clone, Default)]
pub struct ScaledFrame {
    pub rows: Vec<ScaledRow>,
}

impl ScaledFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apply `ln(1 + x)` to the six numeric fields, in place.
pub fn transform(bookings: &mut [Booking]) {
    for b in bookings {
        b.actual_duration = b.actual_duration.ln_1p();
        b.billed_duration = b.billed_duration.ln_1p();
        b.mileage = b.mileage.ln_1p();
        b.actual_cost_distance = b.actual_cost_distance.ln_1p();
        b.actual_cost_time = b.actual_cost_time.ln_1p();
        b.actual_cost_total = b.actual_cost_total.ln_1p();
    }
}

/// Invert the log transform, in place.
pub fn inverse_transform(bookings: &mut [Booking]) {
    for b in bookings {
        b.actual_duration = b.actual_duration.exp_m1();
        b.billed_duration = b.billed_duration.exp_m1();
        b.mileage = b.mileage.exp_m1();
        b.actual_cost_distance = b.actual_cost_distance.exp_m1();
        b.actual_cost_time = b.actual_cost_time.exp_m1();
        b.actual_cost_total = b.actual_cost_total.exp_m1();
    }
}

fn bool_label(v: bool) -> &'static str {
    // Fitted category labels for the boolean features.
    if v { "1.0" } else { "0.0" }
}

fn write_block(features: &mut [f64; FRAME_WIDTH], start: usize, block: &[f64]) {
    features[start..start + block.len()].copy_from_slice(block);
}

/// Encode the annotated bookings into the frozen frame layout.
///
/// The fitted encoders dictate block contents; the schema dictates block
/// positions. A width disagreement between the two is an artifact error,
/// not something to paper over.
pub fn encode(
    bookings: &[Booking],
    binary: &BinaryEncoder,
    one_hot: &OneHotEncoder,
) -> Result<ScaledFrame> {
    let expected = [
        ("season", 4usize),
        ("is_holiday", 2),
        ("Vehicle Type", 5),
        ("Fuel Type", 3),
        ("is_peak_hour", 2),
        ("is_weekend", 2),
    ];
    for (feature, width) in expected {
        let fitted = one_hot
            .categories(feature)
            .map(<[String]>::len)
            .unwrap_or(0);
        if fitted != width {
            return Err(PricingError::Artifact {
                name: "one_hot_encoder".to_string(),
                reason: format!("feature {feature} has {fitted} categories, expected {width}"),
            });
        }
    }

    let mut rows = Vec::with_capacity(bookings.len());
    for b in bookings {
        let mut features = [0.0; FRAME_WIDTH];

        let location_bits = binary.transform(b.location.as_deref());
        features[..LOCATION_BITS].copy_from_slice(&location_bits);

        features[7] = b.actual_duration;
        features[8] = b.billed_start_hour;
        features[9] = b.billed_start_dayofweek;
        features[10] = b.billed_start_month;
        features[11] = b.billed_start_year;
        features[12] = b.billed_end_hour;
        features[13] = b.billed_end_dayofweek;
        features[14] = b.billed_end_month;
        features[15] = b.billed_end_year;
        features[16] = b.billed_duration;
        features[17] = b.mileage;
        features[18] = b.rates_hours;
        features[19] = b.rates_24hours;
        features[20] = b.rates_overnight;
        features[21] = b.actual_cost_distance;
        features[22] = b.actual_cost_time;
        features[23] = b.actual_cost_total;
        features[24] = b.created_at_hour;
        features[25] = b.created_at_dayofweek;
        features[26] = b.created_at_month;
        features[27] = b.created_at_year;

        write_block(
            &mut features,
            IDX_SEASON,
            &one_hot.transform("season", b.season.as_str())?,
        );
        write_block(
            &mut features,
            IDX_IS_HOLIDAY,
            &one_hot.transform("is_holiday", bool_label(b.is_holiday))?,
        );
        write_block(
            &mut features,
            IDX_VEHICLE_TYPE,
            &one_hot.transform("Vehicle Type", b.vehicle_type.as_deref().unwrap_or(""))?,
        );
        write_block(
            &mut features,
            IDX_FUEL_TYPE,
            &one_hot.transform("Fuel Type", b.fuel_type.as_deref().unwrap_or(""))?,
        );
        write_block(
            &mut features,
            IDX_IS_PEAK_HOUR,
            &one_hot.transform("is_peak_hour", bool_label(b.is_peak_hour))?,
        );
        write_block(
            &mut features,
            IDX_IS_WEEKEND,
            &one_hot.transform("is_weekend", bool_label(b.is_weekend))?,
        );

        features[IDX_HOURLY_RATE] = b.hourly_rate;
        features[IDX_HOURLY_RATE + 1] = b.daily_rate;
        features[IDX_HOURLY_RATE + 2] = b.per_mile;

        rows.push(ScaledRow {
            billed_start: b.billed_start,
            features,
        });
    }
    Ok(ScaledFrame { rows })
}
