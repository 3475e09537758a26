//! Frozen feature schema.
//!
//! The structured frame column order and the 47-wide model input derived
//! from it are a wire contract with the pretrained regressors. Do not
//! reorder.

use crate::encoders::LOCATION_BITS;

/// Columns of a scaled row, in order, with `booking_billed_start` held
/// separately on the row (it is a timestamp, not a feature value).
pub const FRAME_COLUMNS: [&str; FRAME_WIDTH] = [
    "location_0",
    "location_1",
    "location_2",
    "location_3",
    "location_4",
    "location_5",
    "location_6",
    "booking_actual_duration",
    "booking_billed_start_hour",
    "booking_billed_start_dayofweek",
    "booking_billed_start_month",
    "booking_billed_start_year",
    "booking_billed_end_hour",
    "booking_billed_end_dayofweek",
    "booking_billed_end_month",
    "booking_billed_end_year",
    "booking_billed_duration",
    "booking_mileage",
    "booking_rates_hours",
    "booking_rates_24hours",
    "booking_rates_overnight",
    "booking_actual_cost_distance",
    "booking_actual_cost_time",
    "booking_actual_cost_total",
    "booking_created_at_hour",
    "booking_created_at_dayofweek",
    "booking_created_at_month",
    "booking_created_at_year",
    "season_Winter",
    "season_Autumn",
    "season_Summer",
    "season_Spring",
    "is_holiday_1.0",
    "is_holiday_0.0",
    "Vehicle Type_City",
    "Vehicle Type_Everyday",
    "Vehicle Type_Family",
    "Vehicle Type_Van",
    "Vehicle Type_7 Seater",
    "Fuel Type_Petrol",
    "Fuel Type_EV",
    "Fuel Type_Hydrogen",
    "is_peak_hour_1.0",
    "is_peak_hour_0.0",
    "is_weekend_1.0",
    "is_weekend_0.0",
    "hourly_rate",
    "daily_rate",
    "per_mile",
];

/// Feature count of a scaled row.
pub const FRAME_WIDTH: usize = 49;

/// Width of the model input: the frame minus the two rate targets.
pub const MODEL_INPUT_WIDTH: usize = 47;

pub const IDX_ACTUAL_DURATION: usize = LOCATION_BITS;
pub const IDX_BILLED_DURATION: usize = 16;
pub const IDX_MILEAGE: usize = 17;
pub const IDX_RATES_HOURS: usize = 18;
pub const IDX_RATES_24HOURS: usize = 19;
pub const IDX_COST_DISTANCE: usize = 21;
pub const IDX_COST_TIME: usize = 22;
pub const IDX_COST_TOTAL: usize = 23;
pub const IDX_SEASON: usize = 28;
pub const IDX_IS_HOLIDAY: usize = 32;
pub const IDX_VEHICLE_TYPE: usize = 34;
pub const IDX_FUEL_TYPE: usize = 39;
pub const IDX_IS_PEAK_HOUR: usize = 42;
pub const IDX_IS_WEEKEND: usize = 44;
pub const IDX_HOURLY_RATE: usize = 46;
pub const IDX_DAILY_RATE: usize = 47;
pub const IDX_PER_MILE: usize = 48;

/// The six log-transformed numeric fields, by frame index.
pub const LOG_FIELDS: [usize; 6] = [
    IDX_ACTUAL_DURATION,
    IDX_BILLED_DURATION,
    IDX_MILEAGE,
    IDX_COST_DISTANCE,
    IDX_COST_TIME,
    IDX_COST_TOTAL,
];

/// Vehicle type one-hot order; offsets are relative to [`IDX_VEHICLE_TYPE`].
pub const VEHICLE_TYPES: [&str; 5] = ["City", "Everyday", "Family", "Van", "7 Seater"];

/// Project a frame row onto the model input (drops the two rate targets).
pub fn model_input(features: &[f64; FRAME_WIDTH]) -> [f64; MODEL_INPUT_WIDTH] {
    let mut out = [0.0; MODEL_INPUT_WIDTH];
    out[..IDX_HOURLY_RATE].copy_from_slice(&features[..IDX_HOURLY_RATE]);
    out[MODEL_INPUT_WIDTH - 1] = features[IDX_PER_MILE];
    out
}
