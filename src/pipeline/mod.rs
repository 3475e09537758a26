//! Feature pipeline: cleaning, joining, feature engineering, transforms.
//!
//! The pipeline turns the raw tables into two frames:
//!
//! - the annotated [`Booking`] rows, which keep human-readable fields and
//!   feed the demand estimator and the profitability calculator;
//! - the encoded [`ScaledFrame`], laid out in the frozen model schema, which
//!   feeds the rate predictor.

pub mod preprocess;
pub mod schema;
pub mod transform;

pub use preprocess::preprocess;
pub use transform::{ScaledFrame, ScaledRow, encode, inverse_transform, transform};

use chrono::NaiveDateTime;

/// Season bands by day of year.
///
/// The bands come from a predicate chain evaluated in order: June always
/// resolves to Spring and September to Summer even though the written bands
/// overlap. The chain is the contract, not the band labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Autumn,
    Summer,
    Spring,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Autumn => "Autumn",
            Season::Summer => "Summer",
            Season::Spring => "Spring",
        }
    }

    /// Season for a calendar date.
    pub fn of(month: u32, day: u32) -> Season {
        if (month == 3 && day >= 1) || (month > 3 && month < 6) || (month == 6 && day <= 30) {
            Season::Spring
        } else if (month == 6 && day >= 1) || (month > 6 && month < 9) || (month == 9 && day <= 30)
        {
            Season::Summer
        } else if (month == 9 && day >= 1) || (month > 9 && month < 12) || (month == 12 && day <= 31)
        {
            Season::Autumn
        } else {
            Season::Winter
        }
    }
}

/// Fixed holiday predicate: Christmas week through New Year's Day plus the
/// observed bank holidays.
pub fn is_holiday(month: u32, day: u32) -> bool {
    (month == 12 && day >= 24)
        || (month == 1 && day <= 1)
        || (month == 5 && day == 27)
        || (month == 3 && day == 29)
        || (month == 8 && day == 26)
        || (month == 4 && day == 1)
        || (month == 5 && day == 6)
}

/// One cleaned, annotated booking.
///
/// Date-part and usage fields are `f64` so that missing values can ride
/// along as NaN, the way the source frames carried them. The six capped
/// numeric fields are in log space after [`transform`] and back in raw
/// space after [`inverse_transform`].
#[derive(Debug, Clone)]
pub struct Booking {
    pub location: Option<String>,
    pub vehicle_type: Option<String>,
    pub fuel_type: Option<String>,

    pub billed_start: NaiveDateTime,
    pub billed_start_hour: f64,
    pub billed_start_dayofweek: f64,
    pub billed_start_month: f64,
    pub billed_start_year: f64,
    pub billed_end_hour: f64,
    pub billed_end_dayofweek: f64,
    pub billed_end_month: f64,
    pub billed_end_year: f64,
    pub created_at_hour: f64,
    pub created_at_dayofweek: f64,
    pub created_at_month: f64,
    pub created_at_year: f64,

    pub is_weekend: bool,
    pub is_peak_hour: bool,
    pub season: Season,
    pub is_holiday: bool,

    pub actual_duration: f64,
    pub billed_duration: f64,
    pub mileage: f64,
    pub actual_cost_distance: f64,
    pub actual_cost_time: f64,
    pub actual_cost_total: f64,

    pub rates_hours: f64,
    pub rates_24hours: f64,
    pub rates_overnight: f64,

    pub hourly_rate: f64,
    pub daily_rate: f64,
    pub per_mile: f64,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_bands() {
        assert_eq!(Season::of(1, 15), Season::Winter);
        assert_eq!(Season::of(2, 28), Season::Winter);
        assert_eq!(Season::of(3, 1), Season::Spring);
        assert_eq!(Season::of(5, 31), Season::Spring);
        // June falls in both written bands; the chain resolves it to Spring.
        assert_eq!(Season::of(6, 15), Season::Spring);
        assert_eq!(Season::of(7, 1), Season::Summer);
        // September likewise resolves to Summer, not Autumn.
        assert_eq!(Season::of(9, 30), Season::Summer);
        assert_eq!(Season::of(10, 1), Season::Autumn);
        // December is inside the written Autumn band.
        assert_eq!(Season::of(12, 31), Season::Autumn);
    }

    #[test]
    fn test_holiday_dates() {
        assert!(is_holiday(12, 24));
        assert!(is_holiday(12, 31));
        assert!(is_holiday(1, 1));
        assert!(is_holiday(3, 29));
        assert!(is_holiday(4, 1));
        assert!(is_holiday(5, 6));
        assert!(is_holiday(5, 27));
        assert!(is_holiday(8, 26));
        assert!(!is_holiday(1, 2));
        assert!(!is_holiday(12, 23));
        assert!(!is_holiday(7, 4));
    }
}
