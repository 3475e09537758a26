//! Tariff rule engine.
//!
//! Maps `(year, month, location, vehicle type, fuel type, size category)` to
//! the rate triple in force for that booking. The table is ordered and
//! evaluated top to bottom, first match wins: the year/month regime gates
//! are interleaved with location carve-outs, so a Glasgow booking in April
//! 2024 must resolve against the Glasgow table introduced in September 2023,
//! not the 2024 defaults. Reordering the rules changes prices.

/// An `(hourly, daily, per-mile)` rate triple. Unresolved combinations carry
/// NaN in every field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTriple {
    pub hourly: f64,
    pub daily: f64,
    pub per_mile: f64,
}

impl RateTriple {
    pub const MISSING: RateTriple = RateTriple {
        hourly: f64::NAN,
        daily: f64::NAN,
        per_mile: f64::NAN,
    };

    const fn new(hourly: f64, daily: f64, per_mile: f64) -> Self {
        Self {
            hourly,
            daily,
            per_mile,
        }
    }

    /// True when the triple is the unresolved sentinel.
    pub fn is_missing(&self) -> bool {
        self.hourly.is_nan() && self.daily.is_nan() && self.per_mile.is_nan()
    }
}

type RateRow = (&'static str, RateTriple);
type EvRow = (&'static str, f64);

/// Pre-2022 rates, keyed by size category.
const HISTORICAL: [RateRow; 6] = [
    ("Small", RateTriple::new(4.75, 33.25, 0.18)),
    ("Medium", RateTriple::new(5.50, 38.50, 0.18)),
    ("Large", RateTriple::new(6.25, 43.75, 0.18)),
    ("Family", RateTriple::new(7.25, 50.75, 0.20)),
    ("Van", RateTriple::new(7.50, 60.00, 0.22)),
    ("7 Seater", RateTriple::new(7.50, 60.00, 0.22)),
];

/// February to October 2022, keyed by vehicle type.
const RATES_2022: [RateRow; 6] = [
    ("City", RateTriple::new(5.00, 40.00, 0.20)),
    ("Everyday", RateTriple::new(5.75, 46.00, 0.20)),
    ("Family", RateTriple::new(6.50, 52.00, 0.22)),
    ("7 Seater", RateTriple::new(7.50, 60.00, 0.22)),
    ("Van", RateTriple::new(7.50, 60.00, 0.22)),
    ("Hydrogen", RateTriple::new(7.50, 60.00, 0.31)),
];

const EV_2022: [EvRow; 5] = [
    ("City", 0.05),
    ("Everyday", 0.05),
    ("Family", 0.05),
    ("7 Seater", 0.07),
    ("Van", 0.07),
];

/// November 2022 through August 2023.
const RATES_LATE_2022: [RateRow; 6] = [
    ("City", RateTriple::new(5.00, 40.00, 0.22)),
    ("Everyday", RateTriple::new(5.95, 47.60, 0.22)),
    ("Family", RateTriple::new(6.70, 53.60, 0.22)),
    ("7 Seater", RateTriple::new(7.70, 61.60, 0.24)),
    ("Van", RateTriple::new(7.70, 61.60, 0.24)),
    ("Hydrogen", RateTriple::new(7.70, 61.60, 0.31)),
];

/// Glasgow from September 2023 onwards.
const RATES_GLASGOW: [RateRow; 6] = [
    ("City", RateTriple::new(4.95, 39.60, 0.22)),
    ("Everyday", RateTriple::new(5.75, 46.00, 0.22)),
    ("Family", RateTriple::new(6.50, 52.00, 0.22)),
    ("7 Seater", RateTriple::new(7.50, 60.00, 0.24)),
    ("Van", RateTriple::new(7.50, 60.00, 0.24)),
    ("Hydrogen", RateTriple::new(7.50, 60.00, 0.31)),
];

/// September 2023 defaults (also kept by four depots past April 2024).
const RATES_SEP_2023: [RateRow; 6] = [
    ("City", RateTriple::new(5.50, 44.00, 0.23)),
    ("Everyday", RateTriple::new(6.50, 52.00, 0.23)),
    ("Family", RateTriple::new(7.40, 59.20, 0.23)),
    ("7 Seater", RateTriple::new(8.50, 68.00, 0.25)),
    ("Van", RateTriple::new(8.50, 68.00, 0.25)),
    ("Hydrogen", RateTriple::new(8.50, 68.00, 0.31)),
];

/// Shropshire from April 2024.
const RATES_SHROPSHIRE: [RateRow; 6] = [
    ("City", RateTriple::new(5.00, 40.00, 0.22)),
    ("Everyday", RateTriple::new(6.50, 52.00, 0.23)),
    ("Family", RateTriple::new(7.40, 59.20, 0.23)),
    ("7 Seater", RateTriple::new(7.70, 61.60, 0.24)),
    ("Van", RateTriple::new(7.70, 61.60, 0.24)),
    ("Hydrogen", RateTriple::new(7.70, 61.60, 0.31)),
];

/// Newcastle and Canterbury from April 2024. No Hydrogen row.
const RATES_NEWCASTLE: [RateRow; 5] = [
    ("City", RateTriple::new(5.50, 44.00, 0.24)),
    ("Everyday", RateTriple::new(6.80, 52.00, 0.24)),
    ("Family", RateTriple::new(7.50, 59.20, 0.24)),
    ("7 Seater", RateTriple::new(9.00, 68.00, 0.27)),
    ("Van", RateTriple::new(9.00, 68.00, 0.27)),
];

/// Plymouth from April 2024.
const RATES_PLYMOUTH: [RateRow; 6] = [
    ("City", RateTriple::new(5.50, 44.00, 0.23)),
    ("Everyday", RateTriple::new(7.25, 58.00, 0.23)),
    ("Family", RateTriple::new(8.20, 65.60, 0.23)),
    ("7 Seater", RateTriple::new(8.50, 68.00, 0.25)),
    ("Van", RateTriple::new(8.50, 68.00, 0.25)),
    ("Hydrogen", RateTriple::new(8.50, 68.00, 0.31)),
];

/// Default rates from 2024 onwards.
const RATES_2024: [RateRow; 6] = [
    ("City", RateTriple::new(5.75, 44.00, 0.24)),
    ("Everyday", RateTriple::new(7.25, 52.00, 0.24)),
    ("Family", RateTriple::new(8.15, 59.20, 0.24)),
    ("7 Seater", RateTriple::new(9.90, 68.00, 0.27)),
    ("Van", RateTriple::new(9.90, 68.00, 0.27)),
    ("Hydrogen", RateTriple::new(9.90, 68.00, 0.31)),
];

const EV_012: [EvRow; 5] = [
    ("City", 0.12),
    ("Everyday", 0.12),
    ("Family", 0.12),
    ("7 Seater", 0.12),
    ("Van", 0.12),
];

const EV_013: [EvRow; 5] = [
    ("City", 0.13),
    ("Everyday", 0.13),
    ("Family", 0.13),
    ("7 Seater", 0.13),
    ("Van", 0.13),
];

const EV_014: [EvRow; 5] = [
    ("City", 0.14),
    ("Everyday", 0.14),
    ("Family", 0.14),
    ("7 Seater", 0.14),
    ("Van", 0.14),
];

const EV_015: [EvRow; 5] = [
    ("City", 0.15),
    ("Everyday", 0.15),
    ("Family", 0.15),
    ("7 Seater", 0.15),
    ("Van", 0.15),
];

/// True from `(y0, m0)` onwards.
fn since(year: i32, month: u32, y0: i32, m0: u32) -> bool {
    year > y0 || (year == y0 && month >= m0)
}

fn lookup(table: &[RateRow], key: Option<&str>) -> RateTriple {
    key.and_then(|k| table.iter().find(|(name, _)| *name == k))
        .map(|(_, triple)| *triple)
        .unwrap_or(RateTriple::MISSING)
}

fn ev_override(table: &[EvRow], key: Option<&str>, current: f64) -> f64 {
    key.and_then(|k| table.iter().find(|(name, _)| *name == k))
        .map(|(_, per_mile)| *per_mile)
        .unwrap_or(current)
}

/// Vehicle-type table with a per-mile override for EVs.
fn with_ev(
    table: &[RateRow],
    ev_table: &[EvRow],
    vehicle_type: Option<&str>,
    fuel_type: Option<&str>,
) -> RateTriple {
    let mut triple = lookup(table, vehicle_type);
    if fuel_type == Some("EV") {
        triple.per_mile = ev_override(ev_table, vehicle_type, triple.per_mile);
    }
    triple
}

/// Rate triple in force for a booking.
///
/// `location` is the resolved human-readable depot name; `size_category`
/// only participates in the pre-2022 regime.
pub fn rate_of(
    year: i32,
    month: u32,
    location: Option<&str>,
    vehicle_type: Option<&str>,
    fuel_type: Option<&str>,
    size_category: Option<&str>,
) -> RateTriple {
    if year < 2022 || (year == 2022 && month == 1) {
        let mut triple = lookup(&HISTORICAL, size_category);
        if fuel_type == Some("EV") {
            triple = RateTriple::new(5.50, 38.50, 0.18);
        }
        triple
    } else if year == 2022 && (2..=10).contains(&month) {
        with_ev(&RATES_2022, &EV_2022, vehicle_type, fuel_type)
    } else if (year == 2022 && month >= 11) || (year == 2023 && month <= 8) {
        with_ev(&RATES_LATE_2022, &EV_012, vehicle_type, fuel_type)
    } else if location == Some("Glasgow") && since(year, month, 2023, 9) {
        with_ev(&RATES_GLASGOW, &EV_012, vehicle_type, fuel_type)
    } else if location == Some("Tunbridge Wells") && year == 2023 && month >= 9 {
        with_ev(&RATES_LATE_2022, &EV_012, vehicle_type, fuel_type)
    } else if year == 2023 && month >= 9 {
        with_ev(&RATES_SEP_2023, &EV_013, vehicle_type, fuel_type)
    } else if matches!(
        location,
        // "Saffron Waldron" is how the rule was written upstream; the
        // location table spells the depot "Saffron Walden", so this arm
        // only ever matches the misspelling. Kept verbatim.
        Some("Tunbridge Wells" | "Saffron Waldron" | "Eastbourne" | "Salisbury")
    ) && since(year, month, 2024, 4)
    {
        with_ev(&RATES_SEP_2023, &EV_013, vehicle_type, fuel_type)
    } else if location == Some("Shropshire") && since(year, month, 2024, 4) {
        with_ev(&RATES_SHROPSHIRE, &EV_012, vehicle_type, fuel_type)
    } else if matches!(location, Some("Newcastle" | "Canterbury")) && since(year, month, 2024, 4) {
        with_ev(&RATES_NEWCASTLE, &EV_014, vehicle_type, fuel_type)
    } else if location == Some("Plymouth") && since(year, month, 2024, 4) {
        with_ev(&RATES_PLYMOUTH, &EV_015, vehicle_type, fuel_type)
    } else {
        with_ev(&RATES_2024, &EV_014, vehicle_type, fuel_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(
        year: i32,
        month: u32,
        location: &str,
        vehicle_type: &str,
        fuel_type: &str,
    ) -> RateTriple {
        rate_of(
            year,
            month,
            Some(location),
            Some(vehicle_type),
            Some(fuel_type),
            None,
        )
    }

    #[test]
    fn test_historical_small_petrol() {
        let t = rate_of(
            2021,
            5,
            Some("Bristol"),
            Some("Small"),
            Some("Petrol"),
            Some("Small"),
        );
        assert_eq!(t, RateTriple::new(4.75, 33.25, 0.18));
    }

    #[test]
    fn test_historical_ev_overrides_whole_triple() {
        let t = rate_of(
            2021,
            5,
            Some("Bristol"),
            Some("City"),
            Some("EV"),
            Some("Large"),
        );
        assert_eq!(t, RateTriple::new(5.50, 38.50, 0.18));
    }

    #[test]
    fn test_january_2022_is_still_historical() {
        let t = rate_of(2022, 1, Some("Oxford"), None, Some("Petrol"), Some("Van"));
        assert_eq!(t, RateTriple::new(7.50, 60.00, 0.22));
    }

    #[test]
    fn test_2022_ev_overrides_per_mile_only() {
        let t = rate(2022, 6, "Bristol", "City", "EV");
        assert_eq!(t, RateTriple::new(5.00, 40.00, 0.05));
    }

    #[test]
    fn test_glasgow_carve_out_beats_2024_defaults() {
        let t = rate(2024, 4, "Glasgow", "Family", "Petrol");
        assert_eq!(t, RateTriple::new(6.50, 52.00, 0.22));
    }

    #[test]
    fn test_plymouth_van_ev() {
        let t = rate(2024, 4, "Plymouth", "Van", "EV");
        assert_eq!(t, RateTriple::new(8.50, 68.00, 0.15));
    }

    #[test]
    fn test_newcastle_has_no_hydrogen_row() {
        let t = rate(2024, 5, "Newcastle", "Hydrogen", "Hydrogen");
        assert!(t.is_missing());
    }

    #[test]
    fn test_saffron_walden_misspelling_falls_through() {
        // The carve-out names "Saffron Waldron"; the real depot name does not
        // match, so it prices at the 2024 defaults.
        let t = rate(2024, 6, "Saffron Walden", "City", "Petrol");
        assert_eq!(t, RateTriple::new(5.75, 44.00, 0.24));
        let t = rate(2024, 6, "Saffron Waldron", "City", "Petrol");
        assert_eq!(t, RateTriple::new(5.50, 44.00, 0.23));
    }

    #[test]
    fn test_tunbridge_wells_legacy_window_is_2023_only() {
        let legacy = rate(2023, 10, "Tunbridge Wells", "Everyday", "Petrol");
        assert_eq!(legacy, RateTriple::new(5.95, 47.60, 0.22));
        let current = rate(2024, 5, "Tunbridge Wells", "Everyday", "Petrol");
        assert_eq!(current, RateTriple::new(6.50, 52.00, 0.23));
    }

    #[test]
    fn test_unknown_vehicle_type_is_missing() {
        let t = rate(2024, 6, "Oxford", "Various", "Petrol");
        assert!(t.is_missing());
    }

    #[test]
    fn test_early_2024_uses_defaults_not_april_carve_outs() {
        // Plymouth before April 2024 falls to the default 2024 table.
        let t = rate(2024, 2, "Plymouth", "City", "Petrol");
        assert_eq!(t, RateTriple::new(5.75, 44.00, 0.24));
    }
}
