//! `fleetrate`: dynamic rental-rate pricing for a shared vehicle fleet.
//!
//! Given a depot and an hour of day, the service rebuilds a feature frame
//! from historical bookings, predicts a baseline hourly and daily rate per
//! vehicle type with pretrained regressors, uplifts the baseline by a
//! demand factor derived from peak-hour and depot-popularity statistics,
//! clamps the result against per-depot averages, and estimates what the
//! adjusted rates would have earned over the trailing month compared with
//! realized revenue.
//!
//! Pipeline, in order:
//!
//! 1. [`data`] loads the raw booking and tariff tables.
//! 2. [`pipeline`] cleans, joins, feature-engineers, log-transforms and
//!    encodes the rows into the frozen model input schema.
//! 3. [`predict`] produces per-vehicle-type baseline rates.
//! 4. [`demand`] supplies the composite demand factor.
//! 5. [`adjust`] applies the uplift and the ceiling clamp.
//! 6. [`profitability`] reprices the trailing month of bookings.
//! 7. [`service`] wires the steps behind the HTTP surface.

pub mod adjust;
pub mod config;
pub mod data;
pub mod demand;
pub mod encoders;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod predict;
pub mod profitability;
pub mod service;
pub mod stats;
pub mod tariff;

pub use config::Config;
pub use error::{PricingError, Result};
