//! HTTP service: the depot picker page and the pricing endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::adjust;
use crate::config::Config;
use crate::data;
use crate::demand;
use crate::error::{PricingError, Result};
use crate::model::ArtifactRegistry;
use crate::pipeline;
use crate::predict;
use crate::profitability;

/// Shared state for the pricing service.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<ArtifactRegistry>,
}

/// A pricing request from the depot picker form.
#[derive(Debug, Deserialize)]
pub struct PricingRequest {
    pub location: String,
    pub hour_of_the_day: f64,
}

/// Current and adjusted rates for one vehicle type.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RateQuote {
    pub current_hourly_rate: f64,
    pub current_daily_rate: f64,
    pub adjusted_hourly_rate: f64,
    pub adjusted_daily_rate: f64,
}

/// Trailing-month revenue comparison for one vehicle type.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RevenueSummary {
    pub adjusted_revenue: f64,
    pub actual_revenue: f64,
    pub profitability: f64,
}

/// The pricing endpoint's response body.
#[derive(Debug, Serialize)]
pub struct PricingResponse {
    #[serde(rename = "peakHours")]
    pub peak_hours: Vec<f64>,
    pub predictions: BTreeMap<String, RateQuote>,
    /// Keyed by vehicle type, plus a `"Z"` grand-total row that sorts
    /// after every type name.
    pub profitability: BTreeMap<String, RevenueSummary>,
}

/// The pricing service.
pub struct PricingService;

impl PricingService {
    /// Build the axum router.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(depot_picker).post(price_quote))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind and serve until shutdown.
    pub async fn start(state: AppState, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let addr = format!("{}:{}", state.config.host, state.config.port);
        let router = Self::router(state);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("pricing service listening on {addr}");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

async fn depot_picker(State(state): State<AppState>) -> Result<Html<String>> {
    let locations = selectable(&state.config)?;
    let options: String = locations
        .iter()
        .map(|loc| format!("<option value=\"{loc}\">{loc}</option>\n"))
        .collect();
    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Dynamic Pricing</title></head>\n<body>\n\
         <h1>Dynamic Pricing</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"location\">Depot</label>\n\
         <select name=\"location\" id=\"location\">\n{options}</select>\n\
         <label for=\"hour_of_the_day\">Hour of the day</label>\n\
         <input type=\"number\" name=\"hour_of_the_day\" id=\"hour_of_the_day\" \
         min=\"0\" max=\"23\" step=\"1\" value=\"9\">\n\
         <button type=\"submit\">Price</button>\n\
         </form>\n</body>\n</html>\n"
    )))
}

async fn price_quote(
    State(state): State<AppState>,
    Form(request): Form<PricingRequest>,
) -> Result<Json<PricingResponse>> {
    if !(0.0..24.0).contains(&request.hour_of_the_day) {
        return Err(PricingError::InvalidHour(request.hour_of_the_day));
    }
    let depots = selectable(&state.config)?;
    if !depots.contains(&request.location) {
        return Err(PricingError::UnknownLocation(request.location));
    }

    let config = state.config.clone();
    let registry = Arc::clone(&state.registry);
    // The pipeline re-reads and re-derives the whole history; keep it off
    // the async workers.
    let response = tokio::task::spawn_blocking(move || {
        price(&config, &registry, &request.location, request.hour_of_the_day)
    })
    .await
    .map_err(|e| PricingError::Data(format!("pricing task failed: {e}")))??;
    Ok(Json(response))
}

fn selectable(config: &Config) -> Result<Vec<String>> {
    let index = data::load_location_index(&config.transformed_path())?;
    data::selectable_locations(&index)
}

/// Run the full pricing pipeline for one depot and hour.
pub fn price(
    config: &Config,
    registry: &ArtifactRegistry,
    location: &str,
    hour: f64,
) -> Result<PricingResponse> {
    let (raw, tariffs) = data::load_tables(&config.bookings_path(), &config.tariffs_path())?;
    let mut bookings = pipeline::preprocess(&raw, &tariffs);
    pipeline::transform(&mut bookings);
    let frame = pipeline::encode(&bookings, &registry.binary, &registry.one_hot)?;

    let predictions = predict::predict_rates(&frame, registry, location);
    if predictions.is_empty() {
        return Err(PricingError::NoRecentBookings(location.to_string()));
    }

    let (demand, peak_hours) = demand::demand_factor(&bookings, location, hour);
    tracing::debug!(location, hour, demand, "demand factor");
    let averages = adjust::average_rates(&bookings, location);
    let pricing = adjust::apply_pricing_strategy(&predictions, demand, &averages);
    let revenue = profitability::calculate_profitability(&bookings, location, &pricing);

    let predictions = pricing
        .iter()
        .map(|p| {
            (
                p.vehicle_type.clone(),
                RateQuote {
                    current_hourly_rate: p.current_hourly_rate,
                    current_daily_rate: p.current_daily_rate,
                    adjusted_hourly_rate: p.adjusted_hourly_rate,
                    adjusted_daily_rate: p.adjusted_daily_rate,
                },
            )
        })
        .collect();

    let mut profitability: BTreeMap<String, RevenueSummary> = revenue
        .iter()
        .map(|r| {
            (
                r.vehicle_type.clone(),
                RevenueSummary {
                    adjusted_revenue: r.adjusted_revenue,
                    actual_revenue: r.actual_revenue,
                    profitability: r.profitability,
                },
            )
        })
        .collect();
    profitability.insert(
        "Z".to_string(),
        RevenueSummary {
            adjusted_revenue: revenue.iter().map(|r| r.adjusted_revenue).sum(),
            actual_revenue: revenue.iter().map(|r| r.actual_revenue).sum(),
            profitability: revenue.iter().map(|r| r.profitability).sum(),
        },
    );

    Ok(PricingResponse {
        peak_hours,
        predictions,
        profitability,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::EXCLUDED_LOCATIONS;

    const BOOKING_HEADERS: &str = "booking_id,Contract,booking_tariff,location_office_use,\
         location_description,booking_start,booking_end,booking_actual_start,booking_actual_end,\
         booking_billed_start,booking_billed_end,booking_created_at,booking_cancelled_at,\
         booking_duration,booking_actual_duration,booking_billed_duration,booking_mileage,\
         booking_rates_hours,booking_rates_24hours,booking_rates_overnight,\
         booking_actual_cost_distance,booking_actual_cost_time,booking_actual_cost_total";

    fn write_fixtures(root: &Path) -> Config {
        let data = root.join("data");
        std::fs::create_dir(&data).unwrap();
        std::fs::write(
            data.join("2024 Bookings.csv"),
            format!(
                "{BOOKING_HEADERS}\nV1,PAYG,Van Standard,BRI,,,,,,\
                 2024-05-01 10:00:00,2024-05-02 10:00:00,2024-04-30 09:15:00,,,\
                 120,120,14.5,2.0,0,0,3.48,11.50,14.98\n"
            ),
        )
        .unwrap();
        std::fs::write(
            data.join("Diff Tariffs.csv"),
            "Tariff,PAYG or Contract,Vehicle Type,Petrol Or EV,Size Category,Notes\n\
             Van Standard,PAYG,Van,Petrol,Large,\n",
        )
        .unwrap();
        let mut index = String::from("location\nBristol\n");
        for location in EXCLUDED_LOCATIONS {
            index.push_str(location);
            index.push('\n');
        }
        std::fs::write(data.join("transformed_dataset.csv"), index).unwrap();

        let encoders = root.join("artifacts/encoders");
        std::fs::create_dir_all(&encoders).unwrap();
        std::fs::write(
            encoders.join("binary_encoder.json"),
            serde_json::json!({ "categories": ["Bristol"] }).to_string(),
        )
        .unwrap();
        std::fs::write(
            encoders.join("one_hot_encoder.json"),
            serde_json::json!({
                "features": [
                    { "name": "season", "categories": ["Winter", "Autumn", "Summer", "Spring"] },
                    { "name": "is_holiday", "categories": ["1.0", "0.0"] },
                    { "name": "Vehicle Type",
                      "categories": ["City", "Everyday", "Family", "Van", "7 Seater"] },
                    { "name": "Fuel Type", "categories": ["Petrol", "EV", "Hydrogen"] },
                    { "name": "is_peak_hour", "categories": ["1.0", "0.0"] },
                    { "name": "is_weekend", "categories": ["1.0", "0.0"] },
                ]
            })
            .to_string(),
        )
        .unwrap();

        let models = root.join("artifacts/models");
        std::fs::create_dir_all(&models).unwrap();
        let stump = |value: f64| {
            serde_json::json!({
                "base_score": 0.0,
                "trees": [{
                    "children_left": [-1],
                    "children_right": [-1],
                    "feature": [-2],
                    "threshold": [0.0],
                    "value": [value],
                }],
            })
            .to_string()
        };
        std::fs::write(models.join("Van_xgb_hourly_rate_model.json"), stump(6.0)).unwrap();
        std::fs::write(models.join("Van_xgb_daily_rate_model.json"), stump(48.0)).unwrap();

        Config::parse_from([
            "fleetrate",
            "--data-dir",
            data.to_str().unwrap(),
            "--artifacts-dir",
            root.join("artifacts").to_str().unwrap(),
        ])
    }

    #[test]
    fn test_price_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixtures(dir.path());
        let registry = ArtifactRegistry::load(&config).unwrap();

        let response = price(&config, &registry, "Bristol", 9.0).unwrap();

        // One creation hour in the history, so it is the peak.
        assert_eq!(response.peak_hours, vec![9.0]);

        // Demand 1.0 doubles the stump predictions; the depot averages
        // (the 2024 Van tariff) leave both inside the ceiling.
        let van = &response.predictions["Van"];
        assert_eq!(van.current_hourly_rate, 9.9);
        assert_eq!(van.current_daily_rate, 68.0);
        assert_eq!(van.adjusted_hourly_rate, 12.0);
        assert_eq!(van.adjusted_daily_rate, 96.0);

        // One booking repriced: 2h at 12.00 plus 3.48 distance.
        let van_revenue = &response.profitability["Van"];
        assert_eq!(van_revenue.actual_revenue, 14.98);
        assert_eq!(van_revenue.adjusted_revenue, 27.48);
        assert!((van_revenue.profitability - 12.5).abs() < 1e-9);
        assert_eq!(response.profitability["Z"], *van_revenue);
    }

    #[test]
    fn test_depot_without_history_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixtures(dir.path());
        let registry = ArtifactRegistry::load(&config).unwrap();
        let err = price(&config, &registry, "Perth", 9.0).unwrap_err();
        assert!(matches!(err, PricingError::NoRecentBookings(_)));
    }

    #[test]
    fn test_grand_total_row_sorts_last() {
        let mut profitability = BTreeMap::new();
        for vehicle_type in ["City", "Van", "7 Seater", "Everyday", "Family"] {
            profitability.insert(
                vehicle_type.to_string(),
                RevenueSummary {
                    adjusted_revenue: 1.0,
                    actual_revenue: 1.0,
                    profitability: 0.0,
                },
            );
        }
        profitability.insert(
            "Z".to_string(),
            RevenueSummary {
                adjusted_revenue: 5.0,
                actual_revenue: 5.0,
                profitability: 0.0,
            },
        );
        let last = profitability.keys().next_back().unwrap();
        assert_eq!(last, "Z");
    }

    #[test]
    fn test_response_shape() {
        let response = PricingResponse {
            peak_hours: vec![9.0, 17.0],
            predictions: BTreeMap::from([(
                "City".to_string(),
                RateQuote {
                    current_hourly_rate: 5.75,
                    current_daily_rate: 44.0,
                    adjusted_hourly_rate: 6.2,
                    adjusted_daily_rate: 46.5,
                },
            )]),
            profitability: BTreeMap::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["peakHours"], serde_json::json!([9.0, 17.0]));
        assert_eq!(json["predictions"]["City"]["adjusted_hourly_rate"], 6.2);
    }
}
