//! Pretrained rate regressors and the artifact registry.
//!
//! Every artifact is inference-only: fitted offline, serialized to JSON,
//! loaded once at startup, and never mutated. Which regressor family serves
//! a vehicle type is part of the training contract and is fixed here.

pub mod ensemble;
pub mod network;
pub mod scaler;

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::encoders::{BinaryEncoder, OneHotEncoder};
use crate::error::{PricingError, Result};
use crate::pipeline::schema::{MODEL_INPUT_WIDTH, VEHICLE_TYPES};

pub use ensemble::{GradientBoosted, RegressionTree};
pub use network::DenseNetwork;
pub use scaler::StandardScaler;

/// A single fitted rate regressor.
#[derive(Debug, Clone)]
pub enum Predictor {
    Network(DenseNetwork),
    Boosted(GradientBoosted),
    Tree(RegressionTree),
}

impl Predictor {
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        match self {
            Predictor::Network(model) => model.predict(features),
            Predictor::Boosted(model) => model.predict(features),
            Predictor::Tree(model) => model.predict(features),
        }
    }
}

/// The hourly/daily regressor pair for one vehicle type, plus the scaler
/// the pair was trained behind, when one was fitted.
#[derive(Debug, Clone)]
pub struct ModelFamily {
    pub hourly: Predictor,
    pub daily: Predictor,
    pub scaler: Option<StandardScaler>,
}

impl ModelFamily {
    /// Predict the (hourly, daily) rate pair for one model-input row.
    pub fn predict(&self, features: &[f64]) -> Result<(f64, f64)> {
        if features.len() != MODEL_INPUT_WIDTH {
            return Err(PricingError::FeatureShape {
                expected: MODEL_INPUT_WIDTH,
                actual: features.len(),
            });
        }
        match &self.scaler {
            Some(scaler) => {
                let scaled = scaler.transform(features)?;
                Ok((self.hourly.predict(&scaled)?, self.daily.predict(&scaled)?))
            }
            None => Ok((self.hourly.predict(features)?, self.daily.predict(features)?)),
        }
    }
}

/// Every fitted artifact the service needs, loaded once at startup.
///
/// Encoders are load-or-die: without them no request can be encoded. A
/// missing model family only disables that vehicle type, so it is logged
/// and skipped.
#[derive(Debug, Clone)]
pub struct ArtifactRegistry {
    pub binary: BinaryEncoder,
    pub one_hot: OneHotEncoder,
    families: HashMap<String, ModelFamily>,
}

impl ArtifactRegistry {
    pub fn load(config: &Config) -> Result<Self> {
        let encoders_dir = config.encoders_dir();
        let binary = BinaryEncoder::load(&encoders_dir.join("binary_encoder.json"))?;
        let one_hot = OneHotEncoder::load(&encoders_dir.join("one_hot_encoder.json"))?;

        let models_dir = config.models_dir();
        let mut families = HashMap::new();
        for vehicle_type in VEHICLE_TYPES {
            match load_family(vehicle_type, &models_dir, &encoders_dir) {
                Ok(family) => {
                    families.insert(vehicle_type.to_string(), family);
                }
                Err(err) => {
                    tracing::warn!(vehicle_type, error = %err, "skipping model family");
                }
            }
        }
        tracing::info!(families = families.len(), "loaded model artifacts");
        Ok(Self {
            binary,
            one_hot,
            families,
        })
    }

    /// The fitted family for a vehicle type, if its artifacts loaded.
    pub fn family(&self, vehicle_type: &str) -> Option<&ModelFamily> {
        self.families.get(vehicle_type)
    }

    #[cfg(test)]
    pub fn for_tests(
        binary: BinaryEncoder,
        one_hot: OneHotEncoder,
        families: HashMap<String, ModelFamily>,
    ) -> Self {
        Self {
            binary,
            one_hot,
            families,
        }
    }
}

fn load_family(vehicle_type: &str, models_dir: &Path, encoders_dir: &Path) -> Result<ModelFamily> {
    let model = |suffix: &str| models_dir.join(format!("{vehicle_type}_{suffix}_rate_model.json"));
    match vehicle_type {
        "City" | "7 Seater" => Ok(ModelFamily {
            hourly: Predictor::Network(load_json(&model("nn_hourly"))?),
            daily: Predictor::Network(load_json(&model("nn_daily"))?),
            scaler: Some(StandardScaler::load(
                &encoders_dir.join(format!("scaler_Vehicle Type_{vehicle_type}.json")),
            )?),
        }),
        "Everyday" | "Van" => Ok(ModelFamily {
            hourly: Predictor::Boosted(load_json(&model("xgb_hourly"))?),
            daily: Predictor::Boosted(load_json(&model("xgb_daily"))?),
            scaler: None,
        }),
        "Family" => Ok(ModelFamily {
            hourly: Predictor::Boosted(load_json(&model("xgb_hourly"))?),
            daily: Predictor::Tree(load_json(&model("dt_daily"))?),
            scaler: None,
        }),
        other => Err(PricingError::Artifact {
            name: other.to_string(),
            reason: "no model family is trained for this vehicle type".to_string(),
        }),
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let artifact = |reason: String| PricingError::Artifact {
        name: path.display().to_string(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| artifact(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| artifact(e.to_string()))
}
