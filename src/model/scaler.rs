//! Fitted standardization applied ahead of the dense networks.

use std::path::Path;

use serde::Deserialize;

use crate::error::{PricingError, Result};

/// Per-column mean/scale pairs, fitted offline alongside the networks.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let scaler: StandardScaler = serde_json::from_reader(std::io::BufReader::new(file))?;
        if scaler.mean.len() != scaler.scale.len() {
            return Err(PricingError::Artifact {
                name: path.display().to_string(),
                reason: format!(
                    "mean has {} entries, scale has {}",
                    scaler.mean.len(),
                    scaler.scale.len()
                ),
            });
        }
        Ok(scaler)
    }

    /// Standardize one feature vector. The width must match the fit.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.mean.len() {
            return Err(PricingError::FeatureShape {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| if *s == 0.0 { 0.0 } else { (x - m) / s })
            .collect())
    }
}
