//! Fitted categorical encoders.
//!
//! Both encoders are frozen artifacts: the category order was fixed when the
//! models were trained, and the encoded column layout is part of the model
//! input contract. They are loaded once at startup and never refitted.

use std::path::Path;

use serde::Deserialize;

use crate::error::{PricingError, Result};

/// Width of the binary-encoded location block.
pub const LOCATION_BITS: usize = 7;

/// Binary encoder for the high-cardinality `location` feature.
///
/// A category's ordinal is its fitted index plus one; the ordinal is spread
/// big-endian over [`LOCATION_BITS`] columns. Unknown or missing categories
/// encode as ordinal zero (all bits clear), and an all-clear block decodes
/// back to `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct BinaryEncoder {
    categories: Vec<String>,
}

impl BinaryEncoder {
    pub fn new(categories: Vec<String>) -> Self {
        Self { categories }
    }

    /// Load the fitted encoder from its JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let encoder: Self = serde_json::from_str(&raw)?;
        if encoder.categories.len() >= (1 << LOCATION_BITS) {
            return Err(PricingError::Artifact {
                name: path.display().to_string(),
                reason: format!(
                    "{} categories do not fit in {LOCATION_BITS} bits",
                    encoder.categories.len()
                ),
            });
        }
        Ok(encoder)
    }

    /// Encode a location into its bit columns.
    pub fn transform(&self, location: Option<&str>) -> [f64; LOCATION_BITS] {
        let ordinal = location
            .and_then(|loc| self.categories.iter().position(|c| c == loc))
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let mut bits = [0.0; LOCATION_BITS];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = ((ordinal >> (LOCATION_BITS - 1 - i)) & 1) as f64;
        }
        bits
    }

    /// Decode bit columns back into the fitted category.
    pub fn inverse(&self, bits: &[f64; LOCATION_BITS]) -> Option<&str> {
        let mut ordinal = 0usize;
        for bit in bits {
            ordinal = (ordinal << 1) | (*bit != 0.0) as usize;
        }
        if ordinal == 0 {
            return None;
        }
        self.categories.get(ordinal - 1).map(String::as_str)
    }
}

/// One fitted one-hot feature: its name and category order.
#[derive(Debug, Clone, Deserialize)]
pub struct OneHotFeature {
    pub name: String,
    pub categories: Vec<String>,
}

/// One-hot encoder for the low-cardinality categoricals.
#[derive(Debug, Clone, Deserialize)]
pub struct OneHotEncoder {
    features: Vec<OneHotFeature>,
}

impl OneHotEncoder {
    pub fn new(features: Vec<OneHotFeature>) -> Self {
        Self { features }
    }

    /// Load the fitted encoder from its JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Category order for a feature, if fitted.
    pub fn categories(&self, feature: &str) -> Option<&[String]> {
        self.features
            .iter()
            .find(|f| f.name == feature)
            .map(|f| f.categories.as_slice())
    }

    /// One-hot columns for a feature value, in fitted category order.
    /// Unknown values produce an all-zero block.
    pub fn transform(&self, feature: &str, value: &str) -> Result<Vec<f64>> {
        let categories = self.categories(feature).ok_or_else(|| PricingError::Artifact {
            name: "one_hot_encoder".to_string(),
            reason: format!("feature {feature} was not fitted"),
        })?;
        Ok(categories
            .iter()
            .map(|c| if c == value { 1.0 } else { 0.0 })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> BinaryEncoder {
        BinaryEncoder::new(vec![
            "Aberdeen".to_string(),
            "Bristol".to_string(),
            "Glasgow".to_string(),
        ])
    }

    #[test]
    fn test_binary_roundtrip() {
        let enc = encoder();
        for name in ["Aberdeen", "Bristol", "Glasgow"] {
            let bits = enc.transform(Some(name));
            assert_eq!(enc.inverse(&bits), Some(name));
        }
    }

    #[test]
    fn test_binary_ordinal_layout() {
        let enc = encoder();
        // Bristol is the second fitted category, ordinal 2 = 0000010.
        assert_eq!(
            enc.transform(Some("Bristol")),
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_binary_unknown_is_zero_block() {
        let enc = encoder();
        let bits = enc.transform(Some("Atlantis"));
        assert_eq!(bits, [0.0; LOCATION_BITS]);
        assert_eq!(enc.inverse(&bits), None);
        assert_eq!(enc.transform(None), [0.0; LOCATION_BITS]);
    }

    #[test]
    fn test_one_hot_order_is_fitted_order() {
        let enc = OneHotEncoder::new(vec![OneHotFeature {
            name: "season".to_string(),
            categories: vec![
                "Winter".to_string(),
                "Autumn".to_string(),
                "Summer".to_string(),
                "Spring".to_string(),
            ],
        }]);
        assert_eq!(
            enc.transform("season", "Summer").unwrap(),
            vec![0.0, 0.0, 1.0, 0.0]
        );
        assert!(enc.transform("fuel", "EV").is_err());
    }
}
