//! Tree-based regressors: single decision trees and boosted ensembles.

use serde::Deserialize;

use crate::error::{PricingError, Result};

/// A regression tree in flattened node-array form. Leaves carry a negative
/// `children_left` entry and their prediction in `value`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl RegressionTree {
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let nodes = self.children_left.len();
        let mut node = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..=nodes {
            let left = *self.children_left.get(node).ok_or_else(|| malformed(node))?;
            if left < 0 {
                return self.value.get(node).copied().ok_or_else(|| malformed(node));
            }
            let feature = *self.feature.get(node).ok_or_else(|| malformed(node))? as usize;
            let x = *features
                .get(feature)
                .ok_or(PricingError::FeatureShape {
                    expected: feature + 1,
                    actual: features.len(),
                })?;
            let threshold = *self.threshold.get(node).ok_or_else(|| malformed(node))?;
            node = if x <= threshold {
                left as usize
            } else {
                *self.children_right.get(node).ok_or_else(|| malformed(node))? as usize
            };
        }
        Err(malformed(node))
    }
}

fn malformed(node: usize) -> PricingError {
    PricingError::Artifact {
        name: "regression_tree".to_string(),
        reason: format!("malformed node array at node {node}"),
    }
}

/// A boosted ensemble: base score plus the sum of learning-rate-scaled
/// tree outputs, baked into the serialized leaf values.
#[derive(Debug, Clone, Deserialize)]
pub struct GradientBoosted {
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

impl GradientBoosted {
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut sum = self.base_score;
        for tree in &self.trees {
            sum += tree.predict(features)?;
        }
        Ok(sum)
    }
}
