//! Feed-forward network inference for the hourly/daily rate regressors.

use serde::Deserialize;

use crate::error::{PricingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Linear => x,
        }
    }
}

/// One dense layer. `weights` is input-major: `weights[i][j]` connects
/// input `i` to unit `j`.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.weights.len() {
            return Err(PricingError::FeatureShape {
                expected: self.weights.len(),
                actual: input.len(),
            });
        }
        let mut out = self.bias.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            if row.len() != out.len() {
                return Err(PricingError::FeatureShape {
                    expected: out.len(),
                    actual: row.len(),
                });
            }
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        for o in &mut out {
            *o = self.activation.apply(*o);
        }
        Ok(out)
    }
}

/// A dense regression network. The final layer has one unit.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseNetwork {
    pub layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut current = features.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current)?;
        }
        match current.as_slice() {
            [value] => Ok(*value),
            other => Err(PricingError::FeatureShape {
                expected: 1,
                actual: other.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relu_layer(weights: Vec<Vec<f64>>, bias: Vec<f64>) -> DenseLayer {
        DenseLayer {
            weights,
            bias,
            activation: Activation::Relu,
        }
    }

    #[test]
    fn test_forward_pass() {
        // Two inputs, two hidden relu units, one linear output.
        let network = DenseNetwork {
            layers: vec![
                relu_layer(vec![vec![1.0, -1.0], vec![0.5, 2.0]], vec![0.0, 1.0]),
                DenseLayer {
                    weights: vec![vec![1.0], vec![3.0]],
                    bias: vec![0.5],
                    activation: Activation::Linear,
                },
            ],
        };
        // Hidden: relu([2*1 + 4*0.5, 2*-1 + 4*2 + 1]) = [4, 7]; out = 4 + 21 + 0.5.
        let out = network.predict(&[2.0, 4.0]).unwrap();
        assert!((out - 25.5).abs() < 1e-12);
    }

    #[test]
    fn test_relu_clamps_negative_preactivations() {
        let network = DenseNetwork {
            layers: vec![relu_layer(vec![vec![-1.0]], vec![0.0])],
        };
        assert_eq!(network.predict(&[5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let network = DenseNetwork {
            layers: vec![relu_layer(vec![vec![1.0]], vec![0.0])],
        };
        assert!(network.predict(&[1.0, 2.0]).is_err());
    }
}
