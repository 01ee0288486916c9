//! Core type definitions for the linear SVM

use crate::core::{Result, SVMError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Sign of the decision value: +1, -1, or 0 on the hyperplane
    pub label: f64,
    /// Raw decision function value `x . w - b`
    pub decision_value: f64,
}

impl Prediction {
    /// Create a prediction from a raw decision value
    pub fn from_decision_value(decision_value: f64) -> Self {
        Self {
            label: sign(decision_value),
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Sign function with an explicit zero, unlike `f64::signum`
pub(crate) fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Learnable parameters of the linear model
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// Weight vector, one entry per feature
    pub weights: Array1<f64>,
    /// Bias, subtracted from `x . w`
    pub bias: f64,
}

impl Parameters {
    pub fn new(weights: Array1<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// All-zero parameters for `n_features` features
    pub fn zeros(n_features: usize) -> Self {
        Self::new(Array1::zeros(n_features), 0.0)
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }
}

/// Weighted components of the training objective on one batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossBreakdown {
    /// Mean hinge loss (before weighting by C)
    pub classification: f64,
    /// Half squared L2 norm of the weights (before weighting by Reg)
    pub regularization: f64,
    /// `C * classification + Reg * regularization`
    pub total: f64,
}

/// One periodic progress report from the training loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Zero-based index of the step that just completed
    pub step: usize,
    /// Total loss on that step's batch, after the update
    pub loss: f64,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

/// Hyperparameters, fixed before training starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Number of training iterations
    pub step_count: usize,
    /// Rows drawn (with replacement) per iteration
    pub batch_size: usize,
    /// Margin width required before the hinge loss reaches zero
    pub delta: f64,
    /// Weight of the classification (hinge) loss
    pub c: f64,
    /// Weight of the regularization term
    pub reg: f64,
    /// Fraction of rows used for training; the rest are the test split
    pub train_fraction: f64,
    /// Steps between progress records
    pub report_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            step_count: 1000,
            batch_size: 32,
            delta: 1.0,
            c: 1.0,
            reg: 0.01,
            train_fraction: 0.8,
            report_interval: 100,
        }
    }
}

impl TrainingConfig {
    /// Check every hyperparameter, failing on the first out-of-range value
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(SVMError::InvalidArgument(format!(
                "learning rate must be positive and finite, got: {}",
                self.learning_rate
            )));
        }
        if self.step_count == 0 {
            return Err(SVMError::InvalidArgument(
                "step count must be greater than 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(SVMError::InvalidArgument(
                "batch size must be greater than 0".to_string(),
            ));
        }
        if self.report_interval == 0 {
            return Err(SVMError::InvalidArgument(
                "report interval must be greater than 0".to_string(),
            ));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(SVMError::InvalidArgument(format!(
                "train fraction must be between 0 and 1 (exclusive), got: {}",
                self.train_fraction
            )));
        }
        if !self.delta.is_finite() {
            return Err(SVMError::InvalidArgument(format!(
                "delta must be finite, got: {}",
                self.delta
            )));
        }
        for (name, value) in [("C", self.c), ("Reg", self.reg)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SVMError::InvalidArgument(format!(
                    "{name} must be non-negative and finite, got: {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_prediction_sign() {
        let pred = Prediction::from_decision_value(2.5);
        assert_eq!(pred.label, 1.0);
        assert_eq!(pred.confidence(), 2.5);

        let neg_pred = Prediction::from_decision_value(-1.8);
        assert_eq!(neg_pred.label, -1.0);
        assert_eq!(neg_pred.confidence(), 1.8);

        // Exactly on the hyperplane
        assert_eq!(Prediction::from_decision_value(0.0).label, 0.0);
        assert_eq!(Prediction::from_decision_value(-0.0).label, 0.0);
    }

    #[test]
    fn test_parameters() {
        let params = Parameters::zeros(3);
        assert_eq!(params.n_features(), 3);
        assert_eq!(params.bias, 0.0);
        assert!(params.is_finite());

        let params = Parameters::new(array![1.0, f64::NAN], 0.0);
        assert!(!params.is_finite());
        let params = Parameters::new(array![1.0], f64::INFINITY);
        assert!(!params.is_finite());
    }

    #[test]
    fn test_training_config_default() {
        let config = TrainingConfig::default();
        assert_eq!(config.learning_rate, 0.01);
        assert_eq!(config.step_count, 1000);
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.delta, 1.0);
        assert_eq!(config.c, 1.0);
        assert_eq!(config.reg, 0.01);
        assert_eq!(config.train_fraction, 0.8);
        assert_eq!(config.report_interval, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_training_config_rejects_degenerate_values() {
        let cases = [
            TrainingConfig {
                step_count: 0,
                ..Default::default()
            },
            TrainingConfig {
                batch_size: 0,
                ..Default::default()
            },
            TrainingConfig {
                train_fraction: 0.0,
                ..Default::default()
            },
            TrainingConfig {
                train_fraction: 1.0,
                ..Default::default()
            },
            TrainingConfig {
                learning_rate: 0.0,
                ..Default::default()
            },
            TrainingConfig {
                learning_rate: f64::NAN,
                ..Default::default()
            },
            TrainingConfig {
                report_interval: 0,
                ..Default::default()
            },
            TrainingConfig {
                delta: f64::INFINITY,
                ..Default::default()
            },
            TrainingConfig {
                c: -1.0,
                ..Default::default()
            },
            TrainingConfig {
                reg: f64::NAN,
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(SVMError::InvalidArgument(_))),
                "config should be rejected: {config:?}"
            );
        }
    }

    #[test]
    fn test_training_config_json() {
        let config = TrainingConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(json.contains("\"learning_rate\":0.01"));
        let back: TrainingConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }
}
