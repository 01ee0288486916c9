//! High-level API for training and evaluating a linear SVM
//!
//! This module wraps the splitter, the training loop and the evaluator
//! behind a builder.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gdsvm::api::LinearSVM;
//! use gdsvm::LabeledDataset;
//! use ndarray::array;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = LabeledDataset::new(
//!     array![[2.0, 1.0], [-2.0, -1.0], [1.5, 0.8], [-1.5, -0.8], [1.8, 0.9]],
//!     array![1.0, -1.0, 1.0, -1.0, 1.0],
//! )?;
//!
//! let outcome = LinearSVM::new()
//!     .with_learning_rate(0.01)
//!     .with_step_count(500)
//!     .with_train_fraction(0.6)
//!     .fit(&dataset, &mut StdRng::seed_from_u64(0))?;
//!
//! println!("Test accuracy: {:.2}%", outcome.test_accuracy * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{LogSink, ProgressSink, Result, TrainingConfig};
use crate::data::LabeledDataset;
use crate::trainer::{Trainer, TrainingOutcome};
use rand::Rng;

/// Linear SVM builder
#[derive(Debug, Clone, Default)]
pub struct LinearSVM {
    config: TrainingConfig,
}

impl LinearSVM {
    /// Create a builder with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn with_config(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Set the gradient descent step size
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    /// Set the number of training iterations
    pub fn with_step_count(mut self, step_count: usize) -> Self {
        self.config.step_count = step_count;
        self
    }

    /// Set the mini-batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Set the margin width
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.config.delta = delta;
        self
    }

    /// Set the classification loss weight C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set the regularization weight
    pub fn with_reg(mut self, reg: f64) -> Self {
        self.config.reg = reg;
        self
    }

    /// Set the fraction of rows used for training
    pub fn with_train_fraction(mut self, train_fraction: f64) -> Self {
        self.config.train_fraction = train_fraction;
        self
    }

    /// Set the number of steps between progress records
    pub fn with_report_interval(mut self, report_interval: usize) -> Self {
        self.config.report_interval = report_interval;
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Split `dataset` and train, logging progress records
    pub fn fit<R: Rng + ?Sized>(
        &self,
        dataset: &LabeledDataset,
        rng: &mut R,
    ) -> Result<TrainingOutcome> {
        self.fit_with_sink(dataset, rng, &mut LogSink)
    }

    /// Split `dataset` and train, sending progress records to `sink`
    pub fn fit_with_sink<R: Rng + ?Sized>(
        &self,
        dataset: &LabeledDataset,
        rng: &mut R,
        sink: &mut dyn ProgressSink,
    ) -> Result<TrainingOutcome> {
        // Configuration errors surface before the split is attempted
        let trainer = Trainer::new(self.config.clone())?;
        let split = dataset.split(self.config.train_fraction)?;
        trainer.train(split, rng, sink)
    }
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;
    use ndarray::{Array1, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Train with default hyperparameters and a seeded generator,
    /// returning `(train_accuracy, test_accuracy)`
    pub fn train_and_evaluate(
        features: Array2<f64>,
        labels: Array1<f64>,
        seed: u64,
    ) -> Result<(f64, f64)> {
        let dataset = LabeledDataset::new(features, labels)?;
        let outcome = LinearSVM::new().fit(&dataset, &mut StdRng::seed_from_u64(seed))?;
        Ok((outcome.train_accuracy, outcome.test_accuracy))
    }
}
