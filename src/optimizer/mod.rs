//! Plain gradient descent over the linear model's parameters
//!
//! Each step computes the closed-form gradient on a batch and applies
//! `theta <- theta - learning_rate * grad`. There is no momentum, no adaptive
//! step size and no clipping.

use crate::core::{Result, SVMError};
use crate::data::Batch;
use crate::model::{Gradient, LinearModel};
use ndarray::{ArrayView1, ArrayView2};

/// Vanilla (first-order) gradient descent
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
    steps_taken: usize,
}

impl GradientDescent {
    /// Create an optimizer; the learning rate must be positive and finite
    pub fn new(learning_rate: f64) -> Result<Self> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(SVMError::InvalidArgument(format!(
                "learning rate must be positive and finite, got: {learning_rate}"
            )));
        }
        Ok(Self {
            learning_rate,
            steps_taken: 0,
        })
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Number of updates applied so far
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Apply one update computed on `batch`
    pub fn step(&mut self, model: &mut LinearModel, batch: &Batch) -> Result<Gradient> {
        self.step_on(model, batch.features.view(), batch.labels.view())
    }

    /// Apply one update computed on borrowed rows
    ///
    /// The parameters are left untouched when the gradient or the updated
    /// parameters are not finite.
    pub fn step_on(
        &mut self,
        model: &mut LinearModel,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
    ) -> Result<Gradient> {
        let step = self.steps_taken;
        let gradient = model.gradient(features, labels)?;
        if !gradient.is_finite() {
            return Err(SVMError::NumericDivergence {
                step,
                detail: format!(
                    "non-finite gradient (weights {}, bias {})",
                    gradient.weights, gradient.bias
                ),
            });
        }

        let params = model.parameters();
        let weights = &params.weights - &(&gradient.weights * self.learning_rate);
        let bias = params.bias - self.learning_rate * gradient.bias;
        if !(bias.is_finite() && weights.iter().all(|w| w.is_finite())) {
            return Err(SVMError::NumericDivergence {
                step,
                detail: format!("update produced non-finite parameters (weights {weights}, bias {bias})"),
            });
        }

        let params = model.parameters_mut();
        params.weights = weights;
        params.bias = bias;
        self.steps_taken += 1;
        Ok(gradient)
    }
}
