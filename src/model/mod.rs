//! Linear max-margin model
//!
//! The decision function is `score(x) = x . w - b`; the bias is subtracted,
//! and the gradients below are derived for exactly that form. Training
//! minimizes
//!
//! ```text
//! C * mean_i max(0, delta - y_i * score(x_i)) + Reg * |w|^2 / 2
//! ```
//!
//! with the bias left out of the regularization term.

use crate::core::{Classifier, LossBreakdown, Parameters, Result, SVMError, TrainingConfig};
use crate::data::check_shape;
use ndarray::{Array1, ArrayView1, ArrayView2};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::Rng;

/// Weights of the training objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginObjective {
    /// Margin width
    pub delta: f64,
    /// Weight of the mean hinge loss
    pub c: f64,
    /// Weight of the half squared L2 norm
    pub reg: f64,
}

impl MarginObjective {
    pub fn new(delta: f64, c: f64, reg: f64) -> Self {
        Self { delta, c, reg }
    }
}

impl Default for MarginObjective {
    fn default() -> Self {
        Self::from(&TrainingConfig::default())
    }
}

impl From<&TrainingConfig> for MarginObjective {
    fn from(config: &TrainingConfig) -> Self {
        Self::new(config.delta, config.c, config.reg)
    }
}

/// Gradient of the total loss with respect to the parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub weights: Array1<f64>,
    pub bias: f64,
}

impl Gradient {
    pub fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|g| g.is_finite())
    }
}

/// Linear classifier holding its parameters and training objective
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    params: Parameters,
    objective: MarginObjective,
}

impl LinearModel {
    pub fn new(params: Parameters, objective: MarginObjective) -> Self {
        Self { params, objective }
    }

    /// Draw weights and bias from a standard normal distribution
    pub fn random<R: Rng + ?Sized>(
        n_features: usize,
        objective: MarginObjective,
        rng: &mut R,
    ) -> Self {
        let weights = Array1::random_using(n_features, StandardNormal, rng);
        let bias: f64 = rng.sample(StandardNormal);
        Self::new(Parameters::new(weights, bias), objective)
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    pub fn into_parameters(self) -> Parameters {
        self.params
    }

    pub fn objective(&self) -> &MarginObjective {
        &self.objective
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.params.weights.view()
    }

    pub fn bias(&self) -> f64 {
        self.params.bias
    }

    pub fn n_features(&self) -> usize {
        self.params.n_features()
    }

    /// Decision values `X w - b` for every row
    pub fn scores(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        features.dot(&self.params.weights) - self.params.bias
    }

    /// Per-row hinge loss `max(0, delta - y * score)`
    pub fn hinge_losses(
        &self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
    ) -> Result<Array1<f64>> {
        self.check_batch(features, labels)?;
        let delta = self.objective.delta;
        let margins = &labels * &self.scores(features);
        Ok(margins.mapv(|m| hinge(delta - m)))
    }

    /// Half squared L2 norm of the weights
    pub fn regularization_term(&self) -> f64 {
        self.params.weights.dot(&self.params.weights) / 2.0
    }

    /// Total objective on a batch, split into its two components
    pub fn loss(
        &self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
    ) -> Result<LossBreakdown> {
        let hinge = self.hinge_losses(features, labels)?;
        let classification = hinge.sum() / hinge.len() as f64;
        let regularization = self.regularization_term();
        Ok(LossBreakdown {
            classification,
            regularization,
            total: self.objective.c * classification + self.objective.reg * regularization,
        })
    }

    /// Closed-form (sub)gradient of [`LinearModel::loss`]
    ///
    /// Rows exactly on the margin contribute nothing.
    pub fn gradient(
        &self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
    ) -> Result<Gradient> {
        let hinge = self.hinge_losses(features, labels)?;
        let scale = self.objective.c / labels.len() as f64;

        // y_i where the margin is violated, 0 elsewhere
        let active: Array1<f64> = hinge
            .iter()
            .zip(labels.iter())
            .map(|(&h, &y)| if h > 0.0 { y } else { 0.0 })
            .collect();

        let weights = features.t().dot(&active) * (-scale) + &self.params.weights * self.objective.reg;
        let bias = scale * active.sum();
        Ok(Gradient { weights, bias })
    }

    fn check_batch(&self, features: ArrayView2<'_, f64>, labels: ArrayView1<'_, f64>) -> Result<()> {
        check_shape(features, labels)?;
        if labels.is_empty() {
            return Err(SVMError::InvalidShape(
                "cannot compute loss over an empty batch".to_string(),
            ));
        }
        if features.ncols() != self.n_features() {
            return Err(SVMError::InvalidShape(format!(
                "batch has {} features but the model has {} weights",
                features.ncols(),
                self.n_features()
            )));
        }
        Ok(())
    }
}

/// `max(0, v)` that lets NaN through instead of masking it
fn hinge(v: f64) -> f64 {
    if v.is_nan() {
        v
    } else {
        v.max(0.0)
    }
}

impl Classifier for LinearModel {
    fn n_features(&self) -> usize {
        self.params.n_features()
    }

    fn decision_function(&self, x: ArrayView1<'_, f64>) -> f64 {
        x.dot(&self.params.weights) - self.params.bias
    }
}
