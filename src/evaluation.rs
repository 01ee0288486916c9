//! Accuracy and confusion-matrix metrics for binary classifiers
//!
//! A prediction of `0` (a row exactly on the hyperplane) never matches a
//! `+1`/`-1` label, so it always counts as a mistake.

use crate::core::{Classifier, Result};
use crate::data::check_shape;
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Fraction of rows whose predicted sign equals the label
///
/// Returns 0.0 for an empty set. Fails with `InvalidShape` when the label
/// count differs from the row count or the rows do not match the model width.
pub fn accuracy<M: Classifier + ?Sized>(
    model: &M,
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, f64>,
) -> Result<f64> {
    Ok(EvaluationMetrics::compute(model, features, labels)?.accuracy())
}

/// Confusion counts with +1 as the positive class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Count outcomes of `model` over a labeled set
    pub fn compute<M: Classifier + ?Sized>(
        model: &M,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
    ) -> Result<Self> {
        check_shape(features, labels)?;
        model.check_features(features)?;

        let mut metrics = Self::default();
        for (x, &actual) in features.rows().into_iter().zip(labels.iter()) {
            let predicted = model.predict(x).label;
            match (actual > 0.0, predicted == actual) {
                (true, true) => metrics.true_positives += 1,
                (false, true) => metrics.true_negatives += 1,
                // a zero prediction on a +1 row is a missed positive
                (true, false) => metrics.false_negatives += 1,
                (false, false) => metrics.false_positives += 1,
            }
        }

        Ok(metrics)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Share of +1 predictions that were right
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Share of +1 rows that were found
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Harmonic mean of precision and recall
    pub fn f1_score(&self) -> f64 {
        // 2TP / (2TP + FP + FN), same value without the intermediate ratios
        ratio(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
    }

    /// Share of -1 rows that were classified -1
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }
}

/// `num / den`, or 0.0 when nothing was counted
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
