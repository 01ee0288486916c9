//! Core traits for the linear SVM

use crate::core::{Prediction, ProgressRecord, Result, SVMError};
use ndarray::{ArrayView1, ArrayView2};

/// A trained (or training) binary classifier over dense feature rows
pub trait Classifier {
    /// Width of the rows this classifier accepts
    fn n_features(&self) -> usize;

    /// Raw decision value for a single row
    ///
    /// Panics if `x.len() != self.n_features()`; use [`Classifier::check_features`]
    /// or [`Classifier::predict_batch`] for a checked path.
    fn decision_function(&self, x: ArrayView1<'_, f64>) -> f64;

    /// Predict a single row
    fn predict(&self, x: ArrayView1<'_, f64>) -> Prediction {
        Prediction::from_decision_value(self.decision_function(x))
    }

    /// Fail with `InvalidShape` unless `features` has one column per weight
    fn check_features(&self, features: ArrayView2<'_, f64>) -> Result<()> {
        if features.ncols() != self.n_features() {
            return Err(SVMError::InvalidShape(format!(
                "feature matrix has {} columns but the classifier expects {}",
                features.ncols(),
                self.n_features()
            )));
        }
        Ok(())
    }

    /// Predict every row of a feature matrix
    fn predict_batch(&self, features: ArrayView2<'_, f64>) -> Result<Vec<Prediction>> {
        self.check_features(features)?;
        Ok(features.rows().into_iter().map(|x| self.predict(x)).collect())
    }
}

/// Destination for periodic progress records emitted by the training loop
pub trait ProgressSink {
    fn record(&mut self, progress: &ProgressRecord);
}

impl ProgressSink for Vec<ProgressRecord> {
    fn record(&mut self, progress: &ProgressRecord) {
        self.push(*progress);
    }
}

/// Sink that forwards every record to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn record(&mut self, progress: &ProgressRecord) {
        log::info!(
            "Step{}: test acc {}, train acc {}, loss {:.6}",
            progress.step,
            progress.test_accuracy,
            progress.train_accuracy,
            progress.loss
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_records() {
        let mut sink: Vec<ProgressRecord> = Vec::new();
        let record = ProgressRecord {
            step: 99,
            loss: 0.5,
            train_accuracy: 0.9,
            test_accuracy: 0.8,
        };
        sink.record(&record);
        LogSink.record(&record);
        assert_eq!(sink, vec![record]);
    }
}
