//! In-memory labeled datasets, train/test splitting and mini-batch sampling
//!
//! Features are a dense `rows x features` matrix and labels a vector of
//! `+1.0` / `-1.0` aligned with the rows. Nothing in this module mutates a
//! dataset after construction; splits borrow, batches copy.

pub mod sampler;
pub mod split;

pub use self::sampler::*;
pub use self::split::*;

use crate::core::{Result, SVMError};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

/// Owned feature matrix with validated binary labels
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    features: Array2<f64>,
    labels: Array1<f64>,
}

impl LabeledDataset {
    /// Create a dataset, checking row/label alignment and the label encoding
    pub fn new(features: Array2<f64>, labels: Array1<f64>) -> Result<Self> {
        check_shape(features.view(), labels.view())?;

        if features.ncols() == 0 {
            return Err(SVMError::InvalidShape(format!(
                "feature matrix {:?} has no columns",
                features.dim()
            )));
        }

        if let Some(&bad) = labels.iter().find(|&&y| y != 1.0 && y != -1.0) {
            return Err(SVMError::InvalidLabel(bad));
        }

        Ok(Self { features, labels })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, f64> {
        self.labels.view()
    }

    /// Borrow the whole dataset
    pub fn view(&self) -> DatasetView<'_> {
        DatasetView {
            features: self.features.view(),
            labels: self.labels.view(),
        }
    }

    /// Contiguous train/test split, see [`split`]
    pub fn split(&self, train_fraction: f64) -> Result<Split<'_>> {
        split(self.features(), self.labels(), train_fraction)
    }

    /// Draw a mini-batch with replacement, see [`sample`]
    pub fn sample<R: Rng + ?Sized>(&self, sample_count: usize, rng: &mut R) -> Result<Batch> {
        sample(self.features(), self.labels(), sample_count, rng)
    }

    /// Give back the owned arrays
    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>) {
        (self.features, self.labels)
    }
}

/// Borrowed rows of a dataset, e.g. one side of a [`Split`]
#[derive(Debug, Clone, Copy)]
pub struct DatasetView<'a> {
    pub features: ArrayView2<'a, f64>,
    pub labels: ArrayView1<'a, f64>,
}

impl<'a> DatasetView<'a> {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    /// Draw a mini-batch with replacement from these rows
    pub fn sample<R: Rng + ?Sized>(&self, sample_count: usize, rng: &mut R) -> Result<Batch> {
        sample(self.features, self.labels, sample_count, rng)
    }
}

/// Fail with `InvalidShape` unless there is exactly one label per row
pub(crate) fn check_shape(features: ArrayView2<'_, f64>, labels: ArrayView1<'_, f64>) -> Result<()> {
    if features.nrows() != labels.len() {
        return Err(SVMError::InvalidShape(format!(
            "feature matrix has {} rows but label vector has {} entries",
            features.nrows(),
            labels.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_labeled_dataset_creation() {
        let ds = LabeledDataset::new(
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]],
            array![1.0, -1.0, 1.0],
        )
        .expect("valid dataset");

        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.n_features(), 2);
        assert!(!ds.is_empty());
        assert_eq!(ds.view().labels, array![1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_labeled_dataset_shape_mismatch() {
        let result = LabeledDataset::new(array![[1.0], [2.0]], array![1.0]);
        match result {
            Err(SVMError::InvalidShape(msg)) => {
                assert!(msg.contains("2 rows"));
                assert!(msg.contains("1 entries"));
            }
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[test]
    fn test_labeled_dataset_no_columns() {
        let result = LabeledDataset::new(Array2::zeros((2, 0)), array![1.0, -1.0]);
        assert!(matches!(result, Err(SVMError::InvalidShape(_))));
    }

    #[test]
    fn test_labeled_dataset_rejects_unmapped_labels() {
        let result = LabeledDataset::new(array![[1.0], [2.0]], array![1.0, 0.0]);
        assert!(matches!(result, Err(SVMError::InvalidLabel(l)) if l == 0.0));
    }
}
