//! Contiguous train/test splitting
//!
//! The first `floor(rows * train_fraction)` rows become the training set and
//! the remainder the test set. Row order is kept as is, so a dataset grouped
//! by class yields class-skewed splits unless the caller shuffles first.

use crate::core::{Result, SVMError};
use crate::data::{check_shape, DatasetView};
use ndarray::{s, ArrayView1, ArrayView2};
use std::ops::Range;

/// Train and test views over one dataset
#[derive(Debug, Clone, Copy)]
pub struct Split<'a> {
    pub train: DatasetView<'a>,
    pub test: DatasetView<'a>,
}

impl<'a> Split<'a> {
    /// Number of rows in the training range
    pub fn train_count(&self) -> usize {
        self.train.n_samples()
    }

    /// Row index ranges of the train and test sets in the source dataset
    pub fn ranges(&self) -> (Range<usize>, Range<usize>) {
        let n_train = self.train.n_samples();
        let n_total = n_train + self.test.n_samples();
        (0..n_train, n_train..n_total)
    }
}

/// Number of training rows for `n_rows` rows and `train_fraction`
///
/// Fails with `InvalidShape` when either side of the split would be empty.
pub fn train_count(n_rows: usize, train_fraction: f64) -> Result<usize> {
    let count = (n_rows as f64 * train_fraction).floor();
    if !(count >= 1.0 && count < n_rows as f64) {
        return Err(SVMError::InvalidShape(format!(
            "train fraction {train_fraction} over {n_rows} rows gives a degenerate split \
             (train count {count})"
        )));
    }
    Ok(count as usize)
}

/// Split `features`/`labels` into a leading train range and a trailing test range
pub fn split<'a>(
    features: ArrayView2<'a, f64>,
    labels: ArrayView1<'a, f64>,
    train_fraction: f64,
) -> Result<Split<'a>> {
    check_shape(features, labels)?;
    let n_train = train_count(features.nrows(), train_fraction)?;

    let (train_features, test_features) = features.split_at(ndarray::Axis(0), n_train);
    Ok(Split {
        train: DatasetView {
            features: train_features,
            labels: labels.slice_move(s![..n_train]),
        },
        test: DatasetView {
            features: test_features,
            labels: labels.slice_move(s![n_train..]),
        },
    })
}
