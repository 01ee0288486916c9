//! Mini-batch sampling with replacement

use crate::core::{Result, SVMError};
use crate::data::check_shape;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;

/// A freshly materialized mini-batch
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
}

impl Batch {
    /// Build a batch from owned arrays, checking row/label alignment
    pub fn new(features: Array2<f64>, labels: Array1<f64>) -> Result<Self> {
        check_shape(features.view(), labels.view())?;
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Draw `sample_count` rows uniformly at random with replacement
///
/// Duplicates are allowed and `sample_count` may exceed the number of rows.
/// Each returned label is the label of the row its features were copied from.
pub fn sample<R: Rng + ?Sized>(
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, f64>,
    sample_count: usize,
    rng: &mut R,
) -> Result<Batch> {
    check_shape(features, labels)?;

    if sample_count == 0 {
        return Err(SVMError::InvalidArgument(
            "sample count must be greater than 0".to_string(),
        ));
    }
    let n_rows = features.nrows();
    if n_rows == 0 {
        return Err(SVMError::InvalidArgument(
            "cannot sample from an empty dataset".to_string(),
        ));
    }

    let indices: Vec<usize> = (0..sample_count).map(|_| rng.gen_range(0..n_rows)).collect();

    Ok(Batch {
        features: features.select(Axis(0), &indices),
        labels: labels.select(Axis(0), &indices),
    })
}
