//! Utility functions for preparing datasets before training

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Label encoding helpers
pub mod labels {
    use super::*;

    /// Map class ids to the binary encoding: `positive_class` becomes +1,
    /// every other class -1
    pub fn binarize_labels(targets: ArrayView1<'_, usize>, positive_class: usize) -> Array1<f64> {
        targets.mapv(|class| if class == positive_class { 1.0 } else { -1.0 })
    }
}

pub use labels::binarize_labels;
pub use shuffle::shuffle_rows;

/// Row shuffling
pub mod shuffle {
    use super::*;
    use crate::core::Result;
    use crate::data::check_shape;
    use rand::seq::SliceRandom;
    use rand::Rng;

    /// Apply one random permutation to the rows of `features` and `labels`
    pub fn shuffle_rows<R: Rng + ?Sized>(
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
        rng: &mut R,
    ) -> Result<(Array2<f64>, Array1<f64>)> {
        check_shape(features, labels)?;
        let mut order: Vec<usize> = (0..labels.len()).collect();
        order.shuffle(rng);
        Ok((
            features.select(Axis(0), &order),
            labels.select(Axis(0), &order),
        ))
    }
}

/// Validation and preprocessing utilities
pub mod validation {
    use super::*;

    /// Count positive and negative labels and their ratio
    pub fn check_label_balance(labels: ArrayView1<'_, f64>) -> (usize, usize, f64) {
        let positive_count = labels.iter().filter(|&&l| l > 0.0).count();
        let negative_count = labels.len() - positive_count;
        let balance_ratio = if negative_count == 0 {
            f64::INFINITY
        } else {
            positive_count as f64 / negative_count as f64
        };
        (positive_count, negative_count, balance_ratio)
    }

    /// True when the labels contain only one class
    pub fn is_single_class(labels: ArrayView1<'_, f64>) -> bool {
        let (positive, negative, _) = check_label_balance(labels);
        positive == 0 || negative == 0
    }
}
