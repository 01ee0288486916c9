//! Linear Support Vector Machine trained by mini-batch gradient descent
//!
//! The model minimizes a weighted sum of the mean hinge loss and half the
//! squared L2 norm of the weights, sampling a fresh batch with replacement at
//! every step.

pub mod api;
pub mod core;
pub mod data;
pub mod evaluation;
pub mod model;
pub mod optimizer;
pub mod report;
pub mod trainer;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::LinearSVM;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::data::{Batch, DatasetView, LabeledDataset, Split};
pub use crate::evaluation::{accuracy, EvaluationMetrics};
pub use crate::model::{Gradient, LinearModel, MarginObjective};
pub use crate::optimizer::GradientDescent;
pub use crate::report::TrainingReport;
pub use crate::trainer::{Trainer, TrainingOutcome, TrainingSession, TrainingState};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
