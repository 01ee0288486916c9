//! Training run reports
//!
//! A report records the configuration, the progress records and the final
//! accuracies of one run so it can be saved as JSON next to other
//! experiment output. Learned parameters are not part of a report.

use crate::core::{ProgressRecord, Result, SVMError, TrainingConfig};
use crate::evaluation::EvaluationMetrics;
use crate::trainer::TrainingOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable summary of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Library version used for the run
    pub library_version: String,
    /// Name of the dataset the caller trained on
    pub dataset: String,
    pub train_rows: usize,
    pub test_rows: usize,
    pub config: TrainingConfig,
    pub progress: Vec<ProgressRecord>,
    pub steps: usize,
    pub final_loss: Option<f64>,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    /// Confusion counts on the test split
    pub test_metrics: EvaluationMetrics,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TrainingReport {
    /// Build a report from a finished run
    pub fn from_outcome(
        dataset: impl Into<String>,
        (train_rows, test_rows): (usize, usize),
        config: &TrainingConfig,
        outcome: &TrainingOutcome,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            library_version: crate::VERSION.to_string(),
            dataset: dataset.into(),
            train_rows,
            test_rows,
            config: config.clone(),
            progress: outcome.history.clone(),
            steps: outcome.steps,
            final_loss: outcome.final_loss.map(|loss| loss.total),
            train_accuracy: outcome.train_accuracy,
            test_accuracy: outcome.test_accuracy,
            test_metrics: outcome.test_metrics,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Save report to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load report from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        let report = serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(report)
    }

    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Print report summary
    pub fn print_summary(&self) {
        println!("=== Training Summary ===");
        println!("Dataset: {}", self.dataset);
        println!("Rows: {} train / {} test", self.train_rows, self.test_rows);
        println!("Steps: {}", self.steps);
        if let Some(loss) = self.final_loss {
            println!("Final batch loss: {loss:.6}");
        }
        println!("Train accuracy: {:.2}%", self.train_accuracy * 100.0);
        println!("Test accuracy: {:.2}%", self.test_accuracy * 100.0);
        let m = &self.test_metrics;
        println!(
            "Test confusion: TP {} / TN {} / FP {} / FN {}",
            m.true_positives, m.true_negatives, m.false_positives, m.false_negatives
        );
        println!(
            "Test precision {:.4}, recall {:.4}, F1 {:.4}, specificity {:.4}",
            m.precision(),
            m.recall(),
            m.f1_score(),
            m.specificity()
        );
        println!("Duration: {} ms", self.duration().num_milliseconds());
        println!("Library Version: {}", self.library_version);
        println!("Training Parameters:");
        println!("  Learning rate: {}", self.config.learning_rate);
        println!("  Batch size: {}", self.config.batch_size);
        println!("  Delta: {}", self.config.delta);
        println!("  C: {}", self.config.c);
        println!("  Reg: {}", self.config.reg);
        println!("  Train fraction: {}", self.config.train_fraction);
    }
}
