//! Mini-batch training loop
//!
//! A [`TrainingSession`] owns the model for the lifetime of one run and
//! moves through `Initialized -> Running { step } -> Completed`. Every step
//! samples a batch from the training split, applies one gradient descent
//! update, recomputes the batch loss and, every `report_interval` steps,
//! measures accuracy on the full train and test splits.
//!
//! Steps run strictly in sequence; step `i + 1` sees the parameters written
//! by step `i`. A numeric failure halts the session and no further update is
//! applied.

use crate::core::{
    LossBreakdown, ProgressRecord, ProgressSink, Result, SVMError, TrainingConfig,
};
use crate::data::{DatasetView, Split};
use crate::evaluation::{accuracy, EvaluationMetrics};
use crate::model::{LinearModel, MarginObjective};
use crate::optimizer::GradientDescent;
use log::{debug, info};
use rand::Rng;

/// Where a session is in its single linear pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    /// Parameters initialized, no step taken yet
    Initialized,
    /// `step` is the index of the next step to run
    Running { step: usize },
    /// All configured steps ran
    Completed,
    /// A step failed; the session accepts no more steps
    Halted { step: usize },
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// The final learned model
    pub model: LinearModel,
    /// Every progress record emitted during the run
    pub history: Vec<ProgressRecord>,
    /// Loss on the last step's batch
    pub final_loss: Option<LossBreakdown>,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    /// Confusion counts of the final model on the test split
    pub test_metrics: EvaluationMetrics,
    pub steps: usize,
}

/// Validated training configuration and entry point for sessions
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    /// Create a trainer; fails with `InvalidArgument` on any bad hyperparameter
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Randomly initialize a model and open a session over `split`
    pub fn start<'a, 'r, R: Rng + ?Sized>(
        &self,
        split: Split<'a>,
        rng: &'r mut R,
    ) -> Result<TrainingSession<'a, 'r, R>> {
        if split.train.is_empty() || split.test.is_empty() {
            return Err(SVMError::InvalidShape(format!(
                "train and test splits must be non-empty, got {} and {} rows",
                split.train.n_samples(),
                split.test.n_samples()
            )));
        }
        if split.train.n_features() != split.test.n_features() {
            return Err(SVMError::InvalidShape(format!(
                "train split has {} features but test split has {}",
                split.train.n_features(),
                split.test.n_features()
            )));
        }

        let model = LinearModel::random(
            split.train.n_features(),
            MarginObjective::from(&self.config),
            rng,
        );
        let optimizer = GradientDescent::new(self.config.learning_rate)?;

        info!(
            "Training session started: {} train rows, {} test rows, {} features, {} steps",
            split.train.n_samples(),
            split.test.n_samples(),
            split.train.n_features(),
            self.config.step_count
        );

        Ok(TrainingSession {
            config: self.config.clone(),
            split,
            rng,
            model,
            optimizer,
            state: TrainingState::Initialized,
            history: Vec::new(),
            last_loss: None,
        })
    }

    /// Run a whole session, sending progress records to `sink`
    pub fn train<R: Rng + ?Sized>(
        &self,
        split: Split<'_>,
        rng: &mut R,
        sink: &mut dyn ProgressSink,
    ) -> Result<TrainingOutcome> {
        self.start(split, rng)?.run(sink)
    }
}

/// One training run in progress
pub struct TrainingSession<'a, 'r, R: Rng + ?Sized> {
    config: TrainingConfig,
    split: Split<'a>,
    rng: &'r mut R,
    model: LinearModel,
    optimizer: GradientDescent,
    state: TrainingState,
    history: Vec<ProgressRecord>,
    last_loss: Option<LossBreakdown>,
}

impl<'a, 'r, R: Rng + ?Sized> TrainingSession<'a, 'r, R> {
    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn history(&self) -> &[ProgressRecord] {
        &self.history
    }

    /// Run one step; returns the progress record if this step reports
    pub fn step(&mut self, sink: &mut dyn ProgressSink) -> Result<Option<ProgressRecord>> {
        let step = match self.state {
            TrainingState::Initialized => 0,
            TrainingState::Running { step } => step,
            TrainingState::Completed => {
                return Err(SVMError::InvalidArgument(format!(
                    "training already completed {} steps",
                    self.config.step_count
                )))
            }
            TrainingState::Halted { step } => {
                return Err(SVMError::InvalidArgument(format!(
                    "training halted at step {step}"
                )))
            }
        };

        match self.run_step(step) {
            Ok(loss) => {
                self.last_loss = Some(loss);
                let next = step + 1;
                self.state = if next == self.config.step_count {
                    TrainingState::Completed
                } else {
                    TrainingState::Running { step: next }
                };

                if next % self.config.report_interval != 0 {
                    return Ok(None);
                }
                let record = ProgressRecord {
                    step,
                    loss: loss.total,
                    train_accuracy: self.accuracy_on(self.split.train)?,
                    test_accuracy: self.accuracy_on(self.split.test)?,
                };
                sink.record(&record);
                self.history.push(record);
                Ok(Some(record))
            }
            Err(e) => {
                self.state = TrainingState::Halted { step };
                Err(e)
            }
        }
    }

    /// Run the remaining steps and hand back the trained model
    pub fn run(mut self, sink: &mut dyn ProgressSink) -> Result<TrainingOutcome> {
        while !matches!(self.state, TrainingState::Completed) {
            self.step(sink)?;
        }
        self.finish()
    }

    fn run_step(&mut self, step: usize) -> Result<LossBreakdown> {
        let batch = self.split.train.sample(self.config.batch_size, &mut *self.rng)?;

        self.optimizer
            .step(&mut self.model, &batch)
            .map_err(|e| match e {
                SVMError::NumericDivergence { detail, .. } => {
                    SVMError::NumericDivergence { step, detail }
                }
                other => other,
            })?;

        let loss = self.model.loss(batch.features.view(), batch.labels.view())?;
        if !loss.total.is_finite() {
            return Err(SVMError::NumericDivergence {
                step,
                detail: format!(
                    "batch loss is {} (classification {}, regularization {})",
                    loss.total, loss.classification, loss.regularization
                ),
            });
        }

        debug!(
            "step {step}: loss {:.6} (hinge {:.6}, reg {:.6})",
            loss.total, loss.classification, loss.regularization
        );
        Ok(loss)
    }

    fn accuracy_on(&self, view: DatasetView<'_>) -> Result<f64> {
        accuracy(&self.model, view.features, view.labels)
    }

    fn finish(self) -> Result<TrainingOutcome> {
        let train_accuracy = self.accuracy_on(self.split.train)?;
        let test_metrics =
            EvaluationMetrics::compute(&self.model, self.split.test.features, self.split.test.labels)?;
        let test_accuracy = test_metrics.accuracy();
        info!(
            "Training completed after {} steps: train acc {train_accuracy}, test acc {test_accuracy}",
            self.optimizer.steps_taken()
        );

        Ok(TrainingOutcome {
            steps: self.optimizer.steps_taken(),
            model: self.model,
            history: self.history,
            final_loss: self.last_loss,
            train_accuracy,
            test_accuracy,
            test_metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parameters;
    use crate::data::split;
    use ndarray::{array, Array1, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Alternating classes around (2, 2) and (-2, -2)
    fn toy(n: usize) -> (Array2<f64>, Array1<f64>) {
        let labels = Array1::from_shape_fn(n, |i| if i % 2 == 0 { 1.0 } else { -1.0 });
        let features = Array2::from_shape_fn((n, 2), |(i, j)| {
            let jitter = ((i * 7 + j * 3) % 10) as f64 / 10.0 - 0.45;
            labels[i] * 2.0 + jitter
        });
        (features, labels)
    }

    fn config(step_count: usize, report_interval: usize) -> TrainingConfig {
        TrainingConfig {
            step_count,
            report_interval,
            batch_size: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_trainer_rejects_invalid_config() {
        let bad = TrainingConfig {
            step_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            Trainer::new(bad),
            Err(SVMError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_state_machine() {
        let (x, y) = toy(20);
        let split = split(x.view(), y.view(), 0.8).expect("split");
        let trainer = Trainer::new(config(3, 2)).expect("valid config");
        let mut rng = StdRng::seed_from_u64(1);
        let mut sink: Vec<ProgressRecord> = Vec::new();

        let mut session = trainer.start(split, &mut rng).expect("session");
        assert_eq!(session.state(), TrainingState::Initialized);

        assert!(session.step(&mut sink).expect("step 0").is_none());
        assert_eq!(session.state(), TrainingState::Running { step: 1 });

        let record = session.step(&mut sink).expect("step 1");
        assert_eq!(record.map(|r| r.step), Some(1));
        assert_eq!(session.state(), TrainingState::Running { step: 2 });

        session.step(&mut sink).expect("step 2");
        assert_eq!(session.state(), TrainingState::Completed);

        assert!(matches!(
            session.step(&mut sink),
            Err(SVMError::InvalidArgument(_))
        ));
        assert_eq!(sink.len(), 1);
        assert_eq!(session.history(), sink.as_slice());
    }

    #[test]
    fn test_reports_every_interval() {
        let (x, y) = toy(40);
        let split = split(x.view(), y.view(), 0.75).expect("split");
        let trainer = Trainer::new(config(250, 100)).expect("valid config");
        let mut sink: Vec<ProgressRecord> = Vec::new();

        let outcome = trainer
            .train(split, &mut StdRng::seed_from_u64(2), &mut sink)
            .expect("training should succeed");

        assert_eq!(outcome.steps, 250);
        let steps: Vec<usize> = sink.iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![99, 199]);
        assert_eq!(outcome.history, sink);
        for record in &sink {
            assert!((0.0..=1.0).contains(&record.train_accuracy));
            assert!((0.0..=1.0).contains(&record.test_accuracy));
            assert!(record.loss >= 0.0);
        }
        assert!(outcome.final_loss.is_some());
        assert_eq!(outcome.test_metrics.total(), 10);
        assert_eq!(outcome.test_metrics.accuracy(), outcome.test_accuracy);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = toy(30);
        let split = split(x.view(), y.view(), 0.8).expect("split");
        let trainer = Trainer::new(config(50, 10)).expect("valid config");

        let a = trainer
            .train(split, &mut StdRng::seed_from_u64(42), &mut Vec::<ProgressRecord>::new())
            .expect("training should succeed");
        let b = trainer
            .train(split, &mut StdRng::seed_from_u64(42), &mut Vec::<ProgressRecord>::new())
            .expect("training should succeed");
        assert_eq!(a.model, b.model);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_divergence_halts_session() {
        let (mut x, y) = toy(10);
        x.fill(f64::NAN);
        let split = split(x.view(), y.view(), 0.5).expect("split");
        let trainer = Trainer::new(config(5, 1)).expect("valid config");
        let mut rng = StdRng::seed_from_u64(3);
        let mut sink: Vec<ProgressRecord> = Vec::new();

        let mut session = trainer.start(split, &mut rng).expect("session");
        let before = session.model().clone();
        assert!(matches!(
            session.step(&mut sink),
            Err(SVMError::NumericDivergence { step: 0, .. })
        ));
        assert_eq!(session.state(), TrainingState::Halted { step: 0 });
        assert_eq!(session.model(), &before);
        assert!(session.step(&mut sink).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_overflowing_loss_halts_session() {
        let (x, y) = toy(10);
        let split = split(x.view(), y.view(), 0.5).expect("split");
        let config = config(5, 1);
        let trainer = Trainer::new(config.clone()).expect("valid config");
        let mut rng = StdRng::seed_from_u64(4);
        let mut sink: Vec<ProgressRecord> = Vec::new();

        let mut session = trainer.start(split, &mut rng).expect("session");
        // gradient and update stay finite, Reg * |w|^2 / 2 does not
        session.model = LinearModel::new(
            Parameters::new(array![1e154, 1e154], 0.0),
            MarginObjective::from(&config),
        );

        assert!(matches!(
            session.step(&mut sink),
            Err(SVMError::NumericDivergence { step: 0, .. })
        ));
        assert_eq!(session.state(), TrainingState::Halted { step: 0 });
        assert!(session.model().parameters().is_finite());

        let halted = session.model().clone();
        assert!(matches!(
            session.step(&mut sink),
            Err(SVMError::InvalidArgument(_))
        ));
        assert_eq!(session.model(), &halted);
        assert_eq!(session.optimizer.steps_taken(), 1);
        assert!(sink.is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_start_rejects_mismatched_split() {
        let (x, y) = toy(10);
        let wide = Array2::<f64>::zeros((5, 3));
        let mut split = split(x.view(), y.view(), 0.5).expect("split");
        split.test.features = wide.view();

        let trainer = Trainer::new(TrainingConfig::default()).expect("valid config");
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            trainer.start(split, &mut rng).map(|_| ()),
            Err(SVMError::InvalidShape(_))
        ));
    }
}
