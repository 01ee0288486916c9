//! gdsvm Command Line Interface
//!
//! Trains a linear SVM by mini-batch gradient descent on a bundled dataset
//! and reports train/test accuracy as it goes.

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use gdsvm::report::TrainingReport;
use gdsvm::utils::binarize_labels;
use gdsvm::utils::shuffle_rows;
use gdsvm::utils::validation::is_single_class;
use gdsvm::{LabeledDataset, ProgressRecord, ProgressSink, Result, SVMError, Trainer, TrainingConfig};
use log::{error, info, warn};
use ndarray::{array, s, Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "gdsvm")]
#[command(about = "Linear SVM trained by mini-batch gradient descent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "gdsvm contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model and report train/test accuracy
    Train(TrainArgs),
    /// Validate hyperparameters and print the resolved configuration
    Config(ConfigArgs),
}

#[derive(Args, Clone, Debug)]
struct HyperParams {
    /// Gradient descent learning rate
    #[arg(long, default_value = "0.01")]
    learning_rate: f64,

    /// Number of training steps
    #[arg(long, default_value = "1000")]
    steps: usize,

    /// Rows sampled (with replacement) per step
    #[arg(long, default_value = "32")]
    batch_size: usize,

    /// Margin width
    #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
    delta: f64,

    /// Classification loss weight C
    #[arg(short = 'C', long, default_value = "1.0", allow_negative_numbers = true)]
    c: f64,

    /// Regularization weight
    #[arg(long, default_value = "0.01", allow_negative_numbers = true)]
    reg: f64,

    /// Fraction of rows used for training
    #[arg(long, default_value = "0.8")]
    train_fraction: f64,

    /// Steps between progress lines
    #[arg(long, default_value = "100")]
    report_interval: usize,
}

impl From<HyperParams> for TrainingConfig {
    fn from(params: HyperParams) -> Self {
        TrainingConfig {
            learning_rate: params.learning_rate,
            step_count: params.steps,
            batch_size: params.batch_size,
            delta: params.delta,
            c: params.c,
            reg: params.reg,
            train_fraction: params.train_fraction,
            report_interval: params.report_interval,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliDataset {
    /// Iris flowers, first two features, one class against the rest
    #[value(name = "iris")]
    Iris,
    /// Two Gaussian blobs centred at (2, 2) and (-2, -2)
    #[value(name = "blobs")]
    Blobs,
}

#[derive(Args)]
struct TrainArgs {
    #[command(flatten)]
    params: HyperParams,

    /// Dataset to train on
    #[arg(long, default_value = "iris")]
    dataset: CliDataset,

    /// Iris class mapped to +1; the other classes become -1
    #[arg(long, default_value = "0")]
    positive_class: usize,

    /// Points per blob for the blobs dataset
    #[arg(long, default_value = "50")]
    blob_size: usize,

    /// Shuffle rows before the contiguous train/test split
    #[arg(long)]
    shuffle: bool,

    /// Random seed (drawn at random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON training report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(flatten)]
    params: HyperParams,
}

/// Prints progress lines to stdout
struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn record(&mut self, progress: &ProgressRecord) {
        info!("Step {} batch loss: {:.6}", progress.step, progress.loss);
        println!(
            "Step{}: test acc {}, train acc {}",
            progress.step, progress.test_accuracy, progress.train_accuracy
        );
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Config(args) => config_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    let config = TrainingConfig::from(args.params.clone());
    let trainer = Trainer::new(config)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Using seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let (name, features, labels) = load_dataset(&args, &mut rng)?;
    let (features, labels) = if args.shuffle {
        shuffle_rows(features.view(), labels.view(), &mut rng)?
    } else {
        (features, labels)
    };
    let dataset = LabeledDataset::new(features, labels)?;
    info!(
        "Loaded {} samples with {} dimensions from {name}",
        dataset.n_samples(),
        dataset.n_features()
    );

    let split = dataset.split(trainer.config().train_fraction)?;
    for (side, view) in [("train", split.train), ("test", split.test)] {
        if is_single_class(view.labels) {
            warn!("The {side} split contains a single class; consider --shuffle");
        }
    }

    let started_at = Utc::now();
    let outcome = trainer.train(split, &mut rng, &mut ConsoleSink)?;

    let report = TrainingReport::from_outcome(
        name,
        (split.train.n_samples(), split.test.n_samples()),
        trainer.config(),
        &outcome,
        started_at,
    );
    report.print_summary();

    let params = outcome.model.parameters();
    info!("Weights: {}", params.weights);
    info!("Bias: {:.6}", params.bias);

    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        info!("Report saved to: {path:?}");
    }

    Ok(())
}

fn config_command(args: ConfigArgs) -> Result<()> {
    let config = TrainingConfig::from(args.params);
    config.validate()?;
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| SVMError::SerializationError(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn load_dataset(args: &TrainArgs, rng: &mut StdRng) -> Result<(String, Array2<f64>, Array1<f64>)> {
    match args.dataset {
        CliDataset::Iris => {
            let iris = linfa_datasets::iris();
            let features = iris.records.slice(s![.., ..2]).to_owned();
            let labels = binarize_labels(iris.targets.view(), args.positive_class);
            Ok(("iris".to_string(), features, labels))
        }
        CliDataset::Blobs => {
            if args.blob_size == 0 {
                return Err(SVMError::InvalidArgument(
                    "blob size must be greater than 0".to_string(),
                ));
            }
            let centroids = array![[2.0, 2.0], [-2.0, -2.0]];
            let features = linfa_datasets::generate::blobs(args.blob_size, &centroids, rng);
            let labels = Array1::from_shape_fn(2 * args.blob_size, |i| {
                if i < args.blob_size {
                    1.0
                } else {
                    -1.0
                }
            });
            Ok(("blobs".to_string(), features, labels))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyperparams_into_config() {
        let cli = Cli::parse_from(["gdsvm", "config", "--steps", "5", "-C", "2.5", "--reg", "0"]);
        let Commands::Config(args) = cli.command else {
            panic!("expected config subcommand");
        };
        let config = TrainingConfig::from(args.params);
        assert_eq!(config.step_count, 5);
        assert_eq!(config.c, 2.5);
        assert_eq!(config.reg, 0.0);
        assert_eq!(config.batch_size, TrainingConfig::default().batch_size);
    }

    #[test]
    fn test_defaults_match_library() {
        let cli = Cli::parse_from(["gdsvm", "config"]);
        let Commands::Config(args) = cli.command else {
            panic!("expected config subcommand");
        };
        assert_eq!(TrainingConfig::from(args.params), TrainingConfig::default());
    }
}
