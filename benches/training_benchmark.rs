use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gdsvm::data::sample;
use gdsvm::{
    GradientDescent, LabeledDataset, LinearModel, LinearSVM, MarginObjective, ProgressRecord,
    TrainingConfig,
};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn toy(n: usize, dim: usize) -> LabeledDataset {
    let labels = Array1::from_shape_fn(n, |i| if i % 2 == 0 { 1.0 } else { -1.0 });
    let features = Array2::from_shape_fn((n, dim), |(i, j)| {
        labels[i] * (1.0 + ((i * 31 + j * 17) % 13) as f64 / 13.0)
    });
    LabeledDataset::new(features, labels).expect("valid dataset")
}

fn bench_gradient_step(c: &mut Criterion) {
    let dataset = toy(1000, 16);
    let mut rng = StdRng::seed_from_u64(0);
    let batch = sample(dataset.features(), dataset.labels(), 32, &mut rng).expect("sample");
    let mut model = LinearModel::random(16, MarginObjective::default(), &mut rng);
    let mut optimizer = GradientDescent::new(1e-4).expect("valid learning rate");

    c.bench_function("gradient_step_32x16", |b| {
        b.iter(|| {
            optimizer
                .step(black_box(&mut model), black_box(&batch))
                .expect("step")
        })
    });
}

fn bench_short_training_run(c: &mut Criterion) {
    let dataset = toy(500, 4);
    let config = TrainingConfig {
        step_count: 200,
        report_interval: 50,
        ..Default::default()
    };

    c.bench_function("train_200_steps_500x4", |b| {
        b.iter(|| {
            LinearSVM::with_config(config.clone())
                .fit_with_sink(
                    black_box(&dataset),
                    &mut StdRng::seed_from_u64(1),
                    &mut Vec::<ProgressRecord>::new(),
                )
                .expect("training")
        })
    });
}

criterion_group!(benches, bench_gradient_step, bench_short_training_run);
criterion_main!(benches);
