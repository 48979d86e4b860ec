use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quercus::classifier::DecisionTreeClassifier;
use quercus::data::Matrix;
use quercus::model::Model;
use quercus::splitter::best_split;
use quercus::tree::tree::{Tree, TreeParams};
use std::time::Duration;

// Deterministic synthetic dataset, column-major with `cols` features in
// [0, 1) and a label tied to the first two columns.
fn synthetic_dataset(rows: usize, cols: usize) -> (Vec<f64>, Vec<i64>) {
    let mut data = vec![0.0; rows * cols];
    let mut state: u64 = 42;
    for value in data.iter_mut() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        *value = (state >> 11) as f64 / (1u64 << 53) as f64;
    }
    let y: Vec<i64> = (0..rows)
        .map(|row| {
            let a = data[row];
            let b = data[row + rows];
            if a + b > 1.0 {
                1
            } else {
                0
            }
        })
        .collect();
    (data, y)
}

pub fn training_benchmark(c: &mut Criterion) {
    let (data_vec, y) = synthetic_dataset(10_000, 5);
    let data = Matrix::new(&data_vec, y.len(), 5);
    let indices: Vec<usize> = (0..data.rows).collect();
    let params = TreeParams::default();

    c.bench_function("Best Split", |b| {
        b.iter(|| best_split(black_box(&data), black_box(&y), black_box(&indices)))
    });

    let mut group = c.benchmark_group("training_benchmark");
    group.warm_up_time(Duration::from_secs(5));
    group.measurement_time(Duration::from_secs(20)); // Give it more time for stable results
    group.sample_size(10); // Reduce sample size as training might be slow

    group.bench_function("train_tree_synthetic", |b| {
        b.iter(|| Tree::fit(black_box(&data), black_box(&y), black_box(&params)))
    });
    group.finish();

    let mut model = DecisionTreeClassifier::default();
    model.fit(&data, &y).unwrap();
    c.bench_function("Predict", |b| b.iter(|| model.predict(black_box(&data))));
}

criterion_group!(benches, training_benchmark);
criterion_main!(benches);
