use criterion::{criterion_group, criterion_main, Criterion, black_box};
use aqtsim::model::example_activation;
use aqtsim::{dense, AqtDenseModel, Matrix, ParameterBundle};

fn make_layer(inp: usize, out: usize) -> ParameterBundle {
    let mut seed = 0x1234_5678_9abc_def0u64;
    let mut next = || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        (((seed >> 32) as i32 % 2001) - 1000) as f32 / 1000.0
    };
    let w: Vec<f32> = (0..inp * out).map(|_| next()).collect();
    ParameterBundle::new(Matrix::new(inp, out, w).unwrap(), vec![0.0; out], 8.0).unwrap()
}

fn bench_example_model(c: &mut Criterion) {
    let m = AqtDenseModel::example().unwrap();
    let x = example_activation();
    c.bench_function("aqt_example_model_forward", |ben| {
        ben.iter(|| black_box(m.forward(black_box(&x)).unwrap()))
    });
}

fn bench_dense_256(c: &mut Criterion) {
    let p = make_layer(256, 256);
    let x = Matrix::arange(64, 256).scale(1.0 / 16384.0);
    c.bench_function("aqt_dense_64x256x256", |ben| {
        ben.iter(|| black_box(dense(&p, black_box(&x)).unwrap()))
    });
}

criterion_group!(benches, bench_example_model, bench_dense_256);
criterion_main!(benches);
