use ckks_workbench::params::reference_8192_4;
use ckks_workbench::{CkksEngine, EncMode, inputs};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_kernels(c: &mut Criterion) {
    // Reference parameter point: degree 8192, {60,40,40,60}, scale 2^40.
    let engine = CkksEngine::builder(reference_8192_4(EncMode::Symmetric))
        .build()
        .expect("engine setup failed");

    let mut rng = inputs::seeded_rng(123);
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -100.0, 100.0)
        .expect("input generation failed");
    let b = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -100.0, 100.0)
        .expect("input generation failed");

    let plain_a = engine.encode(&a).expect("encode failed");
    let plain_b = engine.encode(&b).expect("encode failed");
    let ct_a = engine.encrypt(&plain_a).expect("encrypt failed");
    let ct_b = engine.encrypt(&plain_b).expect("encrypt failed");

    // A degree-3 product for the relinearize bench and a relinearized one
    // for the rescale bench; all measured entry points are out-of-place so
    // every iteration sees the same operands.
    let product = engine.multiply(&ct_a, &ct_b).expect("multiply failed");
    let relined = engine.relinearize(&product).expect("relinearize failed");
    let decrypted = engine.decrypt(&ct_a).expect("decrypt failed");

    let mut group = c.benchmark_group("ckks_kernels");

    group.bench_function("encode", |bench| {
        bench.iter(|| engine.encode(black_box(&a)).unwrap())
    });
    group.bench_function("decode", |bench| {
        bench.iter(|| engine.decode(black_box(&decrypted)).unwrap())
    });
    group.bench_function("encrypt", |bench| {
        bench.iter(|| engine.encrypt(black_box(&plain_a)).unwrap())
    });
    group.bench_function("decrypt", |bench| {
        bench.iter(|| engine.decrypt(black_box(&ct_a)).unwrap())
    });
    group.bench_function("add", |bench| {
        bench.iter(|| engine.add(black_box(&ct_a), black_box(&ct_b)).unwrap())
    });
    group.bench_function("add_plain", |bench| {
        bench.iter(|| engine.add_plain(black_box(&ct_a), black_box(&plain_b)).unwrap())
    });
    group.bench_function("multiply", |bench| {
        bench.iter(|| engine.multiply(black_box(&ct_a), black_box(&ct_b)).unwrap())
    });
    group.bench_function("multiply_plain", |bench| {
        bench.iter(|| {
            engine
                .multiply_plain(black_box(&ct_a), black_box(&plain_b))
                .unwrap()
        })
    });
    group.bench_function("square", |bench| {
        bench.iter(|| engine.square(black_box(&ct_a)).unwrap())
    });
    group.bench_function("negate", |bench| {
        bench.iter(|| engine.negate(black_box(&ct_a)).unwrap())
    });
    group.bench_function("relinearize", |bench| {
        bench.iter(|| engine.relinearize(black_box(&product)).unwrap())
    });
    group.bench_function("rescale", |bench| {
        bench.iter(|| engine.rescale(black_box(&relined)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_kernels);
criterion_main!(benches);
