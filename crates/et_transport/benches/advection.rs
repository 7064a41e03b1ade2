// crates/et_transport/benches/advection.rs

//! 对流算子基准测试
//!
//! Run with: cargo bench -p et_transport

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use et_transport::prelude::*;
use ndarray::{ArrayD, IxDyn};

const SIZES: [usize; 4] = [594, 918, 1188, 1836];
const COLUMNS: usize = 16;

fn field(n: usize) -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(&[n, COLUMNS]), |ix| {
        let x = ix[0] as f64 / n as f64;
        1.0 + (std::f64::consts::TAU * x).sin() + 0.01 * ix[1] as f64
    })
}

fn operator(n: usize, stencil: StencilKind) -> AxisAdvection<f64> {
    AxisAdvection::builder(AxisReorder::new(&[n, COLUMNS], 0).unwrap())
        .stencil(stencil)
        .boundary(ZeroGradient)
        .velocity(ConstantVelocity(10.0))
        .spacing(UniformSpacing(1000.0))
        .build()
        .unwrap()
}

fn bench_advection(c: &mut Criterion) {
    let mut group = c.benchmark_group("Advection Simulator");
    for (name, stencil) in [("l94", StencilKind::l94()), ("ppm", StencilKind::ppm())] {
        for n in SIZES {
            let op = operator(n, stencil);
            let input = field(n);

            group.bench_with_input(BenchmarkId::new(format!("out-of-place/{name}"), n), &n, |b, _| {
                b.iter(|| black_box(op.derivative(black_box(&input), 0.0, 60.0).unwrap()));
            });

            group.bench_with_input(BenchmarkId::new(format!("in-place/{name}"), n), &n, |b, _| {
                let mut state = input.clone();
                b.iter(|| {
                    op.apply_in_place(black_box(&mut state), 0.0, 60.0).unwrap();
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_advection);
criterion_main!(benches);
