// crates/et_transport/tests/splitting.rs

//! 算子分裂测试
//!
//! - Strang/Lie 分裂的二维对流守恒质量
//! - 对流 + 排放源项的 Strang 驱动器
//! - 失败的子步不修改场

use et_transport::prelude::*;
use et_transport::{SourceProcess, StrangSplitter};
use ndarray::{ArrayD, IxDyn};

fn axis_op(
    shape: &[usize],
    axis: usize,
    stencil: StencilKind,
    velocity: impl EdgeVelocity<f64> + 'static,
) -> AxisAdvection<f64> {
    AxisAdvection::builder(AxisReorder::new(shape, axis).unwrap())
        .stencil(stencil)
        .boundary(Periodic)
        .velocity(velocity)
        .spacing(UniformSpacing(1.0))
        .build()
        .unwrap()
}

fn advection_2d(shape: &[usize], stencil: StencilKind, scheme: SplittingScheme) -> AdvectionOperator<f64> {
    AdvectionOperator::builder()
        .axis(axis_op(shape, 0, stencil, ConstantVelocity(0.8)))
        .axis(axis_op(shape, 1, stencil, ConstantVelocity(-0.5)))
        .dt(0.5)
        .integrator(TimeIntegratorKind::ForwardEuler)
        .scheme(scheme)
        .build()
        .unwrap()
}

fn blob(shape: &[usize]) -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(shape), |ix| {
        let dx = ix[0] as f64 - 5.0;
        let dy = ix[1] as f64 - 7.0;
        0.5 + (-(dx * dx + dy * dy) / 6.0).exp()
    })
}

#[test]
fn test_strang_splitting_conserves_mass_2d() {
    let shape = [10, 14];
    for stencil in [StencilKind::upwind1(), StencilKind::l94(), StencilKind::ppm()] {
        let op = advection_2d(&shape, stencil, SplittingScheme::Strang);
        let mut field = blob(&shape);
        let before = field.sum();
        op.run(&mut field, 0.0, 20).unwrap();
        let rel = ((field.sum() - before) / before).abs();
        assert!(rel < 1e-12, "{}: {rel:e}", Stencil::<f64>::name(&stencil));
    }
}

#[test]
fn test_lie_splitting_conserves_mass_2d() {
    let shape = [10, 14];
    let op = advection_2d(&shape, StencilKind::l94(), SplittingScheme::Lie);
    let mut field = blob(&shape);
    let before = field.sum();
    for step in 0..20 {
        op.step_split(&mut field, step as f64 * 0.5, 0.5).unwrap();
    }
    assert!(((field.sum() - before) / before).abs() < 1e-12);
}

#[test]
fn test_split_preserves_uniform_field() {
    let shape = [8, 8];
    let op = advection_2d(&shape, StencilKind::ppm(), SplittingScheme::Strang);
    let mut field = ArrayD::from_elem(IxDyn(&shape), 3.0);
    op.step_split(&mut field, 0.0, 0.5).unwrap();
    assert!(field.iter().all(|&v| (v - 3.0).abs() < 1e-14));
}

#[test]
fn test_step_split_defaults_to_strang() {
    let shape = [10, 14];
    let simultaneous = advection_2d(&shape, StencilKind::l94(), SplittingScheme::Simultaneous);
    let mut a = blob(&shape);
    let mut b = a.clone();
    simultaneous.step_split(&mut a, 0.0, 0.5).unwrap();
    simultaneous
        .advance_with(&mut b, 0.0, 0.5, SplittingScheme::Strang)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_splitter_with_emission_source() {
    // 对流守恒，总质量仅增加排放量 E · Δt
    let shape = [10, 14];
    let emission = 2.5;
    let source = SourceProcess::new("emission", move |index: &[usize], _value: f64, _t: f64| -> EtResult<f64> {
        Ok(if index == [3, 4] { emission } else { 0.0 })
    });
    let splitter = StrangSplitter::new()
        .with_process(advection_2d(&shape, StencilKind::l94(), SplittingScheme::Strang))
        .with_process(source);
    assert_eq!(splitter.len(), 2);

    let mut field = blob(&shape);
    let before = field.sum();
    let dt = 0.5;
    for step in 0..4 {
        splitter.step(&mut field, step as f64 * dt, dt).unwrap();
    }
    let expected = before + 4.0 * emission * dt;
    assert!(((field.sum() - expected) / expected).abs() < 1e-12);
}

#[test]
fn test_failing_axis_leaves_field_untouched() {
    let shape = [10, 14];
    let failing = |edge: usize, transverse: &[usize], _t: f64| -> EtResult<f64> {
        if edge == 4 && transverse[0] == 9 {
            Err(EtError::provider("wind", "数据缺失"))
        } else {
            Ok(0.3)
        }
    };
    let op = AdvectionOperator::builder()
        .axis(axis_op(&shape, 0, StencilKind::l94(), ConstantVelocity(0.8)))
        .axis(axis_op(&shape, 1, StencilKind::l94(), failing))
        .dt(0.5)
        .scheme(SplittingScheme::Strang)
        .build()
        .unwrap();

    let mut field = blob(&shape);
    let before = field.clone();
    let err = op.step(&mut field, 0.0).unwrap_err();
    assert!(matches!(err, EtError::Provider { .. }));
    assert_eq!(field, before);
}
