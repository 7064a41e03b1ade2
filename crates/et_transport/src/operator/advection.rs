// crates/et_transport/src/operator/advection.rs

//! 多轴对流算子
//!
//! 组合若干 [`AxisAdvection`]，按分裂方案推进整个场：
//!
//! - `Simultaneous`: 各轴导数求和作为 ODE 右端项，由时间积分器推进
//! - `Lie`: 依次推进每个轴，后一个轴看到前一个轴的更新
//! - `Strang`: `A0(Δt/2) ... Ak(Δt) ... A0(Δt/2)`
//!
//! 顺序分裂的每个子步同样由时间积分器推进，子步的 Courant 数按子步长计算。

use et_config::{ParallelConfig, TransportConfig};
use et_foundation::{ensure, EtError, EtResult, RuntimeScalar};
use ndarray::ArrayD;
use tracing::{debug, info};

use super::axis::{AxisAdvection, ParallelPolicy};
use super::provider::{ConstantVelocity, UniformSpacing};
use crate::boundary::BoundaryKind;
use crate::engine::splitting::{SplitProcess, SplittingScheme};
use crate::engine::time_integrator::{RhsComputer, TimeIntegratorKind};
use crate::reorder::AxisReorder;
use crate::stencil::StencilKind;

/// 多轴对流算子
#[derive(Debug, Clone)]
pub struct AdvectionOperator<S: RuntimeScalar> {
    axes: Vec<AxisAdvection<S>>,
    shape: Vec<usize>,
    dt: f64,
    integrator: TimeIntegratorKind,
    scheme: SplittingScheme,
}

impl<S: RuntimeScalar> AdvectionOperator<S> {
    /// 创建构建器
    pub fn builder() -> AdvectionOperatorBuilder<S> {
        AdvectionOperatorBuilder::default()
    }

    /// 由配置构建常速度、均匀网格的算子
    ///
    /// 每个轴使用 `grid.velocity[axis]` 与 `grid.spacing[axis]`。
    pub fn from_config(config: &TransportConfig) -> EtResult<Self> {
        config
            .validate()
            .map_err(|e| EtError::config(e.to_string()))?;

        let stencil = StencilKind::from_config(&config.scheme);
        let boundary = BoundaryKind::<S>::from_choice(&config.boundary);
        let parallel = ParallelPolicy::from(&config.parallel);
        let shape = &config.grid.shape;

        let mut builder = Self::builder()
            .dt(config.time.dt)
            .integrator(config.time.integrator.into())
            .scheme(config.time.splitting.into());
        for axis in 0..shape.len() {
            let op = AxisAdvection::builder(AxisReorder::new(shape, axis)?)
                .stencil(stencil)
                .boundary(boundary)
                .velocity(ConstantVelocity(S::from_config(config.grid.velocity[axis])))
                .spacing(UniformSpacing(S::from_config(config.grid.spacing[axis])))
                .parallel(parallel)
                .build()?;
            builder = builder.axis(op);
        }

        let op = builder.build()?;
        info!(
            precision = S::NAME,
            stencil = stencil.choice().name(),
            boundary = config.boundary.name(),
            scheme = op.scheme.name(),
            integrator = op.integrator.name(),
            "对流算子已由配置构建"
        );
        Ok(op)
    }

    /// 场形状
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// 各轴算子
    pub fn axes(&self) -> &[AxisAdvection<S>] {
        &self.axes
    }

    /// 绑定的时间步长
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// 时间积分器
    pub fn integrator(&self) -> TimeIntegratorKind {
        self.integrator
    }

    /// 分裂方案
    pub fn scheme(&self) -> SplittingScheme {
        self.scheme
    }

    fn check_field(&self, field: &ArrayD<S>) -> EtResult<()> {
        EtError::check_shape("field", &self.shape, field.shape())
    }

    /// 所有轴的导数之和（使用绑定的 Δt）
    pub fn derivative(&self, field: &ArrayD<S>, t: f64) -> EtResult<ArrayD<S>> {
        let mut out = ArrayD::zeros(field.raw_dim());
        self.compute_rhs(field, t, self.dt, &mut out)?;
        Ok(out)
    }

    /// 推进一个绑定的 Δt
    pub fn step(&self, field: &mut ArrayD<S>, t: f64) -> EtResult<()> {
        self.advance_with(field, t, self.dt, self.scheme)
    }

    /// 顺序分裂推进
    ///
    /// 方案为 `Lie` 时按轴顺序推进，其余情况使用 Strang 对称顺序。
    pub fn step_split(&self, field: &mut ArrayD<S>, t: f64, dt: f64) -> EtResult<()> {
        let scheme = match self.scheme {
            SplittingScheme::Lie => SplittingScheme::Lie,
            _ => SplittingScheme::Strang,
        };
        self.advance_with(field, t, dt, scheme)
    }

    /// 按给定方案推进 `dt`
    ///
    /// 全部子步在副本上完成后才写回。
    pub fn advance_with(
        &self,
        field: &mut ArrayD<S>,
        t: f64,
        dt: f64,
        scheme: SplittingScheme,
    ) -> EtResult<()> {
        self.check_field(field)?;
        let mut work = field.clone();
        match scheme {
            SplittingScheme::Simultaneous => {
                self.integrator.advance(&mut work, t, dt, self)?;
            }
            SplittingScheme::Lie | SplittingScheme::Strang => {
                for (i, offset, fraction) in scheme.schedule(self.axes.len()) {
                    self.integrator
                        .advance(&mut work, t + offset * dt, fraction * dt, &self.axes[i])?;
                }
            }
        }
        *field = work;
        Ok(())
    }

    /// 连续推进 `n_steps` 个绑定 Δt，返回结束时间
    pub fn run(&self, field: &mut ArrayD<S>, t0: f64, n_steps: usize) -> EtResult<f64> {
        let mut t = t0;
        for _ in 0..n_steps {
            self.step(field, t)?;
            t += self.dt;
        }
        Ok(t)
    }
}

impl<S: RuntimeScalar> RhsComputer<S> for AdvectionOperator<S> {
    fn compute_rhs(&self, state: &ArrayD<S>, t: f64, dt: f64, out: &mut ArrayD<S>) -> EtResult<()> {
        self.check_field(state)?;
        EtError::check_shape("output", &self.shape, out.shape())?;
        // 先在临时数组中累加，失败时保持 out 不变
        let mut sum = ArrayD::zeros(state.raw_dim());
        for axis in &self.axes {
            axis.accumulate(state, t, dt, S::ONE, &mut sum)?;
        }
        out.assign(&sum);
        Ok(())
    }
}

impl<S: RuntimeScalar> SplitProcess<S> for AdvectionOperator<S> {
    fn name(&self) -> &str {
        "advection"
    }

    fn advance(&self, field: &mut ArrayD<S>, t: f64, dt: f64) -> EtResult<()> {
        self.advance_with(field, t, dt, self.scheme)
    }
}

/// 多轴算子构建器
pub struct AdvectionOperatorBuilder<S: RuntimeScalar> {
    axes: Vec<AxisAdvection<S>>,
    dt: f64,
    integrator: TimeIntegratorKind,
    scheme: SplittingScheme,
}

impl<S: RuntimeScalar> Default for AdvectionOperatorBuilder<S> {
    fn default() -> Self {
        Self {
            axes: Vec::new(),
            dt: 1.0,
            integrator: TimeIntegratorKind::default(),
            scheme: SplittingScheme::default(),
        }
    }
}

impl<S: RuntimeScalar> AdvectionOperatorBuilder<S> {
    /// 追加一个轴
    pub fn axis(mut self, axis: AxisAdvection<S>) -> Self {
        self.axes.push(axis);
        self
    }

    /// 设置时间步长
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// 设置时间积分器
    pub fn integrator(mut self, integrator: TimeIntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    /// 设置分裂方案
    pub fn scheme(mut self, scheme: SplittingScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// 对所有轴统一设置并行策略
    pub fn parallel(mut self, config: &ParallelConfig) -> Self {
        let policy = ParallelPolicy::from(config);
        self.axes = self.axes.iter().map(|a| a.with_parallel(policy)).collect();
        self
    }

    /// 构建，检查各轴形状一致
    pub fn build(self) -> EtResult<AdvectionOperator<S>> {
        let first = self
            .axes
            .first()
            .ok_or_else(|| EtError::config("对流算子至少需要一个轴"))?;
        let shape = first.reorder().shape().to_vec();
        for axis in &self.axes[1..] {
            EtError::check_shape("axis_shape", &shape, axis.reorder().shape())?;
        }
        ensure!(
            self.dt.is_finite() && self.dt > 0.0,
            EtError::invalid_input(format!("时间步长必须为正: {}", self.dt))
        );

        debug!(
            n_axes = self.axes.len(),
            dt = self.dt,
            scheme = self.scheme.name(),
            integrator = self.integrator.name(),
            "构建对流算子"
        );

        Ok(AdvectionOperator {
            axes: self.axes,
            shape,
            dt: self.dt,
            integrator: self.integrator,
            scheme: self.scheme,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Periodic;
    use crate::stencil::Upwind1;
    use et_config::{StencilChoice, TimeConfig};
    use ndarray::IxDyn;

    fn axis_op(shape: &[usize], axis: usize, u: f64) -> AxisAdvection<f64> {
        AxisAdvection::builder(AxisReorder::new(shape, axis).unwrap())
            .stencil(Upwind1)
            .boundary(Periodic)
            .velocity(ConstantVelocity(u))
            .spacing(UniformSpacing(1.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_derivative_sums_axes() {
        let shape = [4, 5];
        let op = AdvectionOperator::builder()
            .axis(axis_op(&shape, 0, 1.0))
            .axis(axis_op(&shape, 1, -0.5))
            .dt(0.1)
            .build()
            .unwrap();
        let field = ArrayD::from_shape_fn(IxDyn(&shape), |ix| (ix[0] * 5 + ix[1]) as f64);
        let total = op.derivative(&field, 0.0).unwrap();
        let a = op.axes()[0].derivative(&field, 0.0, 0.1).unwrap();
        let b = op.axes()[1].derivative(&field, 0.0, 0.1).unwrap();
        assert_eq!(total, &a + &b);
    }

    #[test]
    fn test_mismatched_axis_shapes_rejected() {
        let result = AdvectionOperator::builder()
            .axis(axis_op(&[4, 5], 0, 1.0))
            .axis(axis_op(&[5, 4], 1, 1.0))
            .build();
        assert!(matches!(result, Err(EtError::ShapeMismatch { .. })));
        assert!(AdvectionOperator::<f64>::builder().build().is_err());
    }

    #[test]
    fn test_non_positive_dt_rejected() {
        for dt in [0.0, -0.1, f64::NAN] {
            let result = AdvectionOperator::builder()
                .axis(axis_op(&[4], 0, 1.0))
                .dt(dt)
                .build();
            assert!(matches!(result, Err(EtError::InvalidInput { .. })));
        }
    }

    #[test]
    fn test_step_rejects_wrong_field_shape() {
        let op = AdvectionOperator::builder()
            .axis(axis_op(&[4], 0, 1.0))
            .build()
            .unwrap();
        let mut field = ArrayD::zeros(IxDyn(&[5]));
        assert!(op.step(&mut field, 0.0).is_err());
    }

    #[test]
    fn test_from_config_builds_each_axis() {
        let mut config = TransportConfig::default();
        config.grid.shape = vec![8, 6];
        config.grid.spacing = vec![1.0, 2.0];
        config.grid.velocity = vec![0.5, -0.5];
        config.scheme.stencil = StencilChoice::Ppm;
        config.time = TimeConfig {
            dt: 0.5,
            ..Default::default()
        };
        let op = AdvectionOperator::<f32>::from_config(&config).unwrap();
        assert_eq!(op.axes().len(), 2);
        assert_eq!(op.shape(), &[8, 6]);
        assert_eq!(op.axes()[1].stencil().name(), "ppm");
        assert_eq!(op.dt(), 0.5);
    }

    #[test]
    fn test_run_advances_time() {
        let op = AdvectionOperator::builder()
            .axis(axis_op(&[6], 0, 1.0))
            .dt(0.25)
            .integrator(TimeIntegratorKind::ForwardEuler)
            .build()
            .unwrap();
        let mut field = ArrayD::from_elem(IxDyn(&[6]), 2.0);
        let t = op.run(&mut field, 1.0, 4).unwrap();
        assert_eq!(t, 2.0);
        assert!(field.iter().all(|&v| (v - 2.0).abs() < 1e-14));
    }
}
