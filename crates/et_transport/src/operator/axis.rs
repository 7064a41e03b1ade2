// crates/et_transport/src/operator/axis.rs

//! 单轴对流算子
//!
//! 沿一个张量轴做一次完整扫描：
//!
//! 1. 正变换为列矩阵（只读副本，所有列读取扫描前的场）
//! 2. 每列包装幽灵单元，逐单元取模板窗口
//! 3. 取两侧面速度与单元网格间距，调用模板
//! 4. 导数写入独立缓冲区，逆变换回原形状
//!
//! 列之间互不依赖，列数达到阈值时用 rayon 并行。
//! 任何一列失败时整个扫描返回错误，输入场不被修改。

use std::sync::Arc;

use et_config::ParallelConfig;
use et_foundation::{EtError, EtResult, RuntimeScalar};
use ndarray::ArrayD;
use rayon::prelude::*;
use tracing::debug;

use super::provider::{EdgeVelocity, GridSpacing};
use crate::boundary::{BcArray, BoundaryCondition, BoundaryKind};
use crate::engine::time_integrator::RhsComputer;
use crate::reorder::{AxisReorder, ColumnMatrix};
use crate::stencil::{Stencil, StencilKind};

// ============================================================
// 并行策略
// ============================================================

/// 列并行策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelPolicy {
    /// 是否允许并行
    pub enabled: bool,
    /// 列数低于此值时串行
    pub min_columns: usize,
}

impl ParallelPolicy {
    /// 完全串行
    pub const fn sequential() -> Self {
        Self {
            enabled: false,
            min_columns: usize::MAX,
        }
    }

    /// 总是并行
    pub const fn always() -> Self {
        Self {
            enabled: true,
            min_columns: 0,
        }
    }

    /// 是否对 `n_cols` 列使用并行
    #[inline]
    pub fn should_parallelize(&self, n_cols: usize) -> bool {
        self.enabled && n_cols >= self.min_columns
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self::from(&ParallelConfig::default())
    }
}

impl From<&ParallelConfig> for ParallelPolicy {
    fn from(config: &ParallelConfig) -> Self {
        Self {
            enabled: config.enabled,
            min_columns: config.min_parallel_columns,
        }
    }
}

// ============================================================
// 单轴算子
// ============================================================

/// 单轴对流算子
///
/// 构建后不再变化，可在多次调用和多线程间共享。
#[derive(Clone)]
pub struct AxisAdvection<S: RuntimeScalar> {
    reorder: AxisReorder,
    stencil: Arc<dyn Stencil<S>>,
    boundary: Arc<dyn BoundaryCondition<S>>,
    velocity: Arc<dyn EdgeVelocity<S>>,
    spacing: Arc<dyn GridSpacing<S>>,
    parallel: ParallelPolicy,
}

impl<S: RuntimeScalar> std::fmt::Debug for AxisAdvection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisAdvection")
            .field("axis", &self.reorder.axis())
            .field("shape", &self.reorder.shape())
            .field("stencil", &self.stencil.name())
            .field("boundary", &self.boundary.name())
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl<S: RuntimeScalar> AxisAdvection<S> {
    /// 以重排映射开始构建
    ///
    /// 速度场、网格间距提供者可以在此之前借助 `reorder` 计算索引。
    pub fn builder(reorder: AxisReorder) -> AxisAdvectionBuilder<S> {
        AxisAdvectionBuilder::new(reorder)
    }

    /// 重排映射
    pub fn reorder(&self) -> &AxisReorder {
        &self.reorder
    }

    /// 扫描轴
    pub fn axis(&self) -> usize {
        self.reorder.axis()
    }

    /// 模板格式
    pub fn stencil(&self) -> &dyn Stencil<S> {
        self.stencil.as_ref()
    }

    /// 边界条件
    pub fn boundary(&self) -> &dyn BoundaryCondition<S> {
        self.boundary.as_ref()
    }

    /// 面速度提供者
    pub fn velocity(&self) -> &dyn EdgeVelocity<S> {
        self.velocity.as_ref()
    }

    /// 网格间距提供者
    pub fn spacing(&self) -> &dyn GridSpacing<S> {
        self.spacing.as_ref()
    }

    /// 并行策略
    pub fn parallel(&self) -> ParallelPolicy {
        self.parallel
    }

    /// 以新的并行策略复制算子
    pub fn with_parallel(&self, parallel: ParallelPolicy) -> Self {
        Self {
            parallel,
            ..self.clone()
        }
    }

    /// 计算一列的导数
    fn sweep_column(
        &self,
        col: usize,
        src: &[S],
        t: f64,
        dt: S,
        dst: &mut [S],
    ) -> EtResult<()> {
        let transverse = self.reorder.transverse(col);
        let size = self.stencil.size();
        let column = BcArray::new(src, self.boundary.as_ref(), size)?;
        let mut window = vec![S::ZERO; size.window_len()];

        // 面 i+1 的速度留作下一个单元的左面
        let mut u_left = self.velocity.velocity(0, &transverse, t)?;
        for (i, out) in dst.iter_mut().enumerate() {
            let u_right = self.velocity.velocity(i + 1, &transverse, t)?;
            let dz = self.spacing.spacing(i, &transverse, t)?;
            column.window(i, &mut window);
            *out = self.stencil.derivative(&window, [u_left, u_right], dt, dz);
            u_left = u_right;
        }
        Ok(())
    }

    /// 列矩阵形式的导数
    pub fn derivative_columns(&self, columns: &ColumnMatrix<S>, t: f64, dt: f64) -> EtResult<ColumnMatrix<S>> {
        let n_rows = self.reorder.n_rows();
        let n_cols = self.reorder.n_cols();
        EtError::check_shape(
            "column_matrix",
            &[n_rows, n_cols],
            &[columns.n_rows(), columns.n_cols()],
        )?;

        let dt_s = S::from_config(dt);
        let mut out = ColumnMatrix::zeros(n_rows, n_cols);
        if self.parallel.should_parallelize(n_cols) {
            out.as_mut_slice()
                .par_chunks_mut(n_rows)
                .enumerate()
                .try_for_each(|(col, dst)| self.sweep_column(col, columns.column(col), t, dt_s, dst))?;
        } else {
            out.as_mut_slice()
                .chunks_mut(n_rows)
                .enumerate()
                .try_for_each(|(col, dst)| self.sweep_column(col, columns.column(col), t, dt_s, dst))?;
        }
        Ok(out)
    }

    /// 本轴对 `dϕ/dt` 的贡献
    ///
    /// `dt` 只用于 L94/PPM 的 Courant 数，迎风格式忽略它。
    pub fn derivative(&self, field: &ArrayD<S>, t: f64, dt: f64) -> EtResult<ArrayD<S>> {
        let columns = self.reorder.forward(field.view())?;
        let deriv = self.derivative_columns(&columns, t, dt)?;
        self.reorder.inverse(&deriv)
    }

    /// `out += scale * dϕ/dt`
    pub fn accumulate(
        &self,
        field: &ArrayD<S>,
        t: f64,
        dt: f64,
        scale: S,
        out: &mut ArrayD<S>,
    ) -> EtResult<()> {
        EtError::check_shape("output", self.reorder.shape(), out.shape())?;
        let columns = self.reorder.forward(field.view())?;
        let deriv = self.derivative_columns(&columns, t, dt)?;
        self.reorder.add_scaled_into(&deriv, scale, out)
    }

    /// 前向欧拉原地更新 `ϕ += Δt · dϕ/dt`
    ///
    /// 导数先写入独立缓冲区，全部列成功后才更新场。
    pub fn apply_in_place(&self, field: &mut ArrayD<S>, t: f64, dt: f64) -> EtResult<()> {
        let columns = self.reorder.forward(field.view())?;
        let deriv = self.derivative_columns(&columns, t, dt)?;
        self.reorder.add_scaled_into(&deriv, S::from_config(dt), field)
    }
}

impl<S: RuntimeScalar> RhsComputer<S> for AxisAdvection<S> {
    fn compute_rhs(&self, state: &ArrayD<S>, t: f64, dt: f64, out: &mut ArrayD<S>) -> EtResult<()> {
        let columns = self.reorder.forward(state.view())?;
        let deriv = self.derivative_columns(&columns, t, dt)?;
        self.reorder.inverse_into(&deriv, out)
    }
}

// ============================================================
// 构建器
// ============================================================

/// 单轴算子构建器
///
/// 默认模板为带限制器的 L94，默认边界为零梯度；速度场和网格间距必须提供。
pub struct AxisAdvectionBuilder<S: RuntimeScalar> {
    reorder: AxisReorder,
    stencil: Arc<dyn Stencil<S>>,
    boundary: Arc<dyn BoundaryCondition<S>>,
    velocity: Option<Arc<dyn EdgeVelocity<S>>>,
    spacing: Option<Arc<dyn GridSpacing<S>>>,
    parallel: ParallelPolicy,
}

impl<S: RuntimeScalar> AxisAdvectionBuilder<S> {
    fn new(reorder: AxisReorder) -> Self {
        Self {
            reorder,
            stencil: Arc::new(StencilKind::l94()),
            boundary: Arc::new(BoundaryKind::<S>::ZeroGradient),
            velocity: None,
            spacing: None,
            parallel: ParallelPolicy::default(),
        }
    }

    /// 设置模板
    pub fn stencil(mut self, stencil: impl Stencil<S> + 'static) -> Self {
        self.stencil = Arc::new(stencil);
        self
    }

    /// 设置共享模板
    pub fn stencil_arc(mut self, stencil: Arc<dyn Stencil<S>>) -> Self {
        self.stencil = stencil;
        self
    }

    /// 设置边界条件
    pub fn boundary(mut self, boundary: impl BoundaryCondition<S> + 'static) -> Self {
        self.boundary = Arc::new(boundary);
        self
    }

    /// 设置面速度提供者
    pub fn velocity(mut self, velocity: impl EdgeVelocity<S> + 'static) -> Self {
        self.velocity = Some(Arc::new(velocity));
        self
    }

    /// 设置共享面速度提供者
    pub fn velocity_arc(mut self, velocity: Arc<dyn EdgeVelocity<S>>) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// 设置网格间距提供者
    pub fn spacing(mut self, spacing: impl GridSpacing<S> + 'static) -> Self {
        self.spacing = Some(Arc::new(spacing));
        self
    }

    /// 设置共享网格间距提供者
    pub fn spacing_arc(mut self, spacing: Arc<dyn GridSpacing<S>>) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// 设置并行策略
    pub fn parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    /// 构建并校验模板与边界组合
    pub fn build(self) -> EtResult<AxisAdvection<S>> {
        let velocity = self
            .velocity
            .ok_or_else(|| EtError::config("缺少面速度提供者"))?;
        let spacing = self
            .spacing
            .ok_or_else(|| EtError::config("缺少网格间距提供者"))?;

        let size = self.stencil.size();
        self.boundary.validate(self.reorder.n_rows(), size)?;

        debug!(
            axis = self.reorder.axis(),
            stencil = self.stencil.name(),
            boundary = self.boundary.name(),
            n_rows = self.reorder.n_rows(),
            n_cols = self.reorder.n_cols(),
            "构建单轴对流算子"
        );

        Ok(AxisAdvection {
            reorder: self.reorder,
            stencil: self.stencil,
            boundary: self.boundary,
            velocity,
            spacing,
            parallel: self.parallel,
        })
    }
}
