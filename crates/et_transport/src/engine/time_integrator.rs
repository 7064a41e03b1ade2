// crates/et_transport/src/engine/time_integrator.rs

//! SSP Runge-Kutta 时间积分器
//!
//! 以 Shu-Osher 凸组合形式推进 `dϕ/dt = L(ϕ)`：
//!
//! ```text
//! ForwardEuler:  ϕ^{n+1} = ϕ^n + Δt L(ϕ^n)
//!
//! SSP-RK2:       ϕ^(1)   = ϕ^n + Δt L(ϕ^n)
//!                ϕ^{n+1} = 1/2 ϕ^n + 1/2 (ϕ^(1) + Δt L(ϕ^(1)))
//!
//! SSP-RK3:       ϕ^(1)   = ϕ^n + Δt L(ϕ^n)
//!                ϕ^(2)   = 3/4 ϕ^n + 1/4 (ϕ^(1) + Δt L(ϕ^(1)))
//!                ϕ^{n+1} = 1/3 ϕ^n + 2/3 (ϕ^(2) + Δt L(ϕ^(2)))
//! ```
//!
//! 每一级都是前向欧拉步的凸组合，空间格式的单调性和守恒性得以保持。
//! 中间级写入临时数组，只有全部成功后才覆盖输入场。
//!
//! ## 参考文献
//!
//! 1. Gottlieb, S., Shu, C.-W., & Tadmor, E. (2001). Strong stability-preserving
//!    high-order time discretization methods. SIAM Review, 43(1), 89-112.
//!
//! 2. Shu, C.-W., & Osher, S. (1988). Efficient implementation of essentially
//!    non-oscillatory shock-capturing schemes. Journal of Computational Physics,
//!    77(2), 439-471.

use et_config::IntegratorChoice;
use et_foundation::{EtResult, RuntimeScalar};
use ndarray::{ArrayD, Zip};

/// RHS 计算器 trait
///
/// 实现此 trait 的类型可以计算右端项 `dϕ/dt = L(ϕ)`。
pub trait RhsComputer<S: RuntimeScalar>: Send + Sync {
    /// 计算右端项
    ///
    /// # 参数
    /// - `state`: 当前场
    /// - `t`: 当前时间
    /// - `dt`: 所在时间步长（L94/PPM 的 Courant 数依赖于它）
    /// - `out`: 输出缓冲区，形状与 `state` 相同，调用后被完全覆盖
    fn compute_rhs(&self, state: &ArrayD<S>, t: f64, dt: f64, out: &mut ArrayD<S>) -> EtResult<()>;
}

/// 时间积分器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeIntegratorKind {
    /// 一阶前向欧拉
    ForwardEuler,
    /// 二阶 SSP-RK (Heun)
    #[default]
    SspRk2,
    /// 三阶 SSP-RK (Shu-Osher)
    SspRk3,
}

impl TimeIntegratorKind {
    /// 积分器名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::ForwardEuler => "ForwardEuler",
            Self::SspRk2 => "SSP-RK2",
            Self::SspRk3 => "SSP-RK3",
        }
    }

    /// 时间精度阶数
    pub fn order(&self) -> u8 {
        match self {
            Self::ForwardEuler => 1,
            Self::SspRk2 => 2,
            Self::SspRk3 => 3,
        }
    }

    /// 推进一个时间步
    pub fn advance<S, R>(&self, state: &mut ArrayD<S>, t: f64, dt: f64, rhs: &R) -> EtResult<()>
    where
        S: RuntimeScalar,
        R: RhsComputer<S> + ?Sized,
    {
        let h = S::from_config(dt);
        let mut k = ArrayD::<S>::zeros(state.raw_dim());

        match self {
            Self::ForwardEuler => {
                rhs.compute_rhs(state, t, dt, &mut k)?;
                axpy(state, h, &k);
            }
            Self::SspRk2 => {
                rhs.compute_rhs(state, t, dt, &mut k)?;
                let mut u1 = state.clone();
                axpy(&mut u1, h, &k);

                rhs.compute_rhs(&u1, t + dt, dt, &mut k)?;
                axpy(&mut u1, h, &k);

                blend(state, S::HALF, &u1);
            }
            Self::SspRk3 => {
                let quarter = S::from_config(0.25);
                let two_thirds = S::from_config(2.0 / 3.0);

                rhs.compute_rhs(state, t, dt, &mut k)?;
                let mut u1 = state.clone();
                axpy(&mut u1, h, &k);

                rhs.compute_rhs(&u1, t + dt, dt, &mut k)?;
                axpy(&mut u1, h, &k);
                let mut u2 = state.clone();
                blend(&mut u2, quarter, &u1);

                rhs.compute_rhs(&u2, t + 0.5 * dt, dt, &mut k)?;
                axpy(&mut u2, h, &k);
                blend(state, two_thirds, &u2);
            }
        }
        Ok(())
    }
}

impl From<IntegratorChoice> for TimeIntegratorKind {
    fn from(choice: IntegratorChoice) -> Self {
        match choice {
            IntegratorChoice::ForwardEuler => Self::ForwardEuler,
            IntegratorChoice::SspRk2 => Self::SspRk2,
            IntegratorChoice::SspRk3 => Self::SspRk3,
        }
    }
}

/// `y += a * x`
#[inline]
fn axpy<S: RuntimeScalar>(y: &mut ArrayD<S>, a: S, x: &ArrayD<S>) {
    Zip::from(y).and(x).for_each(|y, &x| *y += a * x);
}

/// `y = (1 - w) * y + w * x`
#[inline]
fn blend<S: RuntimeScalar>(y: &mut ArrayD<S>, w: S, x: &ArrayD<S>) {
    let keep = S::ONE - w;
    Zip::from(y).and(x).for_each(|y, &x| *y = keep * *y + w * x);
}
