// crates/et_transport/src/stencil/upwind.rs

//! 迎风格式
//!
//! - [`Upwind1`]: 一阶迎风，面值取供体单元值
//! - [`Upwind2`]: 线性迎风 (LUD)，面值由两个上游单元二阶外推
//!
//! 两者都不使用 Δt，保留参数以统一模板签名。

use et_foundation::RuntimeScalar;

use super::{index_rate, Stencil, StencilSize};

/// 一阶迎风格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Upwind1;

impl Upwind1 {
    /// 窗口半宽
    pub const SIZE: StencilSize = StencilSize::new(1, 1);
}

/// 一阶迎风面通量（网格单位）
#[inline]
fn upwind1_flux<S: RuntimeScalar>(sigma: S, left: S, right: S) -> S {
    if sigma >= S::ZERO {
        sigma * left
    } else {
        sigma * right
    }
}

impl<S: RuntimeScalar> Stencil<S> for Upwind1 {
    fn name(&self) -> &'static str {
        "upwind1"
    }

    fn size(&self) -> StencilSize {
        Self::SIZE
    }

    #[inline]
    fn derivative(&self, phi: &[S], u: [S; 2], _dt: S, dz: S) -> S {
        debug_assert_eq!(phi.len(), 3);
        let f_left = upwind1_flux(index_rate(u[0], dz), phi[0], phi[1]);
        let f_right = upwind1_flux(index_rate(u[1], dz), phi[1], phi[2]);
        -(f_right - f_left)
    }
}

/// 二阶线性迎风格式 (Linear-Upwind Differencing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Upwind2;

impl Upwind2 {
    /// 窗口半宽
    pub const SIZE: StencilSize = StencilSize::new(2, 2);
}

/// LUD 面通量
///
/// `p = [ϕ(j-1), ϕ(j), ϕ(j+1), ϕ(j+2)]`，面位于 `j+1/2`。
#[inline]
fn upwind2_flux<S: RuntimeScalar>(sigma: S, p: &[S]) -> S {
    let three_halves = S::from_config(1.5);
    if sigma >= S::ZERO {
        sigma * (three_halves * p[1] - S::HALF * p[0])
    } else {
        sigma * (three_halves * p[2] - S::HALF * p[3])
    }
}

impl<S: RuntimeScalar> Stencil<S> for Upwind2 {
    fn name(&self) -> &'static str {
        "upwind2"
    }

    fn size(&self) -> StencilSize {
        Self::SIZE
    }

    #[inline]
    fn derivative(&self, phi: &[S], u: [S; 2], _dt: S, dz: S) -> S {
        debug_assert_eq!(phi.len(), 5);
        let f_left = upwind2_flux(index_rate(u[0], dz), &phi[0..4]);
        let f_right = upwind2_flux(index_rate(u[1], dz), &phi[1..5]);
        -(f_right - f_left)
    }
}
