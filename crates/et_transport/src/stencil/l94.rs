// crates/et_transport/src/stencil/l94.rs

//! L94 分段线性格式 (Lin et al., 1994)
//!
//! 在供体单元内重构线性子网格分布，沿上游方向在被扫过的
//! `|c|` 区域内精确积分得到面通量：
//!
//! ```text
//! c > 0:  F = σ (ϕ_i     + (1 - c) Δϕ_i     / 2)
//! c < 0:  F = σ (ϕ_{i+1} - (1 + c) Δϕ_{i+1} / 2)
//! ```
//!
//! 单调限制（Lin et al. 1994, 式 (5)）：
//!
//! ```text
//! Δϕ_i = sign(δ) · min(|δ|, 2(ϕ_i - min(ϕ_{i-1}, ϕ_i, ϕ_{i+1})), 2(max(...) - ϕ_i))
//! δ    = (ϕ_{i+1} - ϕ_{i-1}) / 2
//! ```
//!
//! 限制后重构值位于相邻单元的极值之间，通量不会超过供体单元质量。
//!
//! 参考文献：Lin, S.-J., Chao, W. C., Sud, Y. C., & Walker, G. K. (1994).
//! A class of the van Leer-type transport schemes and its application to the
//! moisture transport in a general circulation model. Monthly Weather Review,
//! 122(7), 1575-1593.

use et_foundation::RuntimeScalar;

use super::{index_rate, max3, min3, Stencil, StencilSize};

/// L94 格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L94 {
    /// 是否启用单调斜率限制
    pub monotonic: bool,
}

impl L94 {
    /// 窗口半宽
    pub const SIZE: StencilSize = StencilSize::new(2, 2);

    /// 默认启用单调限制
    pub const fn new() -> Self {
        Self { monotonic: true }
    }

    /// 单元平均斜率
    #[inline]
    fn slope<S: RuntimeScalar>(&self, left: S, center: S, right: S) -> S {
        let delta = S::HALF * (right - left);
        if !self.monotonic {
            return delta;
        }
        let lower = S::TWO * (center - min3(left, center, right));
        let upper = S::TWO * (max3(left, center, right) - center);
        RuntimeScalar::sign(delta) * delta.abs().min(lower).min(upper)
    }

    /// 面通量（网格单位）
    ///
    /// `p = [ϕ(j-1), ϕ(j), ϕ(j+1), ϕ(j+2)]`，面位于 `j+1/2`。
    #[inline]
    fn edge_flux<S: RuntimeScalar>(&self, sigma: S, dt: S, p: &[S]) -> S {
        let courant = sigma * dt;
        if sigma >= S::ZERO {
            let slope = self.slope(p[0], p[1], p[2]);
            sigma * (p[1] + S::HALF * (S::ONE - courant) * slope)
        } else {
            let slope = self.slope(p[1], p[2], p[3]);
            sigma * (p[2] - S::HALF * (S::ONE + courant) * slope)
        }
    }
}

impl Default for L94 {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RuntimeScalar> Stencil<S> for L94 {
    fn name(&self) -> &'static str {
        "l94"
    }

    fn size(&self) -> StencilSize {
        Self::SIZE
    }

    #[inline]
    fn derivative(&self, phi: &[S], u: [S; 2], dt: S, dz: S) -> S {
        debug_assert_eq!(phi.len(), 5);
        let f_left = self.edge_flux(index_rate(u[0], dz), dt, &phi[0..4]);
        let f_right = self.edge_flux(index_rate(u[1], dz), dt, &phi[1..5]);
        -(f_right - f_left)
    }
}
