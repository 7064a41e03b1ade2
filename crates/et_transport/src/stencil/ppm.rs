// crates/et_transport/src/stencil/ppm.rs

//! 分段抛物方法 PPM (Colella & Woodward, 1984)
//!
//! ## 重构步骤
//!
//! 1. 单元斜率（CW84 式 1.7-1.8，van Leer 限制）：
//!    `δa_j = sign(δ) min(|δ|, 2|ϕ_j - ϕ_{j-1}|, 2|ϕ_{j+1} - ϕ_j|)`，
//!    若 `ϕ_j` 为局部极值则 `δa_j = 0`
//! 2. 面值（均匀网格，式 1.6）：
//!    `a_{j+1/2} = (ϕ_j + ϕ_{j+1}) / 2 - (δa_{j+1} - δa_j) / 6`
//! 3. 单调约束（式 1.10）：极值单元退化为常数；
//!    抛物线在单元内出现过冲时调整较远一侧的面值
//! 4. 在供体单元被扫过的 `|c|` 部分积分抛物线：
//!
//! ```text
//! c > 0:  f = a_R - c/2 (Δa - (1 - 2c/3) a6)
//! c < 0:  f = a_L + y/2 (Δa + (1 - 2y/3) a6),  y = -c
//! a6 = 6 (ϕ - (a_L + a_R) / 2),  Δa = a_R - a_L
//! ```
//!
//! 每个面的通量只使用该面两侧各三个单元，中心窗口 `[i-3, i+4]`
//! 覆盖左右两个面所需的全部数据；最右侧单元不参与重构。
//!
//! 参考文献：Colella, P., & Woodward, P. R. (1984). The Piecewise Parabolic
//! Method (PPM) for gas-dynamical simulations. Journal of Computational
//! Physics, 54(1), 174-201.

use et_foundation::RuntimeScalar;

use super::{index_rate, Stencil, StencilSize};

/// PPM 格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ppm {
    /// 是否启用斜率限制和单调约束
    pub monotonic: bool,
}

/// 单元内抛物线
#[derive(Debug, Clone, Copy)]
struct Parabola<S> {
    left: S,
    right: S,
    a6: S,
}

impl<S: RuntimeScalar> Parabola<S> {
    #[inline]
    fn delta(&self) -> S {
        self.right - self.left
    }

    /// 右侧 `x` 比例区间的平均值
    #[inline]
    fn right_average(&self, x: S) -> S {
        let two_thirds = S::TWO / S::from_config(3.0);
        self.right - S::HALF * x * (self.delta() - (S::ONE - two_thirds * x) * self.a6)
    }

    /// 左侧 `y` 比例区间的平均值
    #[inline]
    fn left_average(&self, y: S) -> S {
        let two_thirds = S::TWO / S::from_config(3.0);
        self.left + S::HALF * y * (self.delta() + (S::ONE - two_thirds * y) * self.a6)
    }
}

impl Ppm {
    /// 窗口半宽
    pub const SIZE: StencilSize = StencilSize::new(3, 4);

    /// 默认启用单调约束
    pub const fn new() -> Self {
        Self { monotonic: true }
    }

    /// 单元斜率 δa_j
    #[inline]
    fn slope<S: RuntimeScalar>(&self, left: S, center: S, right: S) -> S {
        let delta = S::HALF * (right - left);
        if !self.monotonic {
            return delta;
        }
        let dl = center - left;
        let dr = right - center;
        if dl * dr > S::ZERO {
            let bound = (S::TWO * dl.abs()).min(S::TWO * dr.abs());
            RuntimeScalar::sign(delta) * delta.abs().min(bound)
        } else {
            S::ZERO
        }
    }

    /// 面值 a_{j+1/2}
    ///
    /// `p = [ϕ(j-1), ϕ(j), ϕ(j+1), ϕ(j+2)]`
    #[inline]
    fn edge_value<S: RuntimeScalar>(&self, p: &[S]) -> S {
        let six = S::from_config(6.0);
        let da_j = self.slope(p[0], p[1], p[2]);
        let da_j1 = self.slope(p[1], p[2], p[3]);
        S::HALF * (p[1] + p[2]) - (da_j1 - da_j) / six
    }

    /// 构建单元抛物线并施加单调约束
    #[inline]
    fn parabola<S: RuntimeScalar>(&self, mean: S, mut left: S, mut right: S) -> Parabola<S> {
        let six = S::from_config(6.0);
        let three = S::from_config(3.0);
        if self.monotonic {
            if (right - mean) * (mean - left) <= S::ZERO {
                left = mean;
                right = mean;
            } else {
                let da = right - left;
                let m = mean - S::HALF * (left + right);
                if da * m > da * da / six {
                    left = three * mean - S::TWO * right;
                } else if -(da * da) / six > da * m {
                    right = three * mean - S::TWO * left;
                }
            }
        }
        Parabola {
            left,
            right,
            a6: six * (mean - S::HALF * (left + right)),
        }
    }

    /// 面通量（网格单位）
    ///
    /// `p = [ϕ(j-2), ..., ϕ(j+3)]`，面位于 `j+1/2`。
    #[inline]
    fn edge_flux<S: RuntimeScalar>(&self, sigma: S, dt: S, p: &[S]) -> S {
        let courant = sigma * dt;
        let a_mid = self.edge_value(&p[1..5]);
        if sigma >= S::ZERO {
            let a_left = self.edge_value(&p[0..4]);
            let donor = self.parabola(p[2], a_left, a_mid);
            sigma * donor.right_average(courant)
        } else {
            let a_right = self.edge_value(&p[2..6]);
            let donor = self.parabola(p[3], a_mid, a_right);
            sigma * donor.left_average(-courant)
        }
    }
}

impl Default for Ppm {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RuntimeScalar> Stencil<S> for Ppm {
    fn name(&self) -> &'static str {
        "ppm"
    }

    fn size(&self) -> StencilSize {
        Self::SIZE
    }

    #[inline]
    fn derivative(&self, phi: &[S], u: [S; 2], dt: S, dz: S) -> S {
        debug_assert_eq!(phi.len(), 8);
        let f_left = self.edge_flux(index_rate(u[0], dz), dt, &phi[0..6]);
        let f_right = self.edge_flux(index_rate(u[1], dz), dt, &phi[1..7]);
        -(f_right - f_left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_edge_value_unlimited_fourth_order() {
        let ppm = Ppm { monotonic: false };
        let p = [1.0, 2.0, 4.0, 8.0];
        let expected = 7.0 / 12.0 * (2.0 + 4.0) - 1.0 / 12.0 * (1.0 + 8.0);
        assert!(approx_eq(ppm.edge_value(&p), expected));
    }

    #[test]
    fn test_constant_field_has_zero_derivative() {
        let ppm = Ppm::new();
        let phi = [3.0; 8];
        let d = ppm.derivative(&phi, [0.7, 0.7], 0.5, 1.0);
        assert!(approx_eq(d, 0.0));
    }

    #[test]
    fn test_extremum_cell_is_flattened() {
        let ppm = Ppm::new();
        let parabola = ppm.parabola(5.0, 1.0, 2.0);
        assert_eq!(parabola.left, 5.0);
        assert_eq!(parabola.right, 5.0);
        assert_eq!(parabola.a6, 0.0);
    }

    #[test]
    fn test_overshoot_adjusts_far_edge() {
        // 单元均值接近右面值：左面值被调整为 3ϕ - 2a_R
        let ppm = Ppm::new();
        let parabola = ppm.parabola(1.9, 1.0, 2.0);
        assert!(approx_eq(parabola.left, 3.0 * 1.9 - 4.0));
        assert_eq!(parabola.right, 2.0);
    }

    #[test]
    fn test_full_courant_averages_donor() {
        // c = 1 时抛物线在整个单元上的平均等于单元均值
        let ppm = Ppm::new();
        let parabola = ppm.parabola(1.5, 1.0, 2.0);
        assert!(approx_eq(parabola.right_average(1.0), 1.5));
        assert!(approx_eq(parabola.left_average(1.0), 1.5));
    }

    #[test]
    fn test_linear_field_exact_flux() {
        // 线性场在内部无限制触发，面值精确
        let ppm = Ppm::new();
        let phi = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let d = ppm.derivative(&phi, [1.0, 1.0], 0.0, 1.0);
        // c = 0：F_l = a(2.5) = 2.5, F_r = 3.5
        assert!(approx_eq(d, -1.0));
    }
}
