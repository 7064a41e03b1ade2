// crates/et_transport/src/stencil/mod.rs

//! # 一维对流模板模块
//!
//! 提供有限体积通量形式的一维对流模板：
//!
//! - `Upwind1` - 一阶迎风，窗口 (1, 1)
//! - `Upwind2` - 二阶线性迎风 (LUD)，窗口 (2, 2)
//! - `L94` - Lin et al. (1994) 分段线性，窗口 (2, 2)
//! - `Ppm` - Colella & Woodward (1984) 分段抛物，窗口 (3, 4)
//!
//! ## 约定
//!
//! 模板接收以中心单元 `i` 为中心、长度 `left + right + 1` 的窗口，
//! 中心位于下标 `left`；`u = [U(i-1/2), U(i+1/2)]` 为两侧面速度。
//! 返回值为 `dϕ/dt = -(F(i+1/2) - F(i-1/2)) / Δz`。
//!
//! 所有格式在网格单位下计算：`σ = U / Δz`，Courant 数 `c = σ Δt`。
//! 供体单元由 `σ` 的符号决定，因此 Δz < 0 的网格与速度取反后的
//! 正向网格给出完全相同的结果。
//!
//! 每个面通量只依赖相邻两个窗口共有的数据，在均匀网格上
//! 相邻单元对同一面的通量逐位相同，保证离散守恒。
//!
//! 模板只拿到中心单元的 Δz。非均匀网格上 `Upwind1`/`Upwind2` 的面值
//! 与 Δz 无关，`Σϕ·Δz` 仍守恒；`L94` 与 `Ppm` 的 Courant 加权依赖中心
//! 单元的 Δz，两侧单元对同一面给出不同通量，`Σϕ·Δz` 不守恒
//! （相对漂移约 1e-4 量级）。
//!
//! ## 使用方式
//!
//! ```
//! use et_transport::stencil::{Stencil, StencilKind, stencil_size};
//!
//! let kind = StencilKind::upwind1();
//! assert_eq!(stencil_size(kind).as_tuple(), (1, 1));
//!
//! // 单位脉冲、U = 1、Δz = 1：中心单元以速率 1 流出
//! let dphi = Stencil::<f64>::derivative(&kind, &[0.0, 1.0, 0.0], [1.0, 1.0], 0.1, 1.0);
//! assert_eq!(dphi, -1.0);
//! ```
//!
//! ## 格式选择指南
//!
//! | 格式 | 精度 | 单调 | 依赖 Δt |
//! |------|------|------|---------|
//! | upwind1 | 一阶 | 是 | 否 |
//! | upwind2 | 二阶 | 否 | 否 |
//! | l94 | 二阶 | 是（限制器开启时） | 是 |
//! | ppm | 三阶 | 是（限制器开启时） | 是 |

mod l94;
mod ppm;
mod upwind;

pub use l94::L94;
pub use ppm::Ppm;
pub use upwind::{Upwind1, Upwind2};

use et_config::{SchemeConfig, StencilChoice};
use et_foundation::RuntimeScalar;
use serde::{Deserialize, Serialize};

/// 模板左右半宽
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StencilSize {
    /// 中心左侧单元数
    pub left: usize,
    /// 中心右侧单元数
    pub right: usize,
}

impl StencilSize {
    /// 创建半宽
    pub const fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// 窗口长度 `left + right + 1`
    #[inline]
    pub const fn window_len(&self) -> usize {
        self.left + self.right + 1
    }

    /// 中心单元在窗口中的下标
    #[inline]
    pub const fn center(&self) -> usize {
        self.left
    }

    /// 转为元组
    pub const fn as_tuple(&self) -> (usize, usize) {
        (self.left, self.right)
    }
}

/// 一维对流模板 trait
///
/// 实现必须是纯函数：同样的输入给出同样的输出，不持有可变状态。
/// 窗口越界由调用方通过边界条件填充避免，本 trait 不做检查。
pub trait Stencil<S: RuntimeScalar>: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 窗口半宽
    fn size(&self) -> StencilSize;

    /// 计算中心单元的时间导数
    ///
    /// # 参数
    /// - `phi`: 长度为 `size().window_len()` 的窗口
    /// - `u`: 中心单元左右两个面的速度
    /// - `dt`: 时间步长（迎风格式不使用）
    /// - `dz`: 中心单元网格间距，可为负
    fn derivative(&self, phi: &[S], u: [S; 2], dt: S, dz: S) -> S;
}

/// 模板格式枚举（闭合分发）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilKind {
    /// 一阶迎风
    Upwind1(Upwind1),
    /// 二阶线性迎风
    Upwind2(Upwind2),
    /// Lin et al. (1994)
    L94(L94),
    /// 分段抛物方法
    Ppm(Ppm),
}

impl StencilKind {
    /// 一阶迎风
    pub const fn upwind1() -> Self {
        Self::Upwind1(Upwind1)
    }

    /// 二阶线性迎风
    pub const fn upwind2() -> Self {
        Self::Upwind2(Upwind2)
    }

    /// 带单调限制器的 L94
    pub const fn l94() -> Self {
        Self::L94(L94::new())
    }

    /// 带单调约束的 PPM
    pub const fn ppm() -> Self {
        Self::Ppm(Ppm::new())
    }

    /// 从配置构建
    pub fn from_config(config: &SchemeConfig) -> Self {
        match config.stencil {
            StencilChoice::Upwind1 => Self::upwind1(),
            StencilChoice::Upwind2 => Self::upwind2(),
            StencilChoice::L94 => Self::L94(L94 {
                monotonic: config.monotonic,
            }),
            StencilChoice::Ppm => Self::Ppm(Ppm {
                monotonic: config.monotonic,
            }),
        }
    }

    /// 对应的配置选项
    pub fn choice(&self) -> StencilChoice {
        match self {
            Self::Upwind1(_) => StencilChoice::Upwind1,
            Self::Upwind2(_) => StencilChoice::Upwind2,
            Self::L94(_) => StencilChoice::L94,
            Self::Ppm(_) => StencilChoice::Ppm,
        }
    }

    /// 窗口半宽（与精度无关）
    pub const fn window(&self) -> StencilSize {
        match self {
            Self::Upwind1(_) => Upwind1::SIZE,
            Self::Upwind2(_) => Upwind2::SIZE,
            Self::L94(_) => L94::SIZE,
            Self::Ppm(_) => Ppm::SIZE,
        }
    }

    /// 结果是否依赖时间步长
    pub fn uses_dt(&self) -> bool {
        matches!(self, Self::L94(_) | Self::Ppm(_))
    }
}

impl From<StencilChoice> for StencilKind {
    fn from(choice: StencilChoice) -> Self {
        Self::from_config(&SchemeConfig {
            stencil: choice,
            ..Default::default()
        })
    }
}

impl<S: RuntimeScalar> Stencil<S> for StencilKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Upwind1(s) => Stencil::<S>::name(s),
            Self::Upwind2(s) => Stencil::<S>::name(s),
            Self::L94(s) => Stencil::<S>::name(s),
            Self::Ppm(s) => Stencil::<S>::name(s),
        }
    }

    fn size(&self) -> StencilSize {
        self.window()
    }

    #[inline]
    fn derivative(&self, phi: &[S], u: [S; 2], dt: S, dz: S) -> S {
        match self {
            Self::Upwind1(s) => s.derivative(phi, u, dt, dz),
            Self::Upwind2(s) => s.derivative(phi, u, dt, dz),
            Self::L94(s) => s.derivative(phi, u, dt, dz),
            Self::Ppm(s) => s.derivative(phi, u, dt, dz),
        }
    }
}

/// 模板左右半宽
pub fn stencil_size(kind: StencilKind) -> StencilSize {
    kind.window()
}

/// 网格单位下的面速度 `σ = U / Δz`
#[inline]
pub(crate) fn index_rate<S: RuntimeScalar>(u: S, dz: S) -> S {
    u / dz
}

/// 三值最小
#[inline]
pub(crate) fn min3<S: RuntimeScalar>(a: S, b: S, c: S) -> S {
    a.min(b).min(c)
}

/// 三值最大
#[inline]
pub(crate) fn max3<S: RuntimeScalar>(a: S, b: S, c: S) -> S {
    a.max(b).max(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stencil_sizes() {
        assert_eq!(stencil_size(StencilKind::upwind1()).as_tuple(), (1, 1));
        assert_eq!(stencil_size(StencilKind::upwind2()).as_tuple(), (2, 2));
        assert_eq!(stencil_size(StencilKind::l94()).as_tuple(), (2, 2));
        assert_eq!(stencil_size(StencilKind::ppm()).as_tuple(), (3, 4));
    }

    #[test]
    fn test_window_len_and_center() {
        let size = StencilKind::ppm().window();
        assert_eq!(size.window_len(), 8);
        assert_eq!(size.center(), 3);
    }

    #[test]
    fn test_from_config_keeps_monotonic_flag() {
        let config = SchemeConfig {
            stencil: StencilChoice::Ppm,
            monotonic: false,
        };
        assert_eq!(StencilKind::from_config(&config), StencilKind::Ppm(Ppm { monotonic: false }));
        assert_eq!(StencilKind::from_config(&config).choice(), StencilChoice::Ppm);
    }

    #[test]
    fn test_names() {
        assert_eq!(Stencil::<f64>::name(&StencilKind::l94()), "l94");
        assert_eq!(Stencil::<f32>::name(&StencilKind::upwind2()), "upwind2");
    }

    #[test]
    fn test_uses_dt() {
        assert!(!StencilKind::upwind1().uses_dt());
        assert!(StencilKind::l94().uses_dt());
    }
}
