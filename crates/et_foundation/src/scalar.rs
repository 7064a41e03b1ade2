// crates/et_foundation/src/scalar.rs

//! RuntimeScalar - 密封的标量类型抽象
//!
//! 场数据的数值类型固定为 f32 或 f64。模板核心、边界包装器和对流算子
//! 都以 `S: RuntimeScalar` 为泛型边界，编译期单态化。
//!
//! # 使用规范
//!
//! ```rust
//! use et_foundation::RuntimeScalar;
//!
//! fn upwind_face<S: RuntimeScalar>(u: S, left: S, right: S) -> S {
//!     if u >= S::ZERO { left } else { right }
//! }
//!
//! assert_eq!(upwind_face(1.0f32, 2.0, 3.0), 2.0);
//! ```
//!
//! 配置层全部使用 f64，进入计算层时通过 [`RuntimeScalar::from_config`] 转换。

use std::fmt::{Debug, Display};
use std::iter::Sum;

use bytemuck::Pod;
use num_traits::{Float, FromPrimitive, NumAssign};

/// 密封模块，禁止外部实现
mod private {
    /// 密封 trait
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// 运行时标量类型（密封，仅 f32/f64 可实现）
///
/// - `f32`: 内存占用减半，适合大规模三维场
/// - `f64`: 默认精度，守恒性验证使用
pub trait RuntimeScalar:
    private::Sealed
    + Pod
    + Float
    + FromPrimitive
    + NumAssign
    + Debug
    + Display
    + Send
    + Sync
    + Sum
    + Default
    + 'static
{
    /// 零值
    const ZERO: Self;
    /// 一
    const ONE: Self;
    /// 二
    const TWO: Self;
    /// 二分之一
    const HALF: Self;

    /// 类型名称
    const NAME: &'static str;

    /// 从配置层 f64 转换（f32 下按 IEEE 舍入）
    fn from_config(value: f64) -> Self;

    /// 转换回 f64（用于日志与诊断）
    fn to_config(self) -> f64;

    /// 符号函数，零返回零
    #[inline]
    fn sign(self) -> Self {
        if self > Self::ZERO {
            Self::ONE
        } else if self < Self::ZERO {
            -Self::ONE
        } else {
            Self::ZERO
        }
    }
}

// =============================================================================
// f32 实现
// =============================================================================

impl RuntimeScalar for f32 {
    const ZERO: f32 = 0.0;
    const ONE: f32 = 1.0;
    const TWO: f32 = 2.0;
    const HALF: f32 = 0.5;
    const NAME: &'static str = "f32";

    #[inline]
    fn from_config(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_config(self) -> f64 {
        self as f64
    }
}

// =============================================================================
// f64 实现
// =============================================================================

impl RuntimeScalar for f64 {
    const ZERO: f64 = 0.0;
    const ONE: f64 = 1.0;
    const TWO: f64 = 2.0;
    const HALF: f64 = 0.5;
    const NAME: &'static str = "f64";

    #[inline]
    fn from_config(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_config(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_constants() {
        assert_eq!(<f32 as RuntimeScalar>::ZERO, 0.0f32);
        assert_eq!(<f32 as RuntimeScalar>::HALF, 0.5f32);
        assert_eq!(<f32 as RuntimeScalar>::NAME, "f32");
    }

    #[test]
    fn test_f64_constants() {
        assert_eq!(<f64 as RuntimeScalar>::ONE, 1.0f64);
        assert_eq!(<f64 as RuntimeScalar>::TWO, 2.0f64);
        assert_eq!(<f64 as RuntimeScalar>::NAME, "f64");
    }

    #[test]
    fn test_from_config() {
        assert_eq!(f32::from_config(9.81), 9.81f32);
        assert_eq!(f64::from_config(9.81), 9.81f64);
        assert_eq!(0.25f32.to_config(), 0.25f64);
    }

    #[test]
    fn test_sign() {
        assert_eq!(RuntimeScalar::sign(3.0f64), 1.0);
        assert_eq!(RuntimeScalar::sign(-0.5f32), -1.0);
        assert_eq!(RuntimeScalar::sign(0.0f64), 0.0);
    }
}
