// crates/et_foundation/src/lib.rs

//! EnvTransport Foundation Layer (Layer 1)
//!
//! 基础层，提供整个项目共享的最小抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `EtError` / `EtResult`
//! - [`scalar`]: 密封的标量 trait `RuntimeScalar`（仅 f32/f64）
//!
//! # 示例
//!
//! ```
//! use et_foundation::{EtError, EtResult, RuntimeScalar};
//!
//! fn courant<S: RuntimeScalar>(u: S, dt: S, dx: S) -> EtResult<S> {
//!     if dx == S::ZERO {
//!         return Err(EtError::invalid_input("网格间距不能为零"));
//!     }
//!     Ok(u * dt / dx)
//! }
//!
//! assert_eq!(courant(1.0f64, 0.1, 1.0).unwrap(), 0.1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod scalar;

/// 层级标识
pub const LAYER: u8 = 1;

pub use error::{EtError, EtResult};
pub use scalar::RuntimeScalar;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{EtError, EtResult};
    pub use crate::scalar::RuntimeScalar;
    pub use crate::ensure;
}
