// crates/et_config/src/lib.rs

//! EnvTransport Config Layer (Layer 2)
//!
//! 配置层，提供精度选择和对流算子配置。本层完全无泛型，
//! 所有数值以 f64 表示，由计算层在构建时转换。
//!
//! # 模块概览
//!
//! - [`precision`]: Precision 枚举（F32/F64）
//! - [`transport_config`]: TransportConfig 及各子配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: et_cli        ─> TransportConfig, Precision
//! Layer 3: et_transport  ─> 将 *Choice 转换为模板/边界/积分器
//! Layer 2: et_config     ─> 本层
//! Layer 1: et_foundation ─> EtError, RuntimeScalar
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod precision;
pub mod transport_config;

/// 层级标识
pub const LAYER: u8 = 2;

pub use error::ConfigError;
pub use precision::Precision;
pub use transport_config::{
    BoundaryChoice, GridConfig, IntegratorChoice, ParallelConfig, SchemeConfig, SplittingChoice,
    StencilChoice, TimeConfig, TransportConfig,
};
