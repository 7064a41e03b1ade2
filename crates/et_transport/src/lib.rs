// crates/et_transport/src/lib.rs

//! EnvTransport 对流计算层 (Layer 3)
//!
//! 提供有限体积一维对流模板及其在任意阶张量上的组合：
//! - 模板格式 (stencil) - upwind1、upwind2、L94、PPM
//! - 边界条件 (boundary) - 幽灵单元包装
//! - 轴重排 (reorder) - 张量与一维列之间的正逆变换
//! - 对流算子 (operator) - 单轴扫描与多轴组合
//! - 引擎 (engine) - 时间积分、算子分裂、Courant 诊断
//! - 烟团追踪 (puff) - 拉格朗日质点轨迹
//!
//! # 数据流
//!
//! ```text
//! Field ─forward─> ColumnMatrix ─BcArray─> window ─Stencil─> dϕ/dt ─inverse─> Field
//! ```
//!
//! # 示例
//!
//! ```
//! use et_transport::prelude::*;
//! use ndarray::{ArrayD, IxDyn};
//!
//! let mut field = ArrayD::<f64>::zeros(IxDyn(&[10]));
//! field[[5]] = 1.0;
//!
//! let op = AxisAdvection::builder(AxisReorder::new(&[10], 0).unwrap())
//!     .stencil(StencilKind::upwind1())
//!     .boundary(ZeroGradient)
//!     .velocity(ConstantVelocity(1.0))
//!     .spacing(UniformSpacing(1.0))
//!     .build()
//!     .unwrap();
//!
//! op.apply_in_place(&mut field, 0.0, 0.1).unwrap();
//! assert!((field[[5]] - 0.9).abs() < 1e-12);
//! assert!((field[[6]] - 0.1).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod engine;
pub mod operator;
pub mod puff;
pub mod reorder;
pub mod stencil;

/// 层级标识
pub const LAYER: u8 = 3;

// 重导出常用类型
pub use boundary::{BcArray, BoundaryCondition, BoundaryKind, Dirichlet, Periodic, ZeroGradient};
pub use engine::{
    courant_stats, CourantStats, RhsComputer, SourceProcess, SplitProcess, SplittingScheme,
    StrangSplitter, TimeIntegratorKind,
};
pub use operator::{
    AdvectionOperator, AdvectionOperatorBuilder, AxisAdvection, AxisAdvectionBuilder,
    ConstantVelocity, EdgeVelocity, GridSpacing, ParallelPolicy, UniformSpacing,
};
pub use puff::{CoordinateScale, Puff, PuffDomain, PuffState, PuffStatus, PuffVelocity};
pub use reorder::{AxisReorder, ColumnMatrix};
pub use stencil::{stencil_size, Ppm, Stencil, StencilKind, StencilSize, Upwind1, Upwind2, L94};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::boundary::{BoundaryCondition, BoundaryKind, Dirichlet, Periodic, ZeroGradient};
    pub use crate::engine::{SplitProcess, SplittingScheme, TimeIntegratorKind};
    pub use crate::operator::{
        AdvectionOperator, AxisAdvection, ConstantVelocity, EdgeVelocity, GridSpacing,
        UniformSpacing,
    };
    pub use crate::reorder::AxisReorder;
    pub use crate::stencil::{Stencil, StencilKind};
    pub use et_foundation::{EtError, EtResult, RuntimeScalar};
}
