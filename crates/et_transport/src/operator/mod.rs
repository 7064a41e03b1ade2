// crates/et_transport/src/operator/mod.rs

//! 对流算子组合层
//!
//! 两阶段构建：
//!
//! 1. [`AxisReorder::new`](crate::reorder::AxisReorder::new) 给出列索引映射
//! 2. [`AxisAdvection::builder`] 绑定模板、边界、速度场与网格间距，
//!    构建时校验模板与边界组合
//!
//! 多个单轴算子由 [`AdvectionOperator`] 组合，支持同时求导与顺序分裂。

mod advection;
mod axis;
mod provider;

pub use advection::{AdvectionOperator, AdvectionOperatorBuilder};
pub use axis::{AxisAdvection, AxisAdvectionBuilder, ParallelPolicy};
pub use provider::{ConstantVelocity, EdgeVelocity, GridSpacing, UniformSpacing};
