// crates/et_transport/src/boundary/mod.rs

//! 边界条件模块
//!
//! 为一维列提供幽灵单元，使模板窗口在边界附近也能完整取值：
//!
//! - [`ZeroGradient`]: 幽灵值取最近的内部单元
//! - [`Periodic`]: 幽灵值按列长度循环取值
//! - [`Dirichlet`]: 幽灵值为固定常数
//!
//! [`BcArray`] 包装内部数据切片，不复制内部值；
//! 下标范围为 `[-left, n + right)`。
//!
//! 新增边界类型只需实现 [`BoundaryCondition`]，模板无需任何修改。

mod bc_array;
mod kinds;

pub use bc_array::BcArray;
pub use kinds::{BoundaryKind, Dirichlet, Periodic, ZeroGradient};

use et_foundation::{EtResult, RuntimeScalar};

use crate::stencil::StencilSize;

/// 边界条件 trait
pub trait BoundaryCondition<S: RuntimeScalar>: Send + Sync {
    /// 边界条件名称
    fn name(&self) -> &'static str;

    /// 检查列长度与模板半宽组合是否可用
    ///
    /// 在算子构建时调用一次，运行期不再检查。
    fn validate(&self, len: usize, size: StencilSize) -> EtResult<()>;

    /// 幽灵单元值
    ///
    /// `index < 0` 为左侧幽灵，`index >= interior.len()` 为右侧幽灵。
    fn ghost(&self, interior: &[S], index: isize) -> S;
}
