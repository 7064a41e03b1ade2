// crates/et_transport/src/boundary/kinds.rs

//! 边界条件实现

use et_config::BoundaryChoice;
use et_foundation::{EtError, EtResult, RuntimeScalar};

use super::BoundaryCondition;
use crate::stencil::StencilSize;

/// 空列检查，所有边界共用
fn check_non_empty(name: &'static str, len: usize, size: StencilSize) -> EtResult<()> {
    if len == 0 {
        return Err(EtError::unsupported_boundary(
            name,
            len,
            size.left,
            size.right,
            "列长度为零",
        ));
    }
    Ok(())
}

/// 零梯度边界
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZeroGradient;

impl<S: RuntimeScalar> BoundaryCondition<S> for ZeroGradient {
    fn name(&self) -> &'static str {
        "zero_gradient"
    }

    fn validate(&self, len: usize, size: StencilSize) -> EtResult<()> {
        check_non_empty("zero_gradient", len, size)
    }

    #[inline]
    fn ghost(&self, interior: &[S], index: isize) -> S {
        if index < 0 {
            interior[0]
        } else {
            interior[interior.len() - 1]
        }
    }
}

/// 周期边界
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Periodic;

impl<S: RuntimeScalar> BoundaryCondition<S> for Periodic {
    fn name(&self) -> &'static str {
        "periodic"
    }

    fn validate(&self, len: usize, size: StencilSize) -> EtResult<()> {
        // 幽灵单元按 rem_euclid 取模，任意非空列都可绕回
        check_non_empty("periodic", len, size)
    }

    #[inline]
    fn ghost(&self, interior: &[S], index: isize) -> S {
        let n = interior.len() as isize;
        interior[index.rem_euclid(n) as usize]
    }
}

/// 固定值边界
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dirichlet<S> {
    /// 幽灵单元值
    pub value: S,
}

impl<S: RuntimeScalar> Dirichlet<S> {
    /// 创建固定值边界
    pub fn new(value: S) -> Self {
        Self { value }
    }
}

impl<S: RuntimeScalar> BoundaryCondition<S> for Dirichlet<S> {
    fn name(&self) -> &'static str {
        "dirichlet"
    }

    fn validate(&self, len: usize, size: StencilSize) -> EtResult<()> {
        check_non_empty("dirichlet", len, size)
    }

    #[inline]
    fn ghost(&self, _interior: &[S], _index: isize) -> S {
        self.value
    }
}

/// 边界条件枚举（闭合分发）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryKind<S> {
    /// 零梯度
    ZeroGradient,
    /// 周期
    Periodic,
    /// 固定值
    Dirichlet(S),
}

impl<S: RuntimeScalar> BoundaryKind<S> {
    /// 从配置构建
    pub fn from_choice(choice: &BoundaryChoice) -> Self {
        match choice {
            BoundaryChoice::ZeroGradient => Self::ZeroGradient,
            BoundaryChoice::Periodic => Self::Periodic,
            BoundaryChoice::Dirichlet { value } => Self::Dirichlet(S::from_config(*value)),
        }
    }
}

impl<S: RuntimeScalar> Default for BoundaryKind<S> {
    fn default() -> Self {
        Self::ZeroGradient
    }
}

impl<S: RuntimeScalar> BoundaryCondition<S> for BoundaryKind<S> {
    fn name(&self) -> &'static str {
        match self {
            Self::ZeroGradient => BoundaryCondition::<S>::name(&ZeroGradient),
            Self::Periodic => BoundaryCondition::<S>::name(&Periodic),
            Self::Dirichlet(v) => Dirichlet::new(*v).name(),
        }
    }

    fn validate(&self, len: usize, size: StencilSize) -> EtResult<()> {
        match self {
            Self::ZeroGradient => BoundaryCondition::<S>::validate(&ZeroGradient, len, size),
            Self::Periodic => BoundaryCondition::<S>::validate(&Periodic, len, size),
            Self::Dirichlet(v) => Dirichlet::new(*v).validate(len, size),
        }
    }

    #[inline]
    fn ghost(&self, interior: &[S], index: isize) -> S {
        match self {
            Self::ZeroGradient => ZeroGradient.ghost(interior, index),
            Self::Periodic => Periodic.ghost(interior, index),
            Self::Dirichlet(v) => *v,
        }
    }
}
