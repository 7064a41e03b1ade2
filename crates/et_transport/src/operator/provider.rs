// crates/et_transport/src/operator/provider.rs

//! 速度场与网格间距提供者
//!
//! 面编号约定：长度为 `n` 的列有 `n + 1` 个面，面 `i` 为单元 `i` 的左面。
//! 横向索引按原始轴顺序给出（不含扫描轴），时间为显式 `f64` 参数。

use et_foundation::{EtResult, RuntimeScalar};

/// 面速度提供者
pub trait EdgeVelocity<S: RuntimeScalar>: Send + Sync {
    /// 面 `edge` 处的速度
    fn velocity(&self, edge: usize, transverse: &[usize], t: f64) -> EtResult<S>;
}

/// 网格间距提供者
pub trait GridSpacing<S: RuntimeScalar>: Send + Sync {
    /// 单元 `index` 的网格间距（可为负）
    fn spacing(&self, index: usize, transverse: &[usize], t: f64) -> EtResult<S>;
}

impl<S, F> EdgeVelocity<S> for F
where
    S: RuntimeScalar,
    F: Fn(usize, &[usize], f64) -> EtResult<S> + Send + Sync,
{
    #[inline]
    fn velocity(&self, edge: usize, transverse: &[usize], t: f64) -> EtResult<S> {
        self(edge, transverse, t)
    }
}

impl<S, F> GridSpacing<S> for F
where
    S: RuntimeScalar,
    F: Fn(usize, &[usize], f64) -> EtResult<S> + Send + Sync,
{
    #[inline]
    fn spacing(&self, index: usize, transverse: &[usize], t: f64) -> EtResult<S> {
        self(index, transverse, t)
    }
}

/// 均匀速度场
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantVelocity<S>(pub S);

impl<S: RuntimeScalar> EdgeVelocity<S> for ConstantVelocity<S> {
    #[inline]
    fn velocity(&self, _edge: usize, _transverse: &[usize], _t: f64) -> EtResult<S> {
        Ok(self.0)
    }
}

/// 均匀网格间距
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSpacing<S>(pub S);

impl<S: RuntimeScalar> GridSpacing<S> for UniformSpacing<S> {
    #[inline]
    fn spacing(&self, _index: usize, _transverse: &[usize], _t: f64) -> EtResult<S> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use et_foundation::EtError;

    #[test]
    fn test_closure_velocity() {
        let u = |edge: usize, transverse: &[usize], t: f64| -> EtResult<f64> {
            Ok(edge as f64 + transverse.iter().sum::<usize>() as f64 + t)
        };
        assert_eq!(u.velocity(3, &[1, 2], 0.5).unwrap(), 6.5);
    }

    #[test]
    fn test_closure_error_propagates() {
        let u = |_: usize, _: &[usize], _: f64| -> EtResult<f32> {
            Err(EtError::provider("wind", "数据缺失"))
        };
        assert!(matches!(u.velocity(0, &[], 0.0), Err(EtError::Provider { .. })));
    }

    #[test]
    fn test_constant_helpers() {
        assert_eq!(ConstantVelocity(2.0f64).velocity(9, &[], 1.0).unwrap(), 2.0);
        assert_eq!(UniformSpacing(-0.5f64).spacing(9, &[], 1.0).unwrap(), -0.5);
        let dz = |i: usize, _: &[usize], _: f64| Ok::<f64, EtError>(1.0 + i as f64);
        assert_eq!(dz.spacing(2, &[], 0.0).unwrap(), 3.0);
    }
}
