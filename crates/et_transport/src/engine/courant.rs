// crates/et_transport/src/engine/courant.rs

//! Courant 数诊断
//!
//! 单元 Courant 数取两侧面速度的较大者：
//!
//! ```text
//! c_i = max(|U(i-1/2)|, |U(i+1/2)|) · Δt / |Δz_i|
//! ```
//!
//! 诊断只报告结果与建议步长，不修改任何算子的 Δt。

use et_foundation::{EtResult, RuntimeScalar};
use tracing::warn;

use crate::operator::AxisAdvection;

/// Courant 数统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourantStats {
    /// 扫描轴
    pub axis: usize,
    /// 最大 |c|
    pub max_courant: f64,
    /// 最大值所在列
    pub column: usize,
    /// 最大值所在单元（扫描轴位置）
    pub cell: usize,
    /// 统计所用的时间步长
    pub dt: f64,
}

impl CourantStats {
    /// 是否满足 `|c| <= 1`
    pub fn is_stable(&self) -> bool {
        self.max_courant <= 1.0
    }

    /// 达到目标 Courant 数的建议步长，速度全为零时返回 `None`
    pub fn suggested_dt(&self, target_courant: f64) -> Option<f64> {
        if self.max_courant > 0.0 {
            Some(target_courant * self.dt / self.max_courant)
        } else {
            None
        }
    }
}

/// 统计单轴算子在时间 `t`、步长 `dt` 下的 Courant 数
pub fn courant_stats<S: RuntimeScalar>(op: &AxisAdvection<S>, t: f64, dt: f64) -> EtResult<CourantStats> {
    let reorder = op.reorder();
    let mut stats = CourantStats {
        axis: reorder.axis(),
        max_courant: 0.0,
        column: 0,
        cell: 0,
        dt,
    };

    for col in 0..reorder.n_cols() {
        let transverse = reorder.transverse(col);
        let mut u_left = op.velocity().velocity(0, &transverse, t)?.to_config();
        for i in 0..reorder.n_rows() {
            let u_right = op.velocity().velocity(i + 1, &transverse, t)?.to_config();
            let dz = op.spacing().spacing(i, &transverse, t)?.to_config();
            let c = u_left.abs().max(u_right.abs()) * dt / dz.abs();
            if c > stats.max_courant {
                stats.max_courant = c;
                stats.column = col;
                stats.cell = i;
            }
            u_left = u_right;
        }
    }

    if !stats.is_stable() {
        warn!(
            axis = stats.axis,
            max_courant = stats.max_courant,
            column = stats.column,
            cell = stats.cell,
            "Courant 数超过 1，显式格式可能不稳定"
        );
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{ConstantVelocity, UniformSpacing};
    use crate::reorder::AxisReorder;
    use crate::stencil::Upwind1;

    #[test]
    fn test_matches_u_dt_over_dx() {
        let op = AxisAdvection::builder(AxisReorder::new(&[10], 0).unwrap())
            .stencil(Upwind1)
            .velocity(ConstantVelocity(2.0f64))
            .spacing(UniformSpacing(-4.0))
            .build()
            .unwrap();
        let stats = courant_stats(&op, 0.0, 0.5).unwrap();
        assert_eq!(stats.max_courant, 0.25);
        assert!(stats.is_stable());
        assert_eq!(stats.suggested_dt(0.5), Some(1.0));
    }

    #[test]
    fn test_locates_maximum() {
        let velocity = |edge: usize, transverse: &[usize], _t: f64| -> EtResult<f64> {
            Ok(if edge == 3 && transverse[0] == 1 { -3.0 } else { 1.0 })
        };
        let op = AxisAdvection::builder(AxisReorder::new(&[2, 6], 1).unwrap())
            .stencil(Upwind1)
            .velocity(velocity)
            .spacing(UniformSpacing(1.0))
            .build()
            .unwrap();
        let stats = courant_stats(&op, 0.0, 1.0).unwrap();
        assert_eq!(stats.max_courant, 3.0);
        assert_eq!(stats.column, 1);
        // 面 3 是单元 2 的右面，先被单元 2 统计
        assert_eq!(stats.cell, 2);
        assert!(!stats.is_stable());
    }

    #[test]
    fn test_zero_velocity_has_no_suggestion() {
        let op = AxisAdvection::builder(AxisReorder::new(&[4], 0).unwrap())
            .velocity(ConstantVelocity(0.0f64))
            .spacing(UniformSpacing(1.0))
            .build()
            .unwrap();
        let stats = courant_stats(&op, 0.0, 1.0).unwrap();
        assert_eq!(stats.suggested_dt(0.9), None);
    }
}
