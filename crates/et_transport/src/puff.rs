// crates/et_transport/src/puff.rs

//! 拉格朗日烟团追踪
//!
//! 追踪单个质点 `(x, y, z)` 在速度场中的轨迹。每步使用二阶中点法：
//!
//! ```text
//! k1 = r(p, t)
//! k2 = r(p + Δt/2 · k1, t + Δt/2)
//! p' = p + Δt · k2
//! ```
//!
//! 其中 `r` 为坐标变化率，由物理速度经 [`CoordinateScale`] 换算。
//!
//! - 垂直坐标限制在 `[z_min, z_max]`（地面与模式顶）
//! - 水平坐标离开计算域时烟团停止，之后的推进不再改变状态

use et_foundation::{ensure, EtError, EtResult};
use serde::{Deserialize, Serialize};

/// 坐标尺度：物理速度 → 坐标变化率
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoordinateScale {
    /// 笛卡尔坐标，速度即坐标变化率
    #[default]
    Cartesian,
    /// 经纬度坐标（弧度），`x` 为经度、`y` 为纬度
    LonLat {
        /// 球体半径 [m]
        radius: f64,
    },
}

impl CoordinateScale {
    /// 地球平均半径下的经纬度坐标
    pub const fn earth() -> Self {
        Self::LonLat { radius: 6_371_000.0 }
    }

    /// 坐标变化率
    ///
    /// 垂直速度已假定为垂直坐标单位，不做换算。
    #[inline]
    pub fn rate(&self, position: [f64; 3], velocity: [f64; 3]) -> [f64; 3] {
        match *self {
            Self::Cartesian => velocity,
            Self::LonLat { radius } => {
                let lat = position[1];
                [
                    velocity[0] / (radius * lat.cos()),
                    velocity[1] / radius,
                    velocity[2],
                ]
            }
        }
    }
}

/// 烟团速度场
pub trait PuffVelocity: Send + Sync {
    /// 位置 `position`、时间 `t` 处的速度 `[u, v, w]`
    fn velocity(&self, position: [f64; 3], t: f64) -> EtResult<[f64; 3]>;
}

impl<F> PuffVelocity for F
where
    F: Fn([f64; 3], f64) -> EtResult<[f64; 3]> + Send + Sync,
{
    fn velocity(&self, position: [f64; 3], t: f64) -> EtResult<[f64; 3]> {
        self(position, t)
    }
}

/// 烟团计算域
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuffDomain {
    /// x 范围
    pub x: (f64, f64),
    /// y 范围
    pub y: (f64, f64),
    /// z 范围（地面、模式顶）
    pub z: (f64, f64),
}

impl PuffDomain {
    /// 创建计算域，各方向要求 `min < max`
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> EtResult<Self> {
        for (name, (lo, hi)) in [("x", x), ("y", y), ("z", z)] {
            if !(lo < hi) {
                return Err(EtError::invalid_input(format!(
                    "烟团计算域 {name} 范围无效: [{lo}, {hi}]"
                )));
            }
        }
        Ok(Self { x, y, z })
    }

    /// 水平方向是否在域内（含边界）
    #[inline]
    pub fn contains_horizontal(&self, position: [f64; 3]) -> bool {
        (self.x.0..=self.x.1).contains(&position[0]) && (self.y.0..=self.y.1).contains(&position[1])
    }

    /// 将垂直坐标限制在域内
    #[inline]
    pub fn clamp_vertical(&self, mut position: [f64; 3]) -> [f64; 3] {
        position[2] = position[2].clamp(self.z.0, self.z.1);
        position
    }
}

/// 烟团状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuffStatus {
    /// 仍在域内
    Active,
    /// 已离开水平计算域
    Exited,
}

/// 轨迹点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuffState {
    /// 时间
    pub t: f64,
    /// 位置
    pub position: [f64; 3],
    /// 状态
    pub status: PuffStatus,
}

/// 拉格朗日烟团
pub struct Puff<V> {
    velocity: V,
    domain: PuffDomain,
    scale: CoordinateScale,
    state: PuffState,
}

impl<V: PuffVelocity> Puff<V> {
    /// 在 `t0` 时刻从 `position` 释放烟团
    ///
    /// 初始水平位置必须在域内；垂直位置会被限制到域内。
    pub fn new(
        velocity: V,
        domain: PuffDomain,
        scale: CoordinateScale,
        position: [f64; 3],
        t0: f64,
    ) -> EtResult<Self> {
        if !domain.contains_horizontal(position) {
            return Err(EtError::invalid_input(format!(
                "烟团初始位置 {position:?} 不在水平计算域内"
            )));
        }
        Ok(Self {
            velocity,
            domain,
            scale,
            state: PuffState {
                t: t0,
                position: domain.clamp_vertical(position),
                status: PuffStatus::Active,
            },
        })
    }

    /// 当前状态
    pub fn state(&self) -> PuffState {
        self.state
    }

    /// 是否已离开计算域
    pub fn is_exited(&self) -> bool {
        self.state.status == PuffStatus::Exited
    }

    fn rate(&self, position: [f64; 3], t: f64) -> EtResult<[f64; 3]> {
        let velocity = self.velocity.velocity(position, t)?;
        Ok(self.scale.rate(position, velocity))
    }

    /// 推进 `dt`
    pub fn step(&mut self, dt: f64) -> EtResult<PuffState> {
        if self.is_exited() {
            return Ok(self.state);
        }
        let PuffState { t, position: p, .. } = self.state;

        let k1 = self.rate(p, t)?;
        let mid = self.domain.clamp_vertical(axpy(p, 0.5 * dt, k1));
        let k2 = self.rate(mid, t + 0.5 * dt)?;
        let next = self.domain.clamp_vertical(axpy(p, dt, k2));

        let status = if self.domain.contains_horizontal(next) {
            PuffStatus::Active
        } else {
            PuffStatus::Exited
        };
        self.state = PuffState {
            t: t + dt,
            position: next,
            status,
        };
        Ok(self.state)
    }

    /// 以步长 `dt` 推进到 `t_end`，返回包含起点的轨迹
    ///
    /// 最后一步缩短以精确到达 `t_end`；离开计算域时提前结束。
    pub fn run(&mut self, t_end: f64, dt: f64) -> EtResult<Vec<PuffState>> {
        ensure!(
            dt.is_finite() && dt > 0.0,
            EtError::invalid_input(format!("烟团步长必须为正: {dt}"))
        );
        let mut trajectory = vec![self.state];
        while !self.is_exited() && self.state.t < t_end {
            let h = dt.min(t_end - self.state.t);
            trajectory.push(self.step(h)?);
        }
        Ok(trajectory)
    }
}

#[inline]
fn axpy(p: [f64; 3], a: f64, k: [f64; 3]) -> [f64; 3] {
    [p[0] + a * k[0], p[1] + a * k[1], p[2] + a * k[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> PuffDomain {
        PuffDomain::new((0.0, 100.0), (0.0, 100.0), (0.0, 10.0)).unwrap()
    }

    fn constant(u: [f64; 3]) -> impl Fn([f64; 3], f64) -> EtResult<[f64; 3]> + Send + Sync {
        move |_p: [f64; 3], _t: f64| Ok(u)
    }

    #[test]
    fn test_constant_wind_translation() {
        let mut puff = Puff::new(constant([2.0, -1.0, 0.0]), domain(), CoordinateScale::Cartesian, [10.0, 50.0, 5.0], 0.0).unwrap();
        let trajectory = puff.run(10.0, 1.0).unwrap();
        assert_eq!(trajectory.len(), 11);
        let last = trajectory[10];
        assert!((last.position[0] - 30.0).abs() < 1e-12);
        assert!((last.position[1] - 40.0).abs() < 1e-12);
        assert_eq!(last.t, 10.0);
        assert_eq!(last.status, PuffStatus::Active);
    }

    #[test]
    fn test_midpoint_is_second_order() {
        // u = t：x(t) = t²/2，中点法对二次轨迹精确
        let velocity = |_p: [f64; 3], t: f64| -> EtResult<[f64; 3]> { Ok([t, 0.0, 0.0]) };
        let mut puff = Puff::new(velocity, domain(), CoordinateScale::Cartesian, [0.0, 0.0, 0.0], 0.0).unwrap();
        puff.run(4.0, 0.5).unwrap();
        assert!((puff.state().position[0] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_clamped() {
        let mut puff = Puff::new(constant([0.0, 0.0, 3.0]), domain(), CoordinateScale::Cartesian, [50.0, 50.0, 8.0], 0.0).unwrap();
        puff.run(5.0, 1.0).unwrap();
        assert_eq!(puff.state().position[2], 10.0);
        let mut sinking = Puff::new(constant([0.0, 0.0, -3.0]), domain(), CoordinateScale::Cartesian, [50.0, 50.0, 1.0], 0.0).unwrap();
        sinking.step(1.0).unwrap();
        assert_eq!(sinking.state().position[2], 0.0);
        assert!(!sinking.is_exited());
    }

    #[test]
    fn test_horizontal_exit_stops() {
        let mut puff = Puff::new(constant([30.0, 0.0, 0.0]), domain(), CoordinateScale::Cartesian, [50.0, 50.0, 5.0], 0.0).unwrap();
        let trajectory = puff.run(100.0, 1.0).unwrap();
        let last = *trajectory.last().unwrap();
        assert_eq!(last.status, PuffStatus::Exited);
        assert_eq!(last.t, 2.0);
        // 离开后推进为空操作
        assert_eq!(puff.step(1.0).unwrap(), last);
    }

    #[test]
    fn test_lonlat_scale() {
        let scale = CoordinateScale::LonLat { radius: 2.0 };
        let rate = scale.rate([0.0, 0.0, 1.0], [4.0, 2.0, 0.5]);
        assert_eq!(rate, [2.0, 1.0, 0.5]);
        let rate = scale.rate([0.0, std::f64::consts::FRAC_PI_3, 0.0], [4.0, 0.0, 0.0]);
        assert!((rate[0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_setup() {
        assert!(PuffDomain::new((1.0, 0.0), (0.0, 1.0), (0.0, 1.0)).is_err());
        assert!(Puff::new(constant([0.0; 3]), domain(), CoordinateScale::Cartesian, [200.0, 0.0, 0.0], 0.0).is_err());
        let mut puff = Puff::new(constant([0.0; 3]), domain(), CoordinateScale::Cartesian, [1.0, 1.0, 1.0], 0.0).unwrap();
        assert!(puff.run(1.0, 0.0).is_err());
    }

    #[test]
    fn test_scale_json_tagged() {
        let scale: CoordinateScale = serde_json::from_str(r#"{"kind":"lon_lat","radius":2.0}"#).unwrap();
        assert_eq!(scale, CoordinateScale::LonLat { radius: 2.0 });
        assert_eq!(serde_json::to_string(&scale).unwrap(), r#"{"kind":"lon_lat","radius":2.0}"#);

        let cartesian: CoordinateScale = serde_json::from_str(r#"{"kind":"cartesian"}"#).unwrap();
        assert_eq!(cartesian, CoordinateScale::Cartesian);
        assert!(serde_json::from_str::<CoordinateScale>(r#"{"kind":"polar"}"#).is_err());
    }

    #[test]
    fn test_trajectory_json_round_trip() {
        let mut puff = Puff::new(constant([2.0, -1.0, 0.0]), domain(), CoordinateScale::Cartesian, [10.0, 50.0, 5.0], 0.0).unwrap();
        let trajectory = puff.run(4.0, 1.0).unwrap();
        let json = serde_json::to_string(&trajectory).unwrap();
        let back: Vec<PuffState> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trajectory);
        assert_eq!(back[4].position, [18.0, 46.0, 5.0]);

        let domain_json = serde_json::to_string(&domain()).unwrap();
        assert_eq!(serde_json::from_str::<PuffDomain>(&domain_json).unwrap(), domain());
    }
}
