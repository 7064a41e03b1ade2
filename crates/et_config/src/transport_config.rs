// crates/et_config/src/transport_config.rs

//! TransportConfig - 对流算子配置（全 f64）
//!
//! 描述模板格式、边界条件、时间推进和并行参数。所有数值使用 f64 存储，
//! 在构建算子时根据 `precision` 转换到相应精度。
//!
//! # JSON 示例
//!
//! ```json
//! {
//!   "precision": "f64",
//!   "scheme": { "stencil": "l94", "monotonic": true },
//!   "boundary": { "kind": "zero_gradient" },
//!   "time": { "dt": 300.0, "end": 86400.0, "integrator": "ssp_rk2", "splitting": "strang" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::precision::Precision;

/// 对流算子完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransportConfig {
    /// 计算精度
    #[serde(default)]
    pub precision: Precision,

    /// 空间格式
    #[serde(default)]
    pub scheme: SchemeConfig,

    /// 边界条件
    #[serde(default)]
    pub boundary: BoundaryChoice,

    /// 时间推进
    #[serde(default)]
    pub time: TimeConfig,

    /// 并行参数
    #[serde(default)]
    pub parallel: ParallelConfig,

    /// 演示运行使用的均匀网格
    #[serde(default)]
    pub grid: GridConfig,
}

// ============================================================
// 空间格式
// ============================================================

/// 模板格式选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StencilChoice {
    /// 一阶迎风
    Upwind1,
    /// 二阶线性迎风 (LUD)
    Upwind2,
    /// Lin et al. (1994) 分段线性
    #[default]
    L94,
    /// Colella & Woodward (1984) 分段抛物
    Ppm,
}

impl StencilChoice {
    /// 全部可选格式
    pub const ALL: [StencilChoice; 4] = [Self::Upwind1, Self::Upwind2, Self::L94, Self::Ppm];

    /// 配置名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upwind1 => "upwind1",
            Self::Upwind2 => "upwind2",
            Self::L94 => "l94",
            Self::Ppm => "ppm",
        }
    }
}

impl std::str::FromStr for StencilChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim_end_matches("_stencil")))
            .ok_or_else(|| ConfigError::invalid("scheme.stencil", s, "期望 upwind1/upwind2/l94/ppm"))
    }
}

/// 空间格式配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// 模板格式
    #[serde(default)]
    pub stencil: StencilChoice,

    /// 是否启用单调性限制（仅 L94/PPM 使用）
    #[serde(default = "default_true")]
    pub monotonic: bool,
}

fn default_true() -> bool { true }

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            stencil: StencilChoice::default(),
            monotonic: true,
        }
    }
}

// ============================================================
// 边界条件
// ============================================================

/// 边界条件选择
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryChoice {
    /// 零梯度 (Neumann)
    #[default]
    ZeroGradient,
    /// 周期边界
    Periodic,
    /// 固定值 (Dirichlet)
    Dirichlet {
        /// 幽灵单元取值
        value: f64,
    },
}

impl BoundaryChoice {
    /// 配置名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZeroGradient => "zero_gradient",
            Self::Periodic => "periodic",
            Self::Dirichlet { .. } => "dirichlet",
        }
    }
}

// ============================================================
// 时间推进
// ============================================================

/// 时间积分器选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorChoice {
    /// 前向欧拉
    ForwardEuler,
    /// SSP-RK2 (Heun)
    #[default]
    SspRk2,
    /// SSP-RK3 (Shu-Osher)
    SspRk3,
}

/// 多轴耦合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplittingChoice {
    /// 各轴导数求和后整体积分
    Simultaneous,
    /// 逐轴顺序推进 (Lie)
    Lie,
    /// 对称 Strang 分裂
    #[default]
    Strang,
}

/// 时间推进配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// 固定时间步长 [s]
    #[serde(default = "default_dt")]
    pub dt: f64,

    /// 起始时间 [s]
    #[serde(default)]
    pub start: f64,

    /// 结束时间 [s]
    #[serde(default = "default_end")]
    pub end: f64,

    /// 积分器
    #[serde(default)]
    pub integrator: IntegratorChoice,

    /// 多轴耦合方式
    #[serde(default)]
    pub splitting: SplittingChoice,

    /// 诊断使用的目标 Courant 数
    #[serde(default = "default_target_courant")]
    pub target_courant: f64,
}

fn default_dt() -> f64 { 300.0 }
fn default_end() -> f64 { 3600.0 }
fn default_target_courant() -> f64 { 0.9 }

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            start: 0.0,
            end: default_end(),
            integrator: IntegratorChoice::default(),
            splitting: SplittingChoice::default(),
            target_courant: default_target_courant(),
        }
    }
}

impl TimeConfig {
    /// 总步数（向上取整）
    pub fn n_steps(&self) -> usize {
        if self.dt <= 0.0 || self.end <= self.start {
            return 0;
        }
        ((self.end - self.start) / self.dt).ceil() as usize
    }
}

// ============================================================
// 并行
// ============================================================

/// 列并行配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// 是否启用 rayon 列并行
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 最小并行列数（低于此值串行）
    #[serde(default = "default_min_parallel_columns")]
    pub min_parallel_columns: usize,
}

fn default_min_parallel_columns() -> usize { 64 }

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_parallel_columns: default_min_parallel_columns(),
        }
    }
}

// ============================================================
// 演示网格
// ============================================================

/// 均匀网格与恒定风场（命令行演示使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// 张量形状
    #[serde(default = "default_shape")]
    pub shape: Vec<usize>,

    /// 每个轴的网格间距 [m]，可为负
    #[serde(default = "default_spacing")]
    pub spacing: Vec<f64>,

    /// 每个轴的恒定风速 [m/s]
    #[serde(default = "default_velocity")]
    pub velocity: Vec<f64>,
}

fn default_shape() -> Vec<usize> { vec![100] }
fn default_spacing() -> Vec<f64> { vec![1000.0] }
fn default_velocity() -> Vec<f64> { vec![1.0] }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            shape: default_shape(),
            spacing: default_spacing(),
            velocity: default_velocity(),
        }
    }
}

// ============================================================
// 加载与验证
// ============================================================

impl TransportConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: TransportConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time.dt > 0.0 && self.time.dt.is_finite()) {
            return Err(ConfigError::invalid("time.dt", self.time.dt, "时间步长必须为正的有限值"));
        }
        if self.time.end < self.time.start {
            return Err(ConfigError::invalid("time.end", self.time.end, "结束时间早于起始时间"));
        }
        if !(self.time.target_courant > 0.0) {
            return Err(ConfigError::invalid(
                "time.target_courant",
                self.time.target_courant,
                "目标 Courant 数必须为正",
            ));
        }
        if let BoundaryChoice::Dirichlet { value } = self.boundary {
            if !value.is_finite() {
                return Err(ConfigError::invalid("boundary.value", value, "边界值必须有限"));
            }
        }

        let grid = &self.grid;
        if grid.shape.is_empty() {
            return Err(ConfigError::Missing("grid.shape".to_string()));
        }
        if grid.shape.iter().any(|&n| n == 0) {
            return Err(ConfigError::invalid("grid.shape", format!("{:?}", grid.shape), "各维长度必须为正"));
        }
        let rank = grid.shape.len();
        if grid.spacing.len() != rank {
            return Err(ConfigError::invalid(
                "grid.spacing",
                format!("{:?}", grid.spacing),
                "长度必须等于张量阶数",
            ));
        }
        if grid.velocity.len() != rank {
            return Err(ConfigError::invalid(
                "grid.velocity",
                format!("{:?}", grid.velocity),
                "长度必须等于张量阶数",
            ));
        }
        if grid.spacing.iter().any(|&dx| dx == 0.0 || !dx.is_finite()) {
            return Err(ConfigError::invalid(
                "grid.spacing",
                format!("{:?}", grid.spacing),
                "网格间距不能为零（允许为负）",
            ));
        }

        Ok(())
    }
}
