// crates/et_config/src/precision.rs

//! 运行时精度选择
//!
//! 场张量的数值类型在配置层以枚举表示，应用层据此分发到
//! `f32` 或 `f64` 单态化的对流算子。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

/// 场数据精度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 单精度 (f32)
    F32,
    /// 双精度 (f64)，默认
    #[default]
    F64,
}

impl Precision {
    /// 精度名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// 守恒性检查使用的相对容差
    pub fn conservation_tolerance(&self) -> f64 {
        match self {
            Self::F32 => 1e-5,
            Self::F64 => 1e-12,
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Precision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f32" | "float32" | "single" => Ok(Self::F32),
            "f64" | "float64" | "double" => Ok(Self::F64),
            _ => Err(ConfigError::InvalidValue {
                key: "precision".to_string(),
                value: s.to_string(),
                reason: "期望 'f32' 或 'f64'".to_string(),
            }),
        }
    }
}
