// crates/et_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 对流核心不做任何本地恢复：所有异常都以 `EtError` 原样返回给调用方。
//! 非有限数值（NaN/Inf）不属于错误，按 IEEE 语义传播。
//!
//! # 示例
//!
//! ```
//! use et_foundation::error::{EtError, EtResult};
//!
//! fn pick_axis(axis: usize, rank: usize) -> EtResult<usize> {
//!     EtError::check_axis(axis, rank)?;
//!     Ok(axis)
//! }
//!
//! assert!(pick_axis(3, 3).is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type EtResult<T> = Result<T, EtError>;

/// EnvTransport 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EtError {
    /// 形状不匹配（重排/逆重排、缓冲区长度等）
    #[error("形状不匹配: {name} 期望 {expected:?}, 实际 {actual:?}")]
    ShapeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望形状
        expected: Vec<usize>,
        /// 实际形状
        actual: Vec<usize>,
    },

    /// 轴选择超出张量阶数
    #[error("无效轴: axis={axis}, 张量阶数={rank}")]
    InvalidAxis {
        /// 请求的轴（从 0 开始）
        axis: usize,
        /// 张量阶数
        rank: usize,
    },

    /// 边界条件无法满足模板窗口
    #[error("边界条件 {boundary} 不支持: 列长度={len}, 模板半宽=({left}, {right}): {reason}")]
    UnsupportedBoundary {
        /// 边界条件名称
        boundary: &'static str,
        /// 一维列长度
        len: usize,
        /// 左半宽
        left: usize,
        /// 右半宽
        right: usize,
        /// 原因
        reason: String,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 速度场/网格间距提供者返回的错误
    #[error("数据提供者错误 ({provider}): {message}")]
    Provider {
        /// 提供者名称
        provider: &'static str,
        /// 错误信息
        message: String,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },
}

impl EtError {
    /// 形状不匹配
    pub fn shape_mismatch(
        name: &'static str,
        expected: impl Into<Vec<usize>>,
        actual: impl Into<Vec<usize>>,
    ) -> Self {
        Self::ShapeMismatch {
            name,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// 不支持的边界条件组合
    pub fn unsupported_boundary(
        boundary: &'static str,
        len: usize,
        left: usize,
        right: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedBoundary {
            boundary,
            len,
            left,
            right,
            reason: reason.into(),
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 提供者错误
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 检查轴是否有效
    #[inline]
    pub fn check_axis(axis: usize, rank: usize) -> EtResult<()> {
        if axis >= rank {
            Err(Self::InvalidAxis { axis, rank })
        } else {
            Ok(())
        }
    }

    /// 检查形状是否一致
    #[inline]
    pub fn check_shape(name: &'static str, expected: &[usize], actual: &[usize]) -> EtResult<()> {
        if expected != actual {
            Err(Self::shape_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> EtResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }
}

/// 前置条件检查宏
///
/// 条件不成立时返回给定错误。
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EtError::config("测试配置错误");
        assert!(err.to_string().contains("配置错误"));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = EtError::shape_mismatch("field", [4, 5], [4, 6]);
        let msg = err.to_string();
        assert!(msg.contains("field"));
        assert!(msg.contains("[4, 5]"));
        assert!(msg.contains("[4, 6]"));
    }

    #[test]
    fn test_check_axis() {
        assert!(EtError::check_axis(0, 1).is_ok());
        assert!(EtError::check_axis(2, 3).is_ok());
        assert_eq!(
            EtError::check_axis(3, 3),
            Err(EtError::InvalidAxis { axis: 3, rank: 3 })
        );
    }

    #[test]
    fn test_check_shape() {
        assert!(EtError::check_shape("m", &[2, 3], &[2, 3]).is_ok());
        assert!(EtError::check_shape("m", &[2, 3], &[3, 2]).is_err());
    }

    #[test]
    fn test_check_index() {
        assert!(EtError::check_index("edge", 10, 11).is_ok());
        assert!(EtError::check_index("edge", 11, 11).is_err());
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> EtResult<()> {
            ensure!(value > 0, EtError::invalid_input("value must be positive"));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(check(-1).is_err());
    }
}
