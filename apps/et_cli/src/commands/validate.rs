// apps/et_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 解析配置文件，构建对流算子并检查 Courant 数等常见问题。

use anyhow::{bail, Context, Result};
use clap::Args;
use et_config::{SplittingChoice, StencilChoice, TransportConfig};
use et_transport::{courant_stats, AdvectionOperator};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== EnvTransport 配置验证 ===");

    let Some(config_path) = &args.config else {
        println!("用法: et_cli validate --config <配置文件> [--strict]");
        return Ok(());
    };

    let mut result = ValidationResult::default();
    validate_config(config_path, &mut result)?;
    print_validation_result(&result, args.strict)
}

fn validate_config(path: &Path, result: &mut ValidationResult) -> Result<()> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return Ok(());
    }

    let content = std::fs::read_to_string(path).context("无法读取配置文件")?;

    let config = match TransportConfig::from_json(&content) {
        Ok(config) => config,
        Err(e) => {
            result.add_error(format!("配置解析失败: {}", e));
            return Ok(());
        }
    };
    println!("  ✓ 配置文件格式有效");

    check_scheme(&config, result);

    // 构建算子可发现网格形状与时间步长等问题
    let op = match AdvectionOperator::<f64>::from_config(&config) {
        Ok(op) => op,
        Err(e) => {
            result.add_error(format!("无法构建对流算子: {}", e));
            return Ok(());
        }
    };
    println!("  ✓ 对流算子构建成功 ({} 轴)", op.axes().len());

    for axis in op.axes() {
        match courant_stats(axis, config.time.start, op.dt()) {
            Ok(stats) if !stats.is_stable() => result.add_warning(format!(
                "轴 {} 的 Courant 数 {:.3} 大于 1，显式格式可能不稳定",
                stats.axis, stats.max_courant
            )),
            Ok(_) => {}
            Err(e) => result.add_error(format!("Courant 统计失败: {}", e)),
        }
    }

    Ok(())
}

fn check_scheme(config: &TransportConfig, result: &mut ValidationResult) {
    let limited = matches!(config.scheme.stencil, StencilChoice::L94 | StencilChoice::Ppm);
    if limited && !config.scheme.monotonic {
        result.add_warning(format!(
            "{} 已关闭单调限制，可能产生过冲",
            config.scheme.stencil.name()
        ));
    }
    if config.time.splitting == SplittingChoice::Lie && config.grid.shape.len() > 1 {
        result.add_warning("Lie 分裂在时间上仅一阶精度");
    }
    if config.time.target_courant > 1.0 {
        result.add_warning(format!(
            "目标 Courant 数 {} 大于 1",
            config.time.target_courant
        ));
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
