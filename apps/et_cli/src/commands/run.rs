// apps/et_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 在均匀网格上推进一个高斯烟团，报告 Courant 数与质量漂移。
//!
//! # 架构说明
//!
//! 本模块属于 Layer 5: Application：
//! - 使用 `TransportConfig` 描述算子
//! - 精度通过 `Precision` 枚举选择，在 [`simulate`] 处单态化

use anyhow::{Context, Result};
use clap::Args;
use et_config::{BoundaryChoice, Precision, StencilChoice, TransportConfig};
use et_foundation::RuntimeScalar;
use et_transport::{courant_stats, AdvectionOperator};
use ndarray::{ArrayD, IxDyn};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径 (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 覆盖模板格式 (upwind1, upwind2, l94, ppm)
    #[arg(short, long)]
    pub stencil: Option<String>,

    /// 一维网格单元数量（覆盖配置中的网格）
    #[arg(long)]
    pub cells: Option<usize>,

    /// 覆盖时间步长 [秒]
    #[arg(long)]
    pub dt: Option<f64>,

    /// 推进步数（默认由配置的起止时间推算）
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// 使用周期边界
    #[arg(long)]
    pub periodic: bool,

    /// 使用 f32 精度
    #[arg(long)]
    pub f32: bool,

    /// 最终场输出文件 (JSON)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== EnvTransport 模拟启动 ===");

    let mut config = match &args.config {
        Some(path) => TransportConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
        None => TransportConfig::default(),
    };
    apply_overrides(&mut config, &args)?;
    config.validate().context("配置无效")?;

    let n_steps = args.steps.unwrap_or_else(|| config.time.n_steps());
    info!(
        "使用精度: {}, 模板: {}, 边界: {}, 步数: {}",
        config.precision,
        config.scheme.stencil.name(),
        config.boundary.name(),
        n_steps
    );

    let summary = match config.precision {
        Precision::F32 => simulate::<f32>(&config, n_steps)?,
        Precision::F64 => simulate::<f64>(&config, n_steps)?,
    };

    println!("\n=== 模拟完成 ===");
    println!("结束时间: {:.3} s", summary.t_end);
    println!("计算耗时: {:.3} s", summary.elapsed);
    println!("初始质量: {:.12e}", summary.mass_before);
    println!("最终质量: {:.12e}", summary.mass_after);
    println!("相对漂移: {:.3e}", summary.drift());
    println!("最大值:   {:.6}", summary.max);
    println!("最小值:   {:.6}", summary.min);

    let tolerance = config.precision.conservation_tolerance();
    if config.boundary == BoundaryChoice::Periodic && summary.drift() > tolerance {
        warn!("周期边界下质量漂移 {:.3e} 超过容差 {:.1e}", summary.drift(), tolerance);
    }

    if let Some(path) = &args.output {
        let json = serde_json::json!({
            "shape": config.grid.shape,
            "precision": config.precision.name(),
            "t": summary.t_end,
            "values": summary.values,
        });
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("无法写入输出文件: {}", path.display()))?;
        info!("最终场已写入 {}", path.display());
    }

    Ok(())
}

fn apply_overrides(config: &mut TransportConfig, args: &RunArgs) -> Result<()> {
    if let Some(stencil) = &args.stencil {
        config.scheme.stencil = stencil.parse::<StencilChoice>()?;
    }
    if let Some(cells) = args.cells {
        let spacing = config.grid.spacing.first().copied().unwrap_or(1000.0);
        let velocity = config.grid.velocity.first().copied().unwrap_or(1.0);
        config.grid.shape = vec![cells];
        config.grid.spacing = vec![spacing];
        config.grid.velocity = vec![velocity];
    }
    if let Some(dt) = args.dt {
        config.time.dt = dt;
    }
    if args.periodic {
        config.boundary = BoundaryChoice::Periodic;
    }
    if args.f32 {
        config.precision = Precision::F32;
    }
    Ok(())
}

/// 模拟结果摘要（全 f64）
struct RunSummary {
    t_end: f64,
    elapsed: f64,
    mass_before: f64,
    mass_after: f64,
    max: f64,
    min: f64,
    values: Vec<f64>,
}

impl RunSummary {
    fn drift(&self) -> f64 {
        if self.mass_before == 0.0 {
            (self.mass_after - self.mass_before).abs()
        } else {
            ((self.mass_after - self.mass_before) / self.mass_before).abs()
        }
    }
}

fn simulate<S: RuntimeScalar>(config: &TransportConfig, n_steps: usize) -> Result<RunSummary> {
    let op = AdvectionOperator::<S>::from_config(config).context("构建对流算子失败")?;
    let t0 = config.time.start;

    for axis in op.axes() {
        let stats = courant_stats(axis, t0, op.dt())?;
        info!("轴 {}: 最大 Courant 数 {:.3}", stats.axis, stats.max_courant);
        if let Some(dt) = stats.suggested_dt(config.time.target_courant) {
            info!("轴 {}: 目标 Courant {} 对应步长 {:.3} s", stats.axis, config.time.target_courant, dt);
        }
    }

    let mut field = gaussian_puff::<S>(&config.grid.shape);
    let mass_before = total(&field);

    let start = Instant::now();
    let t_end = op.run(&mut field, t0, n_steps).context("时间推进失败")?;
    let elapsed = start.elapsed().as_secs_f64();

    let values: Vec<f64> = field.iter().map(|v| v.to_config()).collect();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    Ok(RunSummary {
        t_end,
        elapsed,
        mass_before,
        mass_after: total(&field),
        max,
        min,
        values,
    })
}

/// 以网格中心为峰值的高斯烟团，宽度为各轴长度的十分之一
fn gaussian_puff<S: RuntimeScalar>(shape: &[usize]) -> ArrayD<S> {
    ArrayD::from_shape_fn(IxDyn(shape), |ix| {
        let r2: f64 = shape
            .iter()
            .enumerate()
            .map(|(axis, &n)| {
                let center = 0.5 * n as f64;
                let width = (0.1 * n as f64).max(1.0);
                let x = (ix[axis] as f64 + 0.5 - center) / width;
                x * x
            })
            .sum();
        S::from_config((-r2).exp())
    })
}

fn total<S: RuntimeScalar>(field: &ArrayD<S>) -> f64 {
    field.iter().map(|v| v.to_config()).sum()
}
