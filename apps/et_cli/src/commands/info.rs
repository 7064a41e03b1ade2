// apps/et_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示系统信息、可用模板和默认配置。

use anyhow::Result;
use clap::Args;
use et_config::{StencilChoice, TransportConfig};
use et_transport::StencilKind;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示系统信息
    #[arg(long)]
    pub system: bool,

    /// 显示可用模板
    #[arg(long)]
    pub stencils: bool,

    /// 显示默认配置
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== EnvTransport 信息 ===");

    if !args.system && !args.stencils && !args.defaults {
        print_system_info();
        println!();
        print_stencils();
        println!();
        return print_default_config();
    }

    if args.system {
        print_system_info();
    }
    if args.stencils {
        print_stencils();
    }
    if args.defaults {
        print_default_config()?;
    }
    Ok(())
}

fn print_system_info() {
    println!("=== 系统信息 ===");
    println!("EnvTransport CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);
    println!("可用线程: {}", available_threads());

    println!("\n可用精度:");
    println!("  - f32 (单精度): ✓");
    println!("  - f64 (双精度): ✓");
}

fn available_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn print_stencils() {
    println!("=== 模板格式 ===");
    println!("{:<10} {:>6} {:>6} {:>8}", "名称", "左", "右", "用 Δt");
    for choice in StencilChoice::ALL {
        let kind = StencilKind::from(choice);
        let size = kind.window();
        println!(
            "{:<10} {:>6} {:>6} {:>8}",
            choice.name(),
            size.left,
            size.right,
            if kind.uses_dt() { "是" } else { "否" }
        );
    }
}

fn print_default_config() -> Result<()> {
    println!("=== 默认配置 ===");
    let config = TransportConfig::default();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
