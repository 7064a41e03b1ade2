// apps/et_cli/src/main.rs

//! EnvTransport 命令行界面
//!
//! 提供有限体积对流算子的命令行工具。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 仅接触 `TransportConfig` 与 `Precision`
//! - 精度在入口处一次性分发到 `f32` 或 `f64` 单态化代码

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// EnvTransport 对流求解器命令行工具
#[derive(Parser)]
#[command(name = "et_cli")]
#[command(author = "EnvTransport Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "EnvTransport finite-volume advection engine", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，不区分大小写
    #[arg(short, long, default_value = "info", value_parser = parse_level)]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行对流模拟
    Run(commands::run::RunArgs),
    /// 显示模板与默认配置
    Info(commands::info::InfoArgs),
    /// 验证配置文件
    Validate(commands::validate::ValidateArgs),
}

/// 解析日志级别，沿用 `tracing::Level` 的 `FromStr`
fn parse_level(value: &str) -> Result<Level, String> {
    value
        .parse::<Level>()
        .map_err(|e| format!("无效日志级别 '{value}': {e}"))
}

/// 安装全局日志订阅器
fn init_tracing(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_level("WARN").unwrap(), Level::WARN);
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn test_log_level_flag() {
        let cli = Cli::try_parse_from(["et_cli", "info"]).unwrap();
        assert_eq!(cli.log_level, Level::INFO);
        let cli = Cli::try_parse_from(["et_cli", "--log-level", "Trace", "info"]).unwrap();
        assert_eq!(cli.log_level, Level::TRACE);
        assert!(Cli::try_parse_from(["et_cli", "-l", "loud", "info"]).is_err());
    }
}
