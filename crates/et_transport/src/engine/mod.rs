// crates/et_transport/src/engine/mod.rs

//! 时间推进引擎
//!
//! - [`time_integrator`]: 前向欧拉与 SSP-RK 积分器
//! - [`splitting`]: 算子分裂方案与驱动器
//! - [`courant`]: Courant 数诊断

pub mod courant;
pub mod splitting;
pub mod time_integrator;

pub use courant::{courant_stats, CourantStats};
pub use splitting::{SourceProcess, SplitProcess, SplittingScheme, StrangSplitter};
pub use time_integrator::{RhsComputer, TimeIntegratorKind};
