// crates/et_transport/src/engine/splitting.rs

//! 算子分裂
//!
//! 将 `dϕ/dt = A(ϕ) + B(ϕ) + ...` 拆解为按顺序推进的子过程：
//!
//! - Lie（一阶）：`A(Δt) B(Δt)`
//! - Strang（二阶对称）：`A(Δt/2) B(Δt) A(Δt/2)`，
//!   多过程时推广为 `P0(Δt/2) ... P(n-1)(Δt) ... P0(Δt/2)`
//!
//! 子过程可以是对流算子，也可以是排放、衰减等源项。

use std::fmt;

use et_config::SplittingChoice;
use et_foundation::{EtError, EtResult, RuntimeScalar};
use ndarray::{ArrayD, Dimension};
use tracing::trace;

/// 分裂方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplittingScheme {
    /// 不分裂：各轴导数求和后一起积分
    Simultaneous,
    /// 一阶顺序分裂
    Lie,
    /// 二阶对称分裂
    #[default]
    Strang,
}

impl SplittingScheme {
    /// 方案名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simultaneous => "simultaneous",
            Self::Lie => "lie",
            Self::Strang => "strang",
        }
    }

    /// 是否按顺序推进子过程
    pub fn is_sequential(&self) -> bool {
        !matches!(self, Self::Simultaneous)
    }

    /// 对 `n` 个子过程生成推进序列 `(过程下标, 起始时间偏移比例, 步长比例)`
    pub(crate) fn schedule(&self, n: usize) -> Vec<(usize, f64, f64)> {
        match self {
            Self::Simultaneous | Self::Lie => (0..n).map(|i| (i, 0.0, 1.0)).collect(),
            Self::Strang => {
                if n == 0 {
                    return Vec::new();
                }
                let mut steps: Vec<(usize, f64, f64)> = (0..n - 1).map(|i| (i, 0.0, 0.5)).collect();
                steps.push((n - 1, 0.0, 1.0));
                steps.extend((0..n - 1).rev().map(|i| (i, 0.5, 0.5)));
                steps
            }
        }
    }
}

impl From<SplittingChoice> for SplittingScheme {
    fn from(choice: SplittingChoice) -> Self {
        match choice {
            SplittingChoice::Simultaneous => Self::Simultaneous,
            SplittingChoice::Lie => Self::Lie,
            SplittingChoice::Strang => Self::Strang,
        }
    }
}

impl fmt::Display for SplittingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 可分裂推进的子过程
pub trait SplitProcess<S: RuntimeScalar>: Send + Sync {
    /// 过程名称
    fn name(&self) -> &str;

    /// 从 `t` 推进 `dt`
    ///
    /// 失败时 `field` 可能已被部分修改，由调用方决定是否回滚。
    fn advance(&self, field: &mut ArrayD<S>, t: f64, dt: f64) -> EtResult<()>;
}

/// 逐点源项 `dϕ/dt = r(index, ϕ, t)`
///
/// 速率函数接收完整多重索引与当前值，可表示排放、一阶衰减等过程。
/// 使用前向欧拉推进。
pub struct SourceProcess<F> {
    name: String,
    rate: F,
}

impl<F> SourceProcess<F> {
    /// 创建源项
    pub fn new(name: impl Into<String>, rate: F) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }
}

impl<S, F> SplitProcess<S> for SourceProcess<F>
where
    S: RuntimeScalar,
    F: Fn(&[usize], S, f64) -> EtResult<S> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn advance(&self, field: &mut ArrayD<S>, t: f64, dt: f64) -> EtResult<()> {
        let h = S::from_config(dt);
        let mut rates = Vec::with_capacity(field.len());
        for (index, &value) in field.indexed_iter() {
            rates.push((self.rate)(index.slice(), value, t)?);
        }
        for (v, r) in field.iter_mut().zip(rates) {
            *v += h * r;
        }
        Ok(())
    }
}

/// 分裂驱动器
///
/// 默认使用 Strang 对称顺序；整步在副本上推进，全部成功后才写回。
pub struct StrangSplitter<S: RuntimeScalar> {
    processes: Vec<Box<dyn SplitProcess<S>>>,
    scheme: SplittingScheme,
}

impl<S: RuntimeScalar> StrangSplitter<S> {
    /// 创建空驱动器
    pub fn new() -> Self {
        Self {
            processes: Vec::new(),
            scheme: SplittingScheme::Strang,
        }
    }

    /// 追加子过程
    pub fn with_process(mut self, process: impl SplitProcess<S> + 'static) -> Self {
        self.processes.push(Box::new(process));
        self
    }

    /// 设置分裂方案，只接受顺序方案
    pub fn with_scheme(mut self, scheme: SplittingScheme) -> EtResult<Self> {
        if !scheme.is_sequential() {
            return Err(EtError::config(format!(
                "分裂驱动器不支持方案 {scheme}，请使用 lie 或 strang"
            )));
        }
        self.scheme = scheme;
        Ok(self)
    }

    /// 当前方案
    pub fn scheme(&self) -> SplittingScheme {
        self.scheme
    }

    /// 子过程数量
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// 是否没有子过程
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// 推进一个完整时间步
    pub fn step(&self, field: &mut ArrayD<S>, t: f64, dt: f64) -> EtResult<()> {
        let mut work = field.clone();
        for (i, offset, fraction) in self.scheme.schedule(self.processes.len()) {
            let process = &self.processes[i];
            trace!(process = process.name(), fraction, "分裂子步");
            process.advance(&mut work, t + offset * dt, fraction * dt)?;
        }
        *field = work;
        Ok(())
    }
}

impl<S: RuntimeScalar> Default for StrangSplitter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RuntimeScalar> SplitProcess<S> for StrangSplitter<S> {
    fn name(&self) -> &str {
        "splitter"
    }

    fn advance(&self, field: &mut ArrayD<S>, t: f64, dt: f64) -> EtResult<()> {
        self.step(field, t, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;
    use std::sync::Mutex;

    /// 记录调用顺序
    struct Recorder {
        name: &'static str,
        log: std::sync::Arc<Mutex<Vec<(&'static str, f64, f64)>>>,
    }

    impl SplitProcess<f64> for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn advance(&self, _field: &mut ArrayD<f64>, t: f64, dt: f64) -> EtResult<()> {
            self.log.lock().unwrap().push((self.name, t, dt));
            Ok(())
        }
    }

    #[test]
    fn test_strang_schedule() {
        let steps = SplittingScheme::Strang.schedule(3);
        assert_eq!(
            steps,
            vec![(0, 0.0, 0.5), (1, 0.0, 0.5), (2, 0.0, 1.0), (1, 0.5, 0.5), (0, 0.5, 0.5)]
        );
        assert_eq!(SplittingScheme::Strang.schedule(1), vec![(0, 0.0, 1.0)]);
        assert_eq!(SplittingScheme::Lie.schedule(2), vec![(0, 0.0, 1.0), (1, 0.0, 1.0)]);
    }

    #[test]
    fn test_strang_order_and_times() {
        let log = std::sync::Arc::new(Mutex::new(Vec::new()));
        let splitter = StrangSplitter::new()
            .with_process(Recorder { name: "a", log: log.clone() })
            .with_process(Recorder { name: "b", log: log.clone() });
        let mut field = ArrayD::<f64>::zeros(IxDyn(&[2]));
        splitter.step(&mut field, 10.0, 2.0).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", 10.0, 1.0), ("b", 10.0, 2.0), ("a", 11.0, 1.0)]
        );
    }

    #[test]
    fn test_source_process_emission_and_decay() {
        let source = SourceProcess::new("emission", |index: &[usize], value: f64, _t: f64| -> EtResult<f64> {
            Ok(if index[0] == 1 { 2.0 } else { -value })
        });
        let mut field = ArrayD::from_elem(IxDyn(&[3]), 1.0);
        source.advance(&mut field, 0.0, 0.5).unwrap();
        assert_eq!(field.as_slice().unwrap(), &[0.5, 2.0, 0.5]);
    }

    #[test]
    fn test_failed_step_leaves_field_untouched() {
        let failing = SourceProcess::new("bad", |index: &[usize], _value: f64, _t: f64| -> EtResult<f64> {
            if index[0] == 2 {
                Err(EtError::provider("bad", "缺失排放清单"))
            } else {
                Ok(1.0)
            }
        });
        let growth = SourceProcess::new("growth", |_: &[usize], _value: f64, _t: f64| -> EtResult<f64> { Ok(1.0) });
        let splitter = StrangSplitter::new().with_process(growth).with_process(failing);
        let mut field = ArrayD::from_elem(IxDyn(&[3]), 1.0);
        assert!(splitter.step(&mut field, 0.0, 1.0).is_err());
        assert!(field.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_simultaneous_rejected() {
        let splitter = StrangSplitter::<f64>::new();
        assert!(splitter.with_scheme(SplittingScheme::Simultaneous).is_err());
        let splitter = StrangSplitter::<f64>::new().with_scheme(SplittingScheme::Lie).unwrap();
        assert_eq!(splitter.scheme(), SplittingScheme::Lie);
    }
}
