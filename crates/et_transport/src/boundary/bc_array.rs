// crates/et_transport/src/boundary/bc_array.rs

//! 带幽灵单元的列视图

use et_foundation::{EtResult, RuntimeScalar};

use super::BoundaryCondition;
use crate::stencil::StencilSize;

/// 带幽灵单元的只读列视图
///
/// 内部值直接从借用切片读取，幽灵值按需由边界条件计算。
pub struct BcArray<'a, S, B: ?Sized> {
    data: &'a [S],
    bc: &'a B,
    size: StencilSize,
}

impl<'a, S, B> BcArray<'a, S, B>
where
    S: RuntimeScalar,
    B: BoundaryCondition<S> + ?Sized,
{
    /// 包装一维列，构建时校验边界条件
    pub fn new(data: &'a [S], bc: &'a B, size: StencilSize) -> EtResult<Self> {
        bc.validate(data.len(), size)?;
        Ok(Self { data, bc, size })
    }

    /// 内部单元数
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空（构建成功后恒为 false）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 取值，`i ∈ [-left, n + right)`
    #[inline]
    pub fn get(&self, i: isize) -> S {
        debug_assert!(i >= -(self.size.left as isize));
        debug_assert!(i < (self.data.len() + self.size.right) as isize);
        if i >= 0 && (i as usize) < self.data.len() {
            self.data[i as usize]
        } else {
            self.bc.ghost(self.data, i)
        }
    }

    /// 填充以 `center` 为中心的模板窗口
    ///
    /// `buf` 长度必须为 `size.window_len()`。
    #[inline]
    pub fn window(&self, center: usize, buf: &mut [S]) {
        debug_assert_eq!(buf.len(), self.size.window_len());
        let start = center as isize - self.size.left as isize;
        let n = self.data.len();
        // 窗口完全在内部时直接拷贝
        if start >= 0 && center + self.size.right < n {
            let start = start as usize;
            buf.copy_from_slice(&self.data[start..start + buf.len()]);
            return;
        }
        for (k, v) in buf.iter_mut().enumerate() {
            *v = self.get(start + k as isize);
        }
    }

    /// 展开为包含幽灵单元的向量
    pub fn to_vec(&self) -> Vec<S> {
        let left = self.size.left as isize;
        let end = (self.data.len() + self.size.right) as isize;
        (-left..end).map(|i| self.get(i)).collect()
    }
}
