// crates/et_transport/src/reorder.rs

//! 张量轴重排
//!
//! 将任意阶张量沿指定轴展开为一组一维列：
//!
//! - 列内元素沿扫描轴排列
//! - 列号按其余轴的行主序（原始轴顺序）编号
//! - 列数据在缓冲区中连续存储，便于逐列并行
//!
//! 正变换与逆变换互为精确逆运算，只搬移数据不做任何算术。
//!
//! # 示例
//!
//! ```
//! use et_transport::reorder::AxisReorder;
//! use ndarray::ArrayD;
//!
//! let field = ArrayD::from_shape_fn(vec![2, 3], |ix| (ix[0] * 10 + ix[1]) as f64);
//! let reorder = AxisReorder::new(&[2, 3], 0).unwrap();
//! let columns = reorder.forward(field.view()).unwrap();
//!
//! // 第 1 列对应 j = 1：[ϕ(0,1), ϕ(1,1)]
//! assert_eq!(columns.column(1), &[1.0, 11.0]);
//! assert_eq!(reorder.inverse(&columns).unwrap(), field);
//! ```

use et_foundation::{EtError, EtResult, RuntimeScalar};
use ndarray::{ArrayD, ArrayView2, ArrayViewD, IxDyn, ShapeBuilder, Zip};

/// 列连续存储的矩阵
///
/// 行对应扫描轴上的单元，列对应横向索引。
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMatrix<S> {
    data: Vec<S>,
    n_rows: usize,
    n_cols: usize,
}

impl<S: RuntimeScalar> ColumnMatrix<S> {
    /// 全零矩阵
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            data: vec![S::ZERO; n_rows * n_cols],
            n_rows,
            n_cols,
        }
    }

    /// 每列单元数
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// 列数
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// 第 `col` 列
    #[inline]
    pub fn column(&self, col: usize) -> &[S] {
        &self.data[col * self.n_rows..(col + 1) * self.n_rows]
    }

    /// 底层缓冲区
    pub fn as_slice(&self) -> &[S] {
        &self.data
    }

    /// 底层缓冲区（可变）
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        &mut self.data
    }

    /// 二维视图 `(n_rows, n_cols)`，Fortran 序
    pub fn as_array(&self) -> ArrayView2<'_, S> {
        // 形状与缓冲区长度在构建时已保证一致
        ArrayView2::from_shape((self.n_rows, self.n_cols).f(), &self.data)
            .unwrap_or_else(|_| unreachable!("ColumnMatrix 缓冲区长度与形状不一致"))
    }
}

/// 轴重排映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisReorder {
    shape: Vec<usize>,
    axis: usize,
    /// 其余轴在前、扫描轴在后
    perm: Vec<usize>,
    inverse_perm: Vec<usize>,
    /// 其余轴的长度
    transverse_shape: Vec<usize>,
}

impl AxisReorder {
    /// 创建重排映射
    ///
    /// # 错误
    /// - 轴超出张量阶数时返回 `InvalidAxis`
    /// - 存在长度为零的维度时返回 `InvalidInput`
    pub fn new(shape: &[usize], axis: usize) -> EtResult<Self> {
        EtError::check_axis(axis, shape.len())?;
        if let Some(dim) = shape.iter().position(|&n| n == 0) {
            return Err(EtError::invalid_input(format!(
                "张量形状 {shape:?} 第 {dim} 维长度为零"
            )));
        }

        let mut perm: Vec<usize> = (0..shape.len()).filter(|&d| d != axis).collect();
        perm.push(axis);
        let mut inverse_perm = vec![0; perm.len()];
        for (i, &p) in perm.iter().enumerate() {
            inverse_perm[p] = i;
        }
        let transverse_shape = perm[..perm.len() - 1].iter().map(|&d| shape[d]).collect();

        Ok(Self {
            shape: shape.to_vec(),
            axis,
            perm,
            inverse_perm,
            transverse_shape,
        })
    }

    /// 原始张量形状
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// 扫描轴
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// 每列单元数（扫描轴长度）
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.shape[self.axis]
    }

    /// 列数（其余轴长度之积）
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.transverse_shape.iter().product()
    }

    /// 其余轴的形状
    pub fn transverse_shape(&self) -> &[usize] {
        &self.transverse_shape
    }

    /// 列号对应的横向索引（按原始轴顺序，不含扫描轴）
    pub fn transverse(&self, col: usize) -> Vec<usize> {
        let mut out = vec![0; self.transverse_shape.len()];
        let mut rem = col;
        for (slot, &n) in out.iter_mut().zip(&self.transverse_shape).rev() {
            *slot = rem % n;
            rem /= n;
        }
        out
    }

    /// 横向索引对应的列号
    pub fn column_of(&self, transverse: &[usize]) -> EtResult<usize> {
        if transverse.len() != self.transverse_shape.len() {
            return Err(EtError::shape_mismatch(
                "transverse",
                vec![self.transverse_shape.len()],
                vec![transverse.len()],
            ));
        }
        let mut col = 0;
        for (&i, &n) in transverse.iter().zip(&self.transverse_shape) {
            EtError::check_index("transverse", i, n)?;
            col = col * n + i;
        }
        Ok(col)
    }

    /// 将横向索引与扫描轴位置合成为完整多重索引
    pub fn full_index(&self, transverse: &[usize], position: usize) -> Vec<usize> {
        let mut index = Vec::with_capacity(self.shape.len());
        index.extend_from_slice(&transverse[..self.axis]);
        index.push(position);
        index.extend_from_slice(&transverse[self.axis..]);
        index
    }

    /// 第 `col` 列各单元的多重索引（按扫描轴顺序）
    pub fn idx(&self, col: usize) -> Vec<Vec<usize>> {
        let transverse = self.transverse(col);
        (0..self.n_rows())
            .map(|k| self.full_index(&transverse, k))
            .collect()
    }

    fn check_field_shape(&self, actual: &[usize]) -> EtResult<()> {
        EtError::check_shape("field", &self.shape, actual)
    }

    fn check_matrix(&self, n_rows: usize, n_cols: usize) -> EtResult<()> {
        EtError::check_shape(
            "column_matrix",
            &[self.n_rows(), self.n_cols()],
            &[n_rows, n_cols],
        )
    }

    fn permuted_shape(&self) -> Vec<usize> {
        self.perm.iter().map(|&d| self.shape[d]).collect()
    }

    /// 正变换：张量 → 列矩阵
    pub fn forward<S: RuntimeScalar>(&self, field: ArrayViewD<'_, S>) -> EtResult<ColumnMatrix<S>> {
        self.check_field_shape(field.shape())?;
        let data: Vec<S> = field.permuted_axes(self.perm.clone()).iter().copied().collect();
        Ok(ColumnMatrix {
            data,
            n_rows: self.n_rows(),
            n_cols: self.n_cols(),
        })
    }

    /// 列矩阵的张量视图（原始轴顺序）
    fn matrix_view<'m, S: RuntimeScalar>(
        &self,
        matrix: &'m ColumnMatrix<S>,
    ) -> EtResult<ArrayViewD<'m, S>> {
        self.check_matrix(matrix.n_rows, matrix.n_cols)?;
        let view = ArrayViewD::from_shape(IxDyn(&self.permuted_shape()), &matrix.data)
            .map_err(|e| EtError::invalid_input(format!("列矩阵视图构建失败: {e}")))?;
        Ok(view.permuted_axes(self.inverse_perm.clone()))
    }

    /// 逆变换：列矩阵 → 张量
    pub fn inverse<S: RuntimeScalar>(&self, matrix: &ColumnMatrix<S>) -> EtResult<ArrayD<S>> {
        Ok(self.matrix_view(matrix)?.as_standard_layout().into_owned())
    }

    /// 逆变换，覆盖写入已有张量
    pub fn inverse_into<S: RuntimeScalar>(
        &self,
        matrix: &ColumnMatrix<S>,
        out: &mut ArrayD<S>,
    ) -> EtResult<()> {
        self.check_field_shape(out.shape())?;
        out.assign(&self.matrix_view(matrix)?);
        Ok(())
    }

    /// `out += scale * inverse(matrix)`
    pub fn add_scaled_into<S: RuntimeScalar>(
        &self,
        matrix: &ColumnMatrix<S>,
        scale: S,
        out: &mut ArrayD<S>,
    ) -> EtResult<()> {
        self.check_field_shape(out.shape())?;
        let view = self.matrix_view(matrix)?;
        Zip::from(out).and(&view).for_each(|o, &d| *o += scale * d);
        Ok(())
    }
}
