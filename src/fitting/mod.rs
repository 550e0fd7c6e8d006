//! 曲线拟合.
//!
//! 给定一系列平面控制点, 该模块可以拟合出一条精确经过全部控制点的
//! 参数化三次样条曲线, 并在曲线上等参数距采样.

use ndarray::ArrayView1;

mod parametric;

type VecPair = (Vec<f64>, Vec<f64>);

/// 拟合参数化三次样条曲线并采样.
///
/// `x`, `y` 是控制点坐标 (至少三个, 相邻控制点不允许重合), `ticks`
/// 为整条曲线上等参数距采样点的个数 (含两端, 至少为 2).
/// 返回采样点的 `([x], [y])`. 第一个与最后一个采样点分别精确等于
/// 第一个与最后一个控制点.
pub fn parametric_cubic_spline<'a>(
    x: ArrayView1<'a, f64>,
    y: ArrayView1<'a, f64>,
    ticks: usize,
) -> VecPair {
    parametric::ParametricCurve::new(x, y).sample(ticks)
}
