//! 边缘控制点的逐切片插值.
//!
//! 对一组 `(值, 切片索引)` 控制点拟合参数化三次样条, 并在
//! `[min, max]` 内的每个整数切片索引处取最邻近的曲线采样值.

use log::trace;
use ndarray::ArrayView1;
use ordered_float::NotNan;

use crate::consts::MIN_SPLINE_POINTS;
use crate::fitting::parametric_cubic_spline;
use crate::{MaskError, MaskResult};

/// 对 `(值, 切片索引)` 控制点做逐切片插值.
///
/// `points` 必须按切片索引升序排列 (违反时 panic, 排序由上游负责).
/// 采样步长取每单位切片域恰好一个采样点. 返回 `[min, max]`
/// 内每个整数切片索引 (含两端) 的插值, 共 `max - min + 1` 项;
/// 两端的插值分别精确等于首末控制点的值.
///
/// 纯函数: 相同输入必定产生相同输出.
///
/// # 错误
///
/// - 控制点个数不足 4 个 (三次样条的阶数约束):
///   [`MaskError::TooFewSelections`];
/// - 所有控制点位于同一切片 (插值域宽度为零):
///   [`MaskError::DegenerateSliceRange`];
/// - 部分控制点切片索引重复: [`MaskError::DuplicateSliceIndex`].
pub fn per_slice_values(points: &[(f64, i64)]) -> MaskResult<Vec<f64>> {
    assert!(
        points.windows(2).all(|w| w[0].1 <= w[1].1),
        "控制点必须按切片索引升序排列"
    );

    if points.len() < MIN_SPLINE_POINTS {
        return Err(MaskError::TooFewSelections {
            got: points.len(),
            needs: MIN_SPLINE_POINTS,
        });
    }
    let first = points.first().unwrap().1;
    let last = points.last().unwrap().1;
    if first == last {
        return Err(MaskError::DegenerateSliceRange(first));
    }
    if let Some(w) = points.windows(2).find(|w| w[0].1 == w[1].1) {
        return Err(MaskError::DuplicateSliceIndex(w[0].1));
    }

    let values: Vec<f64> = points.iter().map(|p| p.0).collect();
    let slices: Vec<f64> = points.iter().map(|p| p.1 as f64).collect();
    let range = (last - first) as usize;
    trace!("插值域 [{first}, {last}], 控制点 {} 个", points.len());

    let (sample_v, sample_s) = parametric_cubic_spline(
        ArrayView1::from(&values),
        ArrayView1::from(&slices),
        range + 1,
    );

    let mut out = Vec::with_capacity(range + 1);
    for idx in first..=last {
        // 对每个整数切片, 只取一个切片坐标最合适的曲线采样点.
        let (best, _) = sample_v
            .iter()
            .zip(&sample_s)
            .min_by_key(|&(_, s)| NotNan::new((s - idx as f64).abs()).unwrap())
            .unwrap();
        out.push(*best);
    }
    Ok(out)
}
