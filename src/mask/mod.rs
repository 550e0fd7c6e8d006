//! 3D 掩膜栅格化.
//!
//! 将插值后的标注转化为 `(切片数, H, W)` 形状的稠密二值体积.
//! 掩膜按需计算, 不做缓存.

use log::debug;
use ndarray::{s, Array3};

use crate::annot::interpolate_selections;
use crate::{Label, MaskResult, ScanGeometry};

mod combine;

pub use combine::{combined_label_mask, mean_mask};

pub(crate) use combine::MeanAccumulator;

/// 为单个标注生成稠密 3D 二值掩膜.
///
/// 输出形状为 `geom.shape()`, 体素值为 0 或 1. 对每个插值矩形,
/// 像素边界按 `floor(归一化坐标 × 分辨率)` 截断, 再钳制到体积范围内;
/// 超出声明切片区间的插值矩形直接跳过. 对同一标注重复调用的结果
/// 逐位一致.
///
/// # 错误
///
/// 标注展开的错误原样向上传播, 见 [`interpolate_selections`].
pub fn label_mask(label: &Label, geom: &ScanGeometry) -> MaskResult<Array3<u8>> {
    let interpolated = interpolate_selections(label.selections())?;
    debug!(
        "标注 {} 展开为 {} 个逐切片矩形, 目标形状 {:?}",
        label.id(),
        interpolated.len(),
        geom.shape()
    );

    let mut mask = Array3::<u8>::zeros(geom.shape());
    for sel in &interpolated {
        if sel.slice_index < 0 || sel.slice_index as usize >= geom.slices {
            continue;
        }
        let z = sel.slice_index as usize;
        let (x1, x2) = pixel_span(sel.x, sel.width, geom.size_x);
        let (y1, y2) = pixel_span(sel.y, sel.height, geom.size_y);
        if x1 < x2 && y1 < y2 {
            // 半开区域置位 (幂等, 非累加).
            mask.slice_mut(s![z, y1..y2, x1..x2]).fill(1);
        }
    }
    Ok(mask)
}

/// 为一组标注分别生成二值掩膜, 顺序与输入一致.
#[cfg(feature = "rayon")]
pub fn label_masks(labels: &[Label], geom: &ScanGeometry) -> MaskResult<Vec<Array3<u8>>> {
    use rayon::prelude::*;

    labels.par_iter().map(|l| label_mask(l, geom)).collect()
}

/// 为一组标注分别生成二值掩膜, 顺序与输入一致.
#[cfg(not(feature = "rayon"))]
pub fn label_masks(labels: &[Label], geom: &ScanGeometry) -> MaskResult<Vec<Array3<u8>>> {
    labels.iter().map(|l| label_mask(l, geom)).collect()
}

/// 归一化矩形区间到半开像素区间 `[lo, hi)`. 越界部分钳制到 `[0, size]`.
#[inline]
fn pixel_span(start: f64, extent: f64, size: usize) -> (usize, usize) {
    let clamp = |v: f64| v.floor().clamp(0.0, size as f64) as usize;
    (clamp(start * size as f64), clamp((start + extent) * size as f64))
}
