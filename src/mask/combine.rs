//! 多掩膜合并.

use log::debug;
use ndarray::{azip, Array3};

use crate::{Label, MaskError, MaskResult, ScanGeometry};

/// 体素级均值合并.
///
/// `masks` 是非空的同形状二值掩膜序列. 返回值为 `[0, 1]` 内的实值体积.
/// 合并按掩膜流式累加, 不会同时物化一份额外的堆叠体积.
///
/// 若 `normalize` 为 `true`, 额外做 min-max 归一化,
/// 把值域拉伸到恰好充满 `[0, 1]`.
///
/// # 错误
///
/// 要求归一化且均值体积均匀 (max == min) 时返回
/// [`MaskError::UniformVolume`].
///
/// # Panic
///
/// `masks` 为空或形状不一致时 panic.
pub fn mean_mask<'a, I>(masks: I, normalize: bool) -> MaskResult<Array3<f64>>
where
    I: IntoIterator<Item = &'a Array3<u8>>,
{
    let mut mean = MeanAccumulator::new();
    for mask in masks {
        mean.push(mask);
    }
    debug!("合并 {} 个掩膜, normalize = {normalize}", mean.count());

    let mut acc = mean.finish().expect("至少需要一个掩膜");
    if normalize {
        normalize_in_place(&mut acc)?;
    }
    Ok(acc)
}

/// 流式均值累加器: 逐个接收二值掩膜, 最终产出均值体积.
///
/// 任何时刻只持有一份累加体积, 不会把全部输入同时物化.
pub(crate) struct MeanAccumulator {
    acc: Option<Array3<f64>>,
    count: usize,
}

impl MeanAccumulator {
    #[inline]
    pub fn new() -> Self {
        Self {
            acc: None,
            count: 0,
        }
    }

    /// 已累加的掩膜个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// 累加一个掩膜. 形状与先前输入不一致时 panic.
    pub fn push(&mut self, mask: &Array3<u8>) {
        match self.acc.as_mut() {
            Some(acc) => {
                assert_eq!(mask.raw_dim(), acc.raw_dim(), "所有掩膜形状必须一致");
                azip!((a in acc, &v in mask) *a += f64::from(v));
            }
            None => self.acc = Some(mask.mapv(f64::from)),
        }
        self.count += 1;
    }

    /// 产出均值体积. 没有任何输入时返回 `None`.
    pub fn finish(self) -> Option<Array3<f64>> {
        let n = self.count as f64;
        self.acc.map(|mut acc| {
            acc.mapv_inplace(|v| v / n);
            acc
        })
    }
}

/// 为一组标注生成归一化的共同掩膜.
///
/// 先为每个标注栅格化二值掩膜, 再做均值合并与 min-max 归一化.
///
/// # 错误
///
/// 标注展开错误与 [`MaskError::UniformVolume`] 原样向上传播.
///
/// # Panic
///
/// `labels` 为空时 panic.
pub fn combined_label_mask(labels: &[Label], geom: &ScanGeometry) -> MaskResult<Array3<f64>> {
    assert!(!labels.is_empty(), "至少需要一个标注");

    let masks = super::label_masks(labels, geom)?;
    mean_mask(&masks, true)
}

/// min-max 归一化. 均匀体积无法归一化.
fn normalize_in_place(volume: &mut Array3<f64>) -> MaskResult<()> {
    let (min, max) = volume.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    if min == max {
        return Err(MaskError::UniformVolume(min));
    }
    volume.mapv_inplace(|v| (v - min) / (max - min));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{combined_label_mask, mean_mask};
    use crate::{Label, LabelId, MaskError, ScanGeometry, Selection};
    use ndarray::Array3;

    fn float_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn checkerboardish() -> Array3<u8> {
        Array3::from_shape_fn((2, 4, 4), |(z, y, x)| ((z + y + x) % 2) as u8)
    }

    #[test]
    fn test_mean_of_single_mask_is_identity() {
        let mask = checkerboardish();

        let plain = mean_mask([&mask], false).unwrap();
        assert!(plain
            .iter()
            .zip(mask.iter())
            .all(|(&m, &v)| float_eq(m, f64::from(v))));

        // 二值非均匀掩膜的 min-max 归一化也是恒等变换.
        let normalized = mean_mask([&mask], true).unwrap();
        assert_eq!(plain, normalized);
    }

    #[test]
    fn test_mean_of_two_identical_masks_is_unchanged() {
        let mask = checkerboardish();
        let mean = mean_mask([&mask, &mask], false).unwrap();

        assert!(mean
            .iter()
            .zip(mask.iter())
            .all(|(&m, &v)| float_eq(m, f64::from(v))));
    }

    #[test]
    fn test_mean_of_disjoint_masks() {
        let mut a = Array3::<u8>::zeros((1, 2, 2));
        let mut b = Array3::<u8>::zeros((1, 2, 2));
        a[(0, 0, 0)] = 1;
        b[(0, 1, 1)] = 1;

        let mean = mean_mask([&a, &b], false).unwrap();
        assert!(float_eq(mean[(0, 0, 0)], 0.5));
        assert!(float_eq(mean[(0, 1, 1)], 0.5));
        assert!(float_eq(mean[(0, 0, 1)], 0.0));
    }

    #[test]
    fn test_normalization_stretches_to_unit_range() {
        // 三票中两票: 体素值为 {0, 1/3, 2/3} 的非均匀体积.
        let mut a = Array3::<u8>::zeros((1, 2, 2));
        let mut b = Array3::<u8>::zeros((1, 2, 2));
        let c = Array3::<u8>::zeros((1, 2, 2));
        a[(0, 0, 0)] = 1;
        a[(0, 0, 1)] = 1;
        b[(0, 0, 0)] = 1;

        let normalized = mean_mask([&a, &b, &c], true).unwrap();
        let min = normalized.iter().cloned().fold(f64::MAX, f64::min);
        let max = normalized.iter().cloned().fold(f64::MIN, f64::max);
        assert!(float_eq(min, 0.0));
        assert!(float_eq(max, 1.0));
        assert!(float_eq(normalized[(0, 0, 0)], 1.0));
        assert!(float_eq(normalized[(0, 0, 1)], 0.5));
    }

    #[test]
    fn test_uniform_volume_cannot_be_normalized() {
        let zeros = Array3::<u8>::zeros((2, 2, 2));
        assert_eq!(
            mean_mask([&zeros], true),
            Err(MaskError::UniformVolume(0.0))
        );

        let ones = Array3::<u8>::ones((2, 2, 2));
        assert_eq!(mean_mask([&ones], true), Err(MaskError::UniformVolume(1.0)));

        // 不归一化时均匀体积是合法输出.
        assert!(mean_mask([&zeros], false).is_ok());
    }

    #[test]
    #[should_panic]
    fn test_shape_mismatch_panics() {
        let a = Array3::<u8>::zeros((1, 2, 2));
        let b = Array3::<u8>::zeros((1, 2, 3));
        let _ = mean_mask([&a, &b], false);
    }

    #[test]
    fn test_combined_label_mask_of_partial_rect() {
        let rect = |x: f64, w: f64, slice: i64| Selection {
            position_x: x,
            position_y: 0.0,
            shape_width: w,
            shape_height: 1.0,
            slice_index: slice,
        };
        let label = Label::new(
            LabelId::new("l-1"),
            vec![
                rect(0.0, 0.5, 0),
                rect(0.0, 0.5, 1),
                rect(0.0, 0.5, 2),
                rect(0.0, 0.5, 3),
            ],
        );
        let geom = ScanGeometry::with_raster(4, 4, 4);

        let combined = combined_label_mask(&[label], &geom).unwrap();
        // 左半 1, 右半 0; 单标注 + 归一化仍是二值体积.
        assert!(float_eq(combined[(0, 0, 0)], 1.0));
        assert!(float_eq(combined[(0, 0, 3)], 0.0));
    }
}
