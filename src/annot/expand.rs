//! 将稀疏标注展开为逐切片矩形序列.
//!
//! 矩形的四条边 (左、右、上、下) 各自构成一条 `(值, 切片索引)`
//! 控制点序列, 独立插值后再拼合.

use itertools::izip;

use crate::interp::per_slice_values;
use crate::{InterpolatedSelection, MaskResult, Selection};

/// 将一个标注的矩形集合展开为首末切片之间逐切片的插值矩形.
///
/// 输出按切片索引升序, 在 `[min, max]` 闭区间内每个整数索引恰好一项,
/// 无空洞; 首末两项精确复原对应的原始矩形.
///
/// # 错误
///
/// 插值的前置条件违例 (标注少于 4 个、全部位于同一切片、
/// 切片索引重复) 原样向上传播, 见 [`crate::interp::per_slice_values`].
pub fn interpolate_selections(
    selections: &[Selection],
) -> MaskResult<Vec<InterpolatedSelection>> {
    let mut sorted: Vec<Selection> = selections.to_vec();
    sorted.sort_by_key(|s| s.slice_index);

    let left = per_slice_values(&edge_points(&sorted, |s| s.position_x))?;
    let right = per_slice_values(&edge_points(&sorted, |s| s.position_x + s.shape_width))?;
    let top = per_slice_values(&edge_points(&sorted, |s| s.position_y))?;
    let bottom = per_slice_values(&edge_points(&sorted, |s| s.position_y + s.shape_height))?;

    let first = sorted.first().expect("上游已验证非空").slice_index;
    let expanded = izip!(left, right, top, bottom)
        .enumerate()
        .map(|(i, (l, r, t, b))| InterpolatedSelection {
            x: l,
            y: t,
            width: r - l,
            height: b - t,
            slice_index: first + i as i64,
        })
        .collect();
    Ok(expanded)
}

/// 取一条边在各标注上的 `(值, 切片索引)` 控制点序列.
#[inline]
fn edge_points(sorted: &[Selection], edge: impl Fn(&Selection) -> f64) -> Vec<(f64, i64)> {
    sorted.iter().map(|s| (edge(s), s.slice_index)).collect()
}

#[cfg(test)]
mod tests {
    use super::interpolate_selections;
    use crate::{MaskError, Selection};

    fn float_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn rect(x: f64, y: f64, w: f64, h: f64, slice: i64) -> Selection {
        Selection {
            position_x: x,
            position_y: y,
            shape_width: w,
            shape_height: h,
            slice_index: slice,
        }
    }

    #[test]
    fn test_three_selections_are_not_enough() {
        // 三次样条至少需要 4 个控制点.
        let selections = [
            rect(0.0, 0.0, 1.0, 1.0, 0),
            rect(0.4, 0.4, 0.2, 0.2, 50),
            rect(0.0, 0.0, 1.0, 1.0, 100),
        ];
        assert_eq!(
            interpolate_selections(&selections),
            Err(MaskError::TooFewSelections { got: 3, needs: 4 })
        );
    }

    #[test]
    fn test_dense_contiguous_ascending() {
        let selections = [
            rect(0.1, 0.2, 0.3, 0.3, 3),
            rect(0.2, 0.3, 0.2, 0.2, 9),
            rect(0.15, 0.25, 0.25, 0.3, 17),
            rect(0.1, 0.2, 0.3, 0.3, 24),
        ];
        let expanded = interpolate_selections(&selections).unwrap();

        assert_eq!(expanded.len(), 22);
        for (i, sel) in expanded.iter().enumerate() {
            assert_eq!(sel.slice_index, 3 + i as i64);
        }
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let selections = [
            rect(0.15, 0.25, 0.25, 0.3, 17),
            rect(0.1, 0.2, 0.3, 0.3, 3),
            rect(0.1, 0.2, 0.3, 0.3, 24),
            rect(0.2, 0.3, 0.2, 0.2, 9),
        ];
        let expanded = interpolate_selections(&selections).unwrap();

        assert_eq!(expanded.len(), 22);
        assert_eq!(expanded[0].slice_index, 3);
        assert_eq!(expanded[21].slice_index, 24);
    }

    #[test]
    fn test_identical_rectangles_reproduce_exactly() {
        // 常值函数的插值仍是常值.
        let selections = [
            rect(0.2, 0.3, 0.4, 0.5, 0),
            rect(0.2, 0.3, 0.4, 0.5, 10),
            rect(0.2, 0.3, 0.4, 0.5, 25),
            rect(0.2, 0.3, 0.4, 0.5, 40),
        ];
        let expanded = interpolate_selections(&selections).unwrap();

        assert_eq!(expanded.len(), 41);
        for sel in &expanded {
            assert!(float_eq(sel.x, 0.2));
            assert!(float_eq(sel.y, 0.3));
            assert!(float_eq(sel.width, 0.4));
            assert!(float_eq(sel.height, 0.5));
        }
    }

    #[test]
    fn test_tapering_towards_the_middle() {
        // 两端全幅、中部收窄的标注: 插值在中部必须比两端窄,
        // 且首末两片精确复原原始矩形.
        let selections = [
            rect(0.0, 0.0, 1.0, 1.0, 0),
            rect(0.4, 0.4, 0.2, 0.2, 40),
            rect(0.4, 0.4, 0.2, 0.2, 60),
            rect(0.0, 0.0, 1.0, 1.0, 100),
        ];
        let expanded = interpolate_selections(&selections).unwrap();

        assert_eq!(expanded.len(), 101);

        let head = &expanded[0];
        assert!(float_eq(head.x, 0.0) && float_eq(head.y, 0.0));
        assert!(float_eq(head.width, 1.0) && float_eq(head.height, 1.0));

        let tail = &expanded[100];
        assert!(float_eq(tail.x, 0.0) && float_eq(tail.y, 0.0));
        assert!(float_eq(tail.width, 1.0) && float_eq(tail.height, 1.0));

        let middle = &expanded[50];
        assert!(middle.width < head.width);
        assert!(middle.height < head.height);
        assert!(middle.width < tail.width);
        assert!(middle.height < tail.height);
    }

    #[test]
    fn test_duplicate_slice_rejected() {
        let selections = [
            rect(0.1, 0.1, 0.2, 0.2, 0),
            rect(0.1, 0.1, 0.2, 0.2, 5),
            rect(0.3, 0.3, 0.2, 0.2, 5),
            rect(0.1, 0.1, 0.2, 0.2, 10),
        ];
        assert_eq!(
            interpolate_selections(&selections),
            Err(MaskError::DuplicateSliceIndex(5))
        );
    }
}
