//! 运行时错误.

use thiserror::Error;

/// 插值、栅格化或合并的运行时错误.
///
/// 这些错误都是确定性的输入合法性错误, 而非瞬时故障:
/// 本库不做内部重试, 由调用方负责转换为面向用户的响应.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaskError {
    /// 标注数量不足以拟合三次样条.
    ///
    /// 第一个字段代表目前已有的标注数, 第二个字段代表实际拟合需要的最少数量.
    #[error("标注数量不足: 已有 {got} 个, 拟合三次样条至少需要 {needs} 个")]
    TooFewSelections {
        /// 目前已有的标注数.
        got: usize,
        /// 实际拟合需要的最少标注数.
        needs: usize,
    },

    /// 所有标注位于同一切片, 插值域宽度为零, 采样步长无定义.
    #[error("所有标注位于切片 {0}, 插值域宽度为零")]
    DegenerateSliceRange(i64),

    /// 同一切片索引上存在多个标注. 重复标注一律视为非法输入.
    #[error("切片 {0} 上存在重复标注")]
    DuplicateSliceIndex(i64),

    /// 均值掩膜所有体素相等, min-max 归一化无定义.
    ///
    /// 字段为该均匀体积的体素值.
    #[error("均值掩膜为均匀体积 (所有体素值均为 {0}), 无法做 min-max 归一化")]
    UniformVolume(f64),
}
