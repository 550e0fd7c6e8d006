//! 标注数据模型.
//!
//! Scan/Label/Selection 记录由上层存储层提供, 本库将其视作只读输入,
//! 绝不回写. 标识符采用 newtype 包装以避免跨种类混用.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RASTER_SIZE;

mod expand;

pub use expand::interpolate_selections;

/// 扫描 (一次 3D 医学成像) 的唯一标识.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanId(String);

impl ScanId {
    /// 构建扫描标识.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 以字符串形式查看.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 标注 (一个用户在一次扫描上圈画的一组矩形) 的唯一标识.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelId(String);

impl LabelId {
    /// 构建标注标识.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 以字符串形式查看.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 用户在单个切片上圈画的一个矩形.
///
/// 四个几何字段均以切片宽/高为单位归一化到 `[0, 1]`;
/// `slice_index` 是相对扫描的整数切片索引. 该结构是不可变输入.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Selection {
    /// 左上角横坐标.
    pub position_x: f64,

    /// 左上角纵坐标.
    pub position_y: f64,

    /// 矩形宽.
    pub shape_width: f64,

    /// 矩形高.
    pub shape_height: f64,

    /// 所在切片索引.
    pub slice_index: i64,
}

/// 插值派生出的逐切片矩形. 不持久化, 仅在栅格化期间短暂存在.
///
/// 坐标与 [`Selection`] 同为归一化值; 首末标注所覆盖的切片区间内
/// 每个整数索引恰好派生一个该结构.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterpolatedSelection {
    /// 左上角横坐标.
    pub x: f64,

    /// 左上角纵坐标.
    pub y: f64,

    /// 矩形宽.
    pub width: f64,

    /// 矩形高.
    pub height: f64,

    /// 所在切片索引.
    pub slice_index: i64,
}

/// 一个用户为标记扫描内某 3D 区域而圈画的全部矩形.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Label {
    id: LabelId,
    selections: Vec<Selection>,
}

impl Label {
    /// 构建标注. `selections` 不要求有序, 展开时会自动排序.
    #[inline]
    pub fn new(id: LabelId, selections: Vec<Selection>) -> Self {
        Self { id, selections }
    }

    /// 标注标识.
    #[inline]
    pub fn id(&self) -> &LabelId {
        &self.id
    }

    /// 圈画的矩形集合.
    #[inline]
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }
}

/// 扫描的体素几何: 声明的切片个数与输出掩膜的水平分辨率.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanGeometry {
    /// 声明的切片个数.
    pub slices: usize,

    /// 输出掩膜宽 (X 方向像素数).
    pub size_x: usize,

    /// 输出掩膜高 (Y 方向像素数).
    pub size_y: usize,
}

impl ScanGeometry {
    /// 以默认 512 × 512 水平分辨率构建.
    #[inline]
    pub fn new(slices: usize) -> Self {
        Self {
            slices,
            size_x: DEFAULT_RASTER_SIZE,
            size_y: DEFAULT_RASTER_SIZE,
        }
    }

    /// 指定水平分辨率构建.
    #[inline]
    pub fn with_raster(slices: usize, size_x: usize, size_y: usize) -> Self {
        Self {
            slices,
            size_x,
            size_y,
        }
    }

    /// 掩膜形状, 按 `(z, H, W)` 模式访问.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.slices, self.size_y, self.size_x)
    }
}
