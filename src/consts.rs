//! 通用常量.

/// 输出掩膜在水平两个方向 (宽与高) 上的默认分辨率.
pub const DEFAULT_RASTER_SIZE: usize = 512;

/// 拟合三次样条曲线 (k = 3) 所需的最少控制点个数.
pub const MIN_SPLINE_POINTS: usize = 4;
