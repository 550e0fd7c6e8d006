#![warn(missing_docs)]
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 将 3D 医学扫描上稀疏的逐切片 2D 矩形标注插值为稠密 3D 掩膜,
//! 并对多个用户的独立标注计算一致性 (consensus) 评分.
//!
//! 该 crate 是纯计算库: 无共享可变状态, 无阻塞 I/O, 每次调用彼此独立,
//! 可以自由并行. 持久化、鉴权与 HTTP 语义均由上层调用方负责,
//! 本库只消费 Scan/Label/Selection 值并产出数组与报告记录.
//!
//! # 注意
//!
//! 1. 输入合法性错误 (标注数不足、插值域退化等) 以 [`MaskError`]
//!    同步返回给调用方, 不会被静默吞掉; 程序性前置条件违例则直接 panic,
//!    不会导致内存错误. As what Rust promises.
//! 2. 内存开销以稠密掩膜为主: 每个掩膜为 `切片数 × size_y × size_x` 体素.
//!    合并多个标注时按标注流式累加均值, 不会把全部体积再额外堆叠一份;
//!    一致性评分逐标注栅格化并立即折叠为体素和, 任何时刻最多同时持有
//!    一个标注掩膜与一份累加体积.
//!
//! # 开发计划
//!
//! ### 参数化三次样条拟合 ✅
//!
//! 以弦长为参数, 零平滑 (精确插值). 实现位于 `src/fitting`.
//!
//! ### 边缘控制点逐切片插值 ✅
//!
//! 对每个整数切片索引取最邻近曲线采样点. 实现位于 `src/interp`.
//!
//! ### 标注展开 ✅
//!
//! 四条矩形边各自插值后拼合为逐切片矩形序列. 实现位于 `src/annot/expand.rs`.
//!
//! ### 掩膜栅格化与合并 ✅
//!
//! 二值栅格化 (像素边界显式截断与钳制), 体素级均值合并与可选 min-max 归一化.
//! 实现位于 `src/mask`.
//!
//! ### 标注一致性评分 ✅
//!
//! agreement ratio + 逐标注 similarity. 实现位于 `src/consensus`.

pub mod annot;
pub mod consensus;
pub mod consts;

mod error;

pub mod fitting;
pub mod interp;
pub mod mask;
pub mod prelude;

pub use annot::{InterpolatedSelection, Label, LabelId, ScanGeometry, ScanId, Selection};
pub use consensus::{agreement_report, AgreementReport, SimilarityEntry};
pub use error::MaskError;

/// 掩膜生成 / 一致性评估的运行时结果.
pub type MaskResult<T> = Result<T, MaskError>;
