//! 标注一致性评估.
//!
//! 以若干标注掩膜的体素级均值为共识 (consensus) 掩膜, 计算整体
//! agreement ratio 与每个标注相对共识的 similarity.
//!
//! 历史实现中同时存在过多套互不兼容的公式, 本模块只保留一套并以此为
//! 对外契约 (详见各函数文档):
//!
//! - `agreement_ratio = Σ combined / count_nonzero(combined)`, 值域 `[0, 1]`;
//! - `similarity = 1 − |Σ combined − Σ own| / Σ combined`, 名义值域 `[0, 1]`;
//! - 共识标注子集为空或不匹配任何标注时, 一律退化为 "使用全部标注".

use log::debug;
use ndarray::{Array3, Axis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mask::{label_mask, MeanAccumulator};
use crate::{Label, LabelId, MaskResult, ScanGeometry, ScanId};

/// 单个标注相对共识掩膜的相似度记录.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimilarityEntry {
    /// 标注标识.
    pub label_id: LabelId,

    /// 该标注是否参与了共识掩膜的生成.
    pub used_for_generation: bool,

    /// 相似度, 名义值域 `[0, 1]`. 共识掩膜体素和为零时为 `None`.
    ///
    /// 当标注体积与共识体积相差超过共识体积本身时该值为负,
    /// 按原样报告, 不做钳制.
    pub similarity: Option<f64>,
}

/// 一次一致性评估的完整输出.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgreementReport {
    /// 被评估的扫描.
    pub scan_id: ScanId,

    /// 整体一致度, 值域 `[0, 1]`. 共识掩膜无非零体素时为 `None`.
    pub agreement_ratio: Option<f64>,

    /// 共识掩膜首个含非零体素的切片索引.
    pub label_start: Option<usize>,

    /// 共识掩膜最后一个含非零体素的切片索引.
    pub label_end: Option<usize>,

    /// 扫描上全部标注的相似度记录 (含未参与共识生成的标注), 顺序与输入一致.
    pub labels_similarities: Vec<SimilarityEntry>,
}

/// 对一次扫描的全部标注计算一致性报告.
///
/// `consensus_ids` 指定参与共识掩膜生成的标注子集; 子集为空或不匹配
/// 任何标注时使用全部标注. 共识掩膜是子集内掩膜的非归一化均值,
/// 整体一致度为其非零体素的平均票值:
/// `agreement_ratio = Σ combined / count_nonzero(combined)`.
/// 每个标注 (无论是否参与生成) 的相似度为
/// `1 − |Σ combined − Σ own| / Σ combined`.
///
/// 没有任何标注的扫描产生空报告 (`agreement_ratio` 为 `None`,
/// 相似度列表为空).
///
/// # 错误
///
/// 任何标注的展开/栅格化错误原样向上传播, 见 [`crate::mask::label_mask`].
pub fn agreement_report(
    scan_id: ScanId,
    geom: &ScanGeometry,
    labels: &[Label],
    consensus_ids: &[LabelId],
) -> MaskResult<AgreementReport> {
    if labels.is_empty() {
        return Ok(AgreementReport {
            scan_id,
            agreement_ratio: None,
            label_start: None,
            label_end: None,
            labels_similarities: vec![],
        });
    }

    let use_all =
        consensus_ids.is_empty() || !labels.iter().any(|l| consensus_ids.contains(l.id()));
    let used: Vec<bool> = labels
        .iter()
        .map(|l| use_all || consensus_ids.contains(l.id()))
        .collect();
    debug!(
        "扫描 {scan_id}: {} 个标注, 其中 {} 个参与共识生成",
        labels.len(),
        used.iter().filter(|&&u| u).count()
    );

    // 逐标注栅格化后立即折叠为体素和; 只有参与共识的掩膜进入均值累加器,
    // 任何时刻最多同时持有一个标注掩膜与一份累加体积.
    let mut mean = MeanAccumulator::new();
    let mut own_sums = Vec::with_capacity(labels.len());
    for (label, &u) in labels.iter().zip(&used) {
        let mask = label_mask(label, geom)?;
        own_sums.push(mask.fold(0.0, |acc, &v| acc + f64::from(v)));
        if u {
            mean.push(&mask);
        }
    }
    let combined = mean.finish().expect("至少有一个标注参与共识生成");

    let total: f64 = combined.sum();
    let voting = combined.iter().filter(|&&v| v != 0.0).count();
    let agreement_ratio = (voting > 0).then(|| total / voting as f64);
    let (label_start, label_end) = nonzero_slice_span(&combined);

    let labels_similarities = labels
        .iter()
        .zip(&own_sums)
        .zip(&used)
        .map(|((label, &own), &used_for_generation)| SimilarityEntry {
            label_id: label.id().clone(),
            used_for_generation,
            similarity: (total > 0.0).then(|| 1.0 - (total - own).abs() / total),
        })
        .collect();

    Ok(AgreementReport {
        scan_id,
        agreement_ratio,
        label_start,
        label_end,
        labels_similarities,
    })
}

/// 共识掩膜中含非零体素的切片区间 `[start, end]`.
fn nonzero_slice_span(combined: &Array3<f64>) -> (Option<usize>, Option<usize>) {
    let mut span = None;
    for (z, plane) in combined.axis_iter(Axis(0)).enumerate() {
        if plane.iter().any(|&v| v != 0.0) {
            let (start, _) = span.unwrap_or((z, z));
            span = Some((start, z));
        }
    }
    (span.map(|s| s.0), span.map(|s| s.1))
}
