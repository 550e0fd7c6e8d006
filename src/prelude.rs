//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::annot::{
    interpolate_selections, InterpolatedSelection, Label, LabelId, ScanGeometry, ScanId,
    Selection,
};

pub use crate::consensus::{agreement_report, AgreementReport, SimilarityEntry};

pub use crate::consts::{DEFAULT_RASTER_SIZE, MIN_SPLINE_POINTS};

pub use crate::interp::per_slice_values;
pub use crate::mask::{combined_label_mask, label_mask, label_masks, mean_mask};

pub use crate::{MaskError, MaskResult};
