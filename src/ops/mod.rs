pub mod adjust;
pub mod geometry;

pub use adjust::{AdjustmentParams, apply_adjustments, auto_balance, channel_bounds};
pub use geometry::{TransformKind, fit_within, flip, resize, rotate};
