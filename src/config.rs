use serde::{Deserialize, Serialize};

use crate::error::EditorResult;
use crate::ops::adjust::DEFAULT_CLIP_FRACTION;

/// Tunables for an editor session.
///
/// Every field has a default, so a partial JSON document only overrides the
/// keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Offset of a newly pasted floating item from the image origin
    pub paste_offset: [f32; 2],
    /// Undo depth enforced when a resize is pushed
    pub resize_history_limit: usize,
    /// RGBA colour left behind by a cut
    pub cut_fill: [u8; 4],
    pub handle_size_min: f32,
    pub handle_size_max: f32,
    pub pen_width_min: f32,
    pub pen_width_max: f32,
    /// Seconds between two marquee dash steps
    pub marquee_interval: f32,
    pub autobalance_clip: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            paste_offset: [10.0, 10.0],
            resize_history_limit: 10,
            cut_fill: [255, 255, 255, 255],
            handle_size_min: 12.0,
            handle_size_max: 30.0,
            pen_width_min: 2.0,
            pen_width_max: 5.0,
            marquee_interval: 0.1,
            autobalance_clip: DEFAULT_CLIP_FRACTION,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        log::debug!("Loaded editor config: {:?}", config);
        Ok(config)
    }

    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn paste_offset(&self) -> egui::Vec2 {
        egui::vec2(self.paste_offset[0], self.paste_offset[1])
    }

    pub fn cut_fill(&self) -> image::Rgba<u8> {
        image::Rgba(self.cut_fill)
    }

    /// Side of a resize handle for an image whose larger side is `extent`.
    pub fn handle_size(&self, extent: u32) -> f32 {
        ((extent / 150) as f32).clamp(self.handle_size_min, self.handle_size_max)
    }

    /// Marquee pen width for an image whose larger side is `extent`.
    pub fn pen_width(&self, extent: u32) -> f32 {
        ((extent / 1000) as f32).clamp(self.pen_width_min, self.pen_width_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "resize_history_limit": 3 }"#).unwrap();
        assert_eq!(config.resize_history_limit, 3);
        assert_eq!(config.paste_offset, [10.0, 10.0]);
        assert_eq!(config.cut_fill, [255, 255, 255, 255]);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = EditorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::error::EditorError::Config(_)));
    }

    #[test]
    fn test_overlay_metrics_scale_with_extent() {
        let config = EditorConfig::default();
        assert_eq!(config.handle_size(100), 12.0);
        assert_eq!(config.handle_size(3000), 20.0);
        assert_eq!(config.handle_size(9000), 30.0);
        assert_eq!(config.pen_width(1000), 2.0);
        assert_eq!(config.pen_width(4500), 4.0);
        assert_eq!(config.pen_width(20000), 5.0);
    }
}
