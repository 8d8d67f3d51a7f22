//! Optional colour-conversion backends, detected once when a session starts.

use crate::error::{EditorError, EditorResult};
use crate::raster::RasterImage;

/// A colour conversion that may not be available in every build.
pub trait ColorConversion {
    fn name(&self) -> &'static str;
    fn to_grayscale(&self, image: &RasterImage) -> EditorResult<RasterImage>;
}

/// ITU-R 601 luma replicated into R, G and B. Alpha is preserved.
#[derive(Debug, Default, Clone, Copy)]
pub struct LumaConverter;

impl ColorConversion for LumaConverter {
    fn name(&self) -> &'static str {
        "luma"
    }

    fn to_grayscale(&self, image: &RasterImage) -> EditorResult<RasterImage> {
        let mut out = image.as_rgba().clone();
        for pixel in out.pixels_mut() {
            let y = crate::ops::adjust::luma(pixel[0], pixel[1], pixel[2]);
            pixel[0] = y;
            pixel[1] = y;
            pixel[2] = y;
        }
        Ok(out.into())
    }
}

/// The set of optional backends a session may use.
#[derive(Default)]
pub struct Capabilities {
    grayscale: Option<Box<dyn ColorConversion>>,
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("grayscale", &self.grayscale.as_ref().map(|c| c.name()))
            .finish()
    }
}

impl Capabilities {
    /// Backends compiled into this build.
    pub fn detect() -> Self {
        #[cfg(feature = "grayscale")]
        {
            log::info!("Grayscale conversion available");
            Self { grayscale: Some(Box::new(LumaConverter)) }
        }

        #[cfg(not(feature = "grayscale"))]
        {
            log::warn!("Grayscale conversion not compiled in");
            Self::none()
        }
    }

    pub fn none() -> Self {
        Self { grayscale: None }
    }

    pub fn with_grayscale(mut self, backend: Box<dyn ColorConversion>) -> Self {
        self.grayscale = Some(backend);
        self
    }

    pub fn has_grayscale(&self) -> bool {
        self.grayscale.is_some()
    }

    pub fn grayscale(&self) -> EditorResult<&dyn ColorConversion> {
        self.grayscale
            .as_deref()
            .ok_or(EditorError::MissingCapability("grayscale conversion"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_luma_keeps_alpha() {
        let image = RasterImage::filled(3, 3, Rgba([255, 0, 0, 128]));
        let gray = LumaConverter.to_grayscale(&image).unwrap();
        assert!(gray.is_uniform(Rgba([76, 76, 76, 128])));
    }

    #[test]
    fn test_missing_backend_reports_capability() {
        let caps = Capabilities::none();
        assert!(!caps.has_grayscale());
        assert!(matches!(caps.grayscale(), Err(EditorError::MissingCapability(_))));
    }
}
