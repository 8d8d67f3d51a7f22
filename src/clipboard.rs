use crate::error::EditorResult;
use crate::raster::RasterImage;

/// System clipboard boundary. Only images are exchanged.
pub trait Clipboard {
    /// The current clipboard image, if the clipboard holds one.
    fn get_image(&self) -> EditorResult<Option<RasterImage>>;
    fn set_image(&mut self, image: &RasterImage) -> EditorResult<()>;
}

/// In-process clipboard, used when no platform clipboard is wired in.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    image: Option<RasterImage>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(image: RasterImage) -> Self {
        Self { image: Some(image) }
    }

    pub fn clear(&mut self) {
        self.image = None;
    }
}

impl Clipboard for MemoryClipboard {
    fn get_image(&self) -> EditorResult<Option<RasterImage>> {
        Ok(self.image.clone())
    }

    fn set_image(&mut self, image: &RasterImage) -> EditorResult<()> {
        self.image = Some(image.clone());
        Ok(())
    }
}
