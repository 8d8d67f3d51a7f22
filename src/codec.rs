//! Decoding and encoding at the file boundary.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;

use crate::error::{EditorError, EditorResult};
use crate::raster::RasterImage;

/// Decodes any supported format into RGBA8.
pub fn decode(bytes: &[u8]) -> EditorResult<RasterImage> {
    let img = image::load_from_memory(bytes)?;
    log::debug!("Decoded image: {}x{}", img.width(), img.height());
    Ok(img.to_rgba8().into())
}

pub fn encode(image: &RasterImage, format: ImageFormat) -> EditorResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(image.as_rgba().clone()).to_rgb8();
            rgb.write_to(&mut Cursor::new(&mut bytes), format)?;
        }
        _ => image.as_rgba().write_to(&mut Cursor::new(&mut bytes), format)?,
    }
    log::info!("Encoded {}x{} image as {:?} ({} bytes)", image.width(), image.height(), format, bytes.len());
    Ok(bytes)
}

/// Picks an encoder from a file extension.
pub fn format_for_path(path: &Path) -> EditorResult<ImageFormat> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "bmp" => Ok(ImageFormat::Bmp),
        _ => {
            log::warn!("Unsupported image extension: {}", path.display());
            Err(EditorError::InvalidParameters(format!(
                "unsupported image file: {}",
                path.display()
            )))
        }
    }
}

/// Reads and decodes an image file.
pub fn load_file(path: &Path) -> EditorResult<RasterImage> {
    log::info!("Loading image from path: {}", path.display());
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Encodes by extension and writes the file.
pub fn save_file(image: &RasterImage, path: &Path) -> EditorResult<()> {
    let bytes = encode(image, format_for_path(path)?)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_preserves_pixels() {
        let image = RasterImage::filled(3, 2, Rgba([12, 34, 56, 78]));
        let bytes = encode(&image, ImageFormat::Png).unwrap();
        assert_eq!(decode(&bytes).unwrap(), image);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(matches!(decode(b"definitely not an image"), Err(EditorError::Image(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(format_for_path(Path::new("a/b.JPG")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(format_for_path(Path::new("scan.png")).unwrap(), ImageFormat::Png);
        assert!(format_for_path(Path::new("notes.txt")).is_err());
        assert!(format_for_path(Path::new("noext")).is_err());
    }
}
