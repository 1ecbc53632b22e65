//! Still-image export and import for caption previews.

use std::path::Path;

use image::RgbaImage;
use reel_core::{FrameBuffer, ReelError, ReelResult};

/// Save a frame as an image; the format follows the file extension.
pub fn save_image(fb: &FrameBuffer, path: &Path) -> ReelResult<()> {
    let img = RgbaImage::from_raw(fb.width, fb.height, fb.data.clone()).ok_or_else(|| {
        ReelError::Render(format!(
            "frame buffer holds {} bytes, too few for {}x{}",
            fb.data.len(),
            fb.width,
            fb.height
        ))
    })?;
    img.save(path).map_err(|e| {
        ReelError::Render(format!("failed to save image '{}': {}", path.display(), e))
    })
}

/// Load an image file into a frame buffer.
pub fn load_image(path: &Path) -> ReelResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        ReelError::Render(format!("failed to load image '{}': {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut fb = FrameBuffer::new(width, height);
    fb.data = rgba.into_raw();
    Ok(fb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_roundtrip_keeps_alpha() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set_pixel(0, 0, [255, 75, 75, 255]);
        fb.set_pixel(2, 1, [10, 20, 30, 128]);

        let path = std::env::temp_dir().join(format!("reel-preview-{}.png", std::process::id()));
        save_image(&fb, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, fb);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_image(Path::new("/nonexistent/image.png")).is_err());
    }

    #[test]
    fn test_save_to_missing_dir_fails() {
        let fb = FrameBuffer::new(1, 1);
        assert!(save_image(&fb, Path::new("/nonexistent/dir/out.png")).is_err());
    }
}
