use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{MagicWishError, MagicWishResult};

/// Decoded raster held as premultiplied RGBA8, ready for the painter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 pixels.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap already premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> MagicWishResult<Self> {
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(MagicWishError::asset(format!(
                "image buffer holds {} bytes, expected {}x{}x4",
                rgba8_premul.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Decode PNG/JPEG/... bytes without resizing.
pub fn decode_image(bytes: &[u8]) -> MagicWishResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage::from_premul(width, height, rgba8_premul)
}

/// Decode and cover-fit to `width`x`height` (scale to fill, centre crop).
pub fn decode_image_fit(bytes: &[u8], width: u32, height: u32) -> MagicWishResult<PreparedImage> {
    if width == 0 || height == 0 {
        return Err(MagicWishError::validation("target image size must be non-zero"));
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let fitted = if dyn_img.width() == width && dyn_img.height() == height {
        dyn_img
    } else {
        dyn_img.resize_to_fill(width, height, image::imageops::FilterType::Triangle)
    };
    let mut rgba8_premul = fitted.to_rgba8().into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage::from_premul(width, height, rgba8_premul)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
