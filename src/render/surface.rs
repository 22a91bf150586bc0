use std::path::Path;

use anyhow::Context;

use crate::{
    assets::color::Rgba8,
    foundation::{
        core::Canvas,
        error::{MagicWishError, MagicWishResult},
        math::mul_div255_u16,
    },
};

/// A rendered frame in CPU memory.
///
/// Frames coming out of a [`Surface`] are **premultiplied alpha**; the flag keeps that explicit
/// at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Opaque copy with alpha flattened over `bg`.
    pub fn to_opaque_rgba8(&self, bg: Rgba8) -> MagicWishResult<Vec<u8>> {
        let mut out = vec![0u8; self.data.len()];
        flatten_to_opaque_rgba8(&mut out, &self.data, self.premultiplied, bg)?;
        Ok(out)
    }

    /// Write the frame as a PNG file.
    pub fn write_png(&self, path: &Path) -> MagicWishResult<()> {
        image::save_buffer(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Flatten RGBA8 over an opaque background.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg: Rgba8,
) -> MagicWishResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MagicWishError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg.r as u16;
    let bg_g = bg.g as u16;
    let bg_b = bg.b as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let (r, g, b) = if src_is_premul {
            (
                s[0] as u16 + mul_div255_u16(bg_r, inv),
                s[1] as u16 + mul_div255_u16(bg_g, inv),
                s[2] as u16 + mul_div255_u16(bg_b, inv),
            )
        } else {
            (
                mul_div255_u16(s[0] as u16, a) + mul_div255_u16(bg_r, inv),
                mul_div255_u16(s[1] as u16, a) + mul_div255_u16(bg_g, inv),
                mul_div255_u16(s[2] as u16, a) + mul_div255_u16(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Offscreen raster target backed by a `vello_cpu` pixmap.
///
/// Each owner (live loop, encode pass) keeps its own surface.
pub struct Surface {
    width: u16,
    height: u16,
    pub(crate) pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Transparent surface of `width`x`height`.
    pub fn new(width: u32, height: u32) -> MagicWishResult<Self> {
        Canvas::new(width, height)?;
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| MagicWishError::validation("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| MagicWishError::validation("surface height exceeds u16"))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
        })
    }

    /// Surface sized to `canvas`.
    pub fn for_canvas(canvas: Canvas) -> MagicWishResult<Self> {
        Self::new(canvas.width, canvas.height)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub(crate) fn width_u16(&self) -> u16 {
        self.width
    }

    pub(crate) fn height_u16(&self) -> u16 {
        self.height
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8) {
        let premul = color.to_premul();
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Premultiplied RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Copy the pixels out.
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
