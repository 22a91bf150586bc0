use std::sync::Arc;

use kurbo::Shape;

use crate::{
    assets::{color::Rgba8, decode::PreparedImage},
    foundation::{
        core::{Affine, Point, Vec2},
        error::{MagicWishError, MagicWishResult},
    },
    render::painter::{
        affine_to_cpu, bezpath_to_cpu, image_premul_bytes_to_pixmap, paint_color, sample_gradient,
    },
};

/// Side of the sprite radial fills are stretched from.
const SPRITE_SIDE: u32 = 128;
/// Samples in a linear ramp.
const RAMP_LEN: u32 = 256;

/// Immediate-mode drawing onto an opaque offscreen canvas, for generated artwork.
///
/// Shapes are filled with `vello_cpu`; gradients are small premultiplied pixmaps stretched into
/// place, the same way frame gradients are painted.
pub(crate) struct Artwork {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl Artwork {
    /// Canvas of `width`x`height` filled with the opaque version of `base`.
    pub(crate) fn new(width: u32, height: u32, base: Rgba8) -> MagicWishResult<Self> {
        let side = |v: u32, name: &str| -> MagicWishResult<u16> {
            u16::try_from(v)
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    MagicWishError::validation(format!("artwork {name} must be in 1..=65535"))
                })
        };
        let (w, h) = (side(width, "width")?, side(height, "height")?);
        let mut art = Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
        };
        art.fill(Rgba8 { a: 255, ..base });
        Ok(art)
    }

    pub(crate) fn width(&self) -> f64 {
        f64::from(self.width)
    }

    pub(crate) fn height(&self) -> f64 {
        f64::from(self.height)
    }

    fn full_rect(&self) -> vello_cpu::kurbo::Rect {
        vello_cpu::kurbo::Rect::new(0.0, 0.0, self.width(), self.height())
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Cover the whole canvas with `color`.
    pub(crate) fn fill(&mut self, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.reset_transforms();
        self.ctx.set_paint(paint_color(color));
        let rect = self.full_rect();
        self.ctx.fill_rect(&rect);
    }

    /// Antialiased filled circle; radii below half a pixel are widened to it.
    pub(crate) fn disc(&mut self, center: Point, radius: f64, color: Rgba8) {
        if color.a == 0 || !radius.is_finite() {
            return;
        }
        self.reset_transforms();
        let path = kurbo::Circle::new(center, radius.max(0.5)).to_path(0.1);
        self.ctx.set_paint(paint_color(color));
        self.ctx.fill_path(&bezpath_to_cpu(&path));
    }

    /// Soft spot fading linearly from `color` at the centre to transparent at `radius`.
    pub(crate) fn glow(&mut self, center: Point, radius: f64, color: Rgba8) -> MagicWishResult<()> {
        self.radial(center, radius, &[(0.0, color), (1.0, color.fade(0.0))])
    }

    /// Radial gradient over the disc of `radius`; outside it the canvas is left untouched.
    pub(crate) fn radial(
        &mut self,
        center: Point,
        radius: f64,
        stops: &[(f64, Rgba8)],
    ) -> MagicWishResult<()> {
        if stops.is_empty() || !(radius > 0.0) {
            return Ok(());
        }
        let pixmap = radial_sprite(stops)?;
        let n = f64::from(SPRITE_SIDE);
        self.reset_transforms();
        self.ctx.set_transform(affine_to_cpu(
            Affine::translate(center.to_vec2() - Vec2::new(radius, radius))
                * Affine::scale(2.0 * radius / n),
        ));
        self.ctx.set_paint(image_paint(pixmap));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, n, n));
        Ok(())
    }

    /// Linear gradient along `from -> to`, padded with the end stops on either side.
    pub(crate) fn linear(
        &mut self,
        from: Point,
        to: Point,
        stops: &[(f64, Rgba8)],
    ) -> MagicWishResult<()> {
        let (Some(&(_, first)), Some(&(_, last))) = (stops.first(), stops.last()) else {
            return Ok(());
        };
        self.fill(first);
        let axis = to - from;
        let len = axis.hypot();
        if !(len > 0.0) {
            return Ok(());
        }

        let ramp = f64::from(RAMP_LEN);
        let reach = self.width() + self.height();
        // Local x runs along the axis in ramp samples; local y spans the canvas diagonal.
        let band = Affine::translate(from.to_vec2())
            * Affine::rotate(axis.y.atan2(axis.x))
            * Affine::scale_non_uniform(len / ramp, 2.0 * reach)
            * Affine::translate((0.0, -0.5));

        self.reset_transforms();
        self.ctx.set_transform(affine_to_cpu(band));
        self.ctx.set_paint(image_paint(ramp_pixmap(stops)?));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, ramp, 1.0));

        self.ctx.set_paint(paint_color(last));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            ramp,
            0.0,
            ramp * (1.0 + reach / len) + 1.0,
            1.0,
        ));
        Ok(())
    }

    /// Rasterize everything drawn so far.
    pub(crate) fn finish(mut self) -> MagicWishResult<PreparedImage> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        PreparedImage::from_premul(
            u32::from(self.width),
            u32::from(self.height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

fn ramp_pixmap(stops: &[(f64, Rgba8)]) -> MagicWishResult<vello_cpu::Pixmap> {
    let mut bytes = Vec::with_capacity(RAMP_LEN as usize * 4);
    for i in 0..RAMP_LEN {
        let t = (f64::from(i) + 0.5) / f64::from(RAMP_LEN);
        bytes.extend_from_slice(&sample_gradient(stops, t).to_premul());
    }
    image_premul_bytes_to_pixmap(&bytes, RAMP_LEN, 1)
}

fn radial_sprite(stops: &[(f64, Rgba8)]) -> MagicWishResult<vello_cpu::Pixmap> {
    let n = SPRITE_SIDE as usize;
    let half = f64::from(SPRITE_SIDE) / 2.0;
    let mut bytes = vec![0u8; n * n * 4];
    for (i, px) in bytes.chunks_exact_mut(4).enumerate() {
        let (x, y) = ((i % n) as f64 + 0.5, (i / n) as f64 + 0.5);
        let d = (x - half).hypot(y - half) / half;
        // One sprite pixel of antialiasing at the rim.
        let coverage = ((1.0 - d) * half + 0.5).clamp(0.0, 1.0);
        if coverage > 0.0 {
            px.copy_from_slice(&sample_gradient(stops, d).fade(coverage).to_premul());
        }
    }
    image_premul_bytes_to_pixmap(&bytes, SPRITE_SIDE, SPRITE_SIDE)
}

#[cfg(test)]
#[path = "../../tests/unit/render/artwork.rs"]
mod tests;
