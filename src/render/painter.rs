use std::{f64::consts::PI, sync::Arc};

use kurbo::Shape;

use crate::{
    assets::{color::Rgba8, decode::PreparedImage},
    foundation::{
        core::{Affine, BezPath, Point, Rect},
        error::{MagicWishError, MagicWishResult},
    },
    render::{
        surface::Surface,
        text::{FontSet, TextBrushRgba8, TextEngine},
    },
    timeline::display::{DrawOp, FrameDescriptor, TextAlign, TextBaseline, TextRole},
};

/// Executes [`FrameDescriptor`] display lists on a [`Surface`] with `vello_cpu`.
///
/// The painter keeps shaping state and a decoded backdrop paint between frames. It never touches
/// the frame's timing; the same descriptor always yields the same pixels.
pub struct Painter {
    text: TextEngine,
    backdrop_cache: Option<(usize, vello_cpu::Image)>,
    warned_missing_text: bool,
}

impl std::fmt::Debug for Painter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painter")
            .field("has_fonts", &self.text.has_fonts())
            .field("backdrop_cached", &self.backdrop_cache.is_some())
            .finish_non_exhaustive()
    }
}

impl Painter {
    /// Painter drawing text with `fonts`.
    pub fn new(fonts: &FontSet) -> Self {
        Self {
            text: TextEngine::new(fonts.clone()),
            backdrop_cache: None,
            warned_missing_text: false,
        }
    }

    /// Painter that skips every text op.
    pub fn without_text() -> Self {
        Self::new(&FontSet::empty())
    }

    /// Paint `desc` into `surface`, replacing its previous content.
    ///
    /// `backdrop` feeds [`DrawOp::Backdrop`]; those ops are skipped while it is `None`.
    pub fn paint(
        &mut self,
        surface: &mut Surface,
        desc: &FrameDescriptor,
        backdrop: Option<&PreparedImage>,
    ) -> MagicWishResult<()> {
        let width = surface.width_u16();
        let height = surface.height_u16();
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let canvas = (f64::from(width), f64::from(height));

        for op in &desc.ops {
            self.draw_op(&mut ctx, op, canvas, backdrop)?;
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);
        Ok(())
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        (w, h): (f64, f64),
        backdrop: Option<&PreparedImage>,
    ) -> MagicWishResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Clear { color } => {
                ctx.set_paint(paint_color(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            }
            DrawOp::Rect { rect, color } => {
                if color.a == 0 {
                    return Ok(());
                }
                ctx.set_paint(paint_color(*color));
                ctx.fill_rect(&rect_to_cpu(*rect));
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                if color.a == 0 {
                    return Ok(());
                }
                let Some(path) = line_path(*from, *to, *width) else {
                    return Ok(());
                };
                ctx.set_paint(paint_color(*color));
                ctx.fill_path(&bezpath_to_cpu(&path));
            }
            DrawOp::Circle {
                center,
                radius,
                color,
            } => {
                if color.a == 0 || !(*radius > 0.0) {
                    return Ok(());
                }
                let path = kurbo::Circle::new(*center, *radius).to_path(0.1);
                ctx.set_paint(paint_color(*color));
                ctx.fill_path(&bezpath_to_cpu(&path));
            }
            DrawOp::Star {
                center,
                outer,
                inner,
                points,
                rotation,
                color,
            } => {
                if color.a == 0 || *points < 2 {
                    return Ok(());
                }
                let path = star_path(*center, *outer, *inner, *points, *rotation);
                ctx.set_paint(paint_color(*color));
                ctx.fill_path(&bezpath_to_cpu(&path));
            }
            DrawOp::Text {
                text,
                role,
                size_px,
                anchor,
                align,
                baseline,
                color,
            } => {
                if color.a == 0 || text.is_empty() {
                    return Ok(());
                }
                self.draw_text(ctx, text, *role, *size_px, *anchor, *align, *baseline, *color)?;
            }
            DrawOp::Backdrop { opacity } => {
                let Some(image) = backdrop else {
                    return Ok(());
                };
                let opacity = opacity.clamp(0.0, 1.0) as f32;
                if opacity <= 0.0 {
                    return Ok(());
                }
                let paint = self.backdrop_paint(image)?;
                let (iw, ih) = (f64::from(image.width), f64::from(image.height));
                ctx.set_transform(affine_to_cpu(Affine::scale_non_uniform(w / iw, h / ih)));
                ctx.set_paint(paint);
                if opacity < 1.0 {
                    ctx.push_opacity_layer(opacity);
                }
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
                if opacity < 1.0 {
                    ctx.pop_layer();
                }
            }
            DrawOp::VerticalGradient { y0, y1, stops } => {
                let span = y1 - y0;
                if stops.is_empty() || !(span > 0.0) {
                    return Ok(());
                }
                let rows = span.round().clamp(1.0, h.max(1.0)) as u32;
                let pixmap = gradient_pixmap(stops, rows)?;
                ctx.set_transform(affine_to_cpu(
                    Affine::translate((0.0, *y0))
                        * Affine::scale_non_uniform(w, span / f64::from(rows)),
                ));
                ctx.set_paint(vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                });
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 1.0, f64::from(rows)));
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        role: TextRole,
        size_px: f64,
        anchor: Point,
        align: TextAlign,
        baseline: TextBaseline,
        color: Rgba8,
    ) -> MagicWishResult<()> {
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let Some(shaped) = self.text.shape(text, role, size_px as f32, brush)? else {
            if !self.warned_missing_text {
                tracing::warn!(?role, "no font face for text role; skipping text");
                self.warned_missing_text = true;
            }
            return Ok(());
        };

        let x = match align {
            TextAlign::Start => anchor.x,
            TextAlign::Center => anchor.x - shaped.width() / 2.0,
        };
        let y = match baseline {
            TextBaseline::Middle => anchor.y - shaped.height() / 2.0,
            TextBaseline::Alphabetic => anchor.y - shaped.first_baseline(),
        };
        ctx.set_transform(affine_to_cpu(Affine::translate((x, y))));

        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&shaped.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn backdrop_paint(&mut self, image: &PreparedImage) -> MagicWishResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&image.rgba8_premul) as usize;
        if let Some((cached, paint)) = &self.backdrop_cache
            && *cached == key
        {
            return Ok(paint.clone());
        }

        let pixmap =
            image_premul_bytes_to_pixmap(image.rgba8_premul.as_slice(), image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.backdrop_cache = Some((key, paint.clone()));
        Ok(paint)
    }
}

pub(crate) fn paint_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn line_path(from: Point, to: Point, width: f64) -> Option<BezPath> {
    let d = to - from;
    let len = d.hypot();
    if !(len > 0.0) || !(width > 0.0) {
        return None;
    }
    let n = kurbo::Vec2::new(-d.y, d.x) * (width / 2.0 / len);
    let mut path = BezPath::new();
    path.move_to(from + n);
    path.line_to(to + n);
    path.line_to(to - n);
    path.line_to(from - n);
    path.close_path();
    Some(path)
}

pub(crate) fn star_path(center: Point, outer: f64, inner: f64, points: u8, rotation: f64) -> BezPath {
    let mut path = BezPath::new();
    let steps = usize::from(points) * 2;
    for i in 0..steps {
        let r = if i % 2 == 0 { outer } else { inner };
        let a = rotation - PI / 2.0 + i as f64 * PI / f64::from(points);
        let p = Point::new(center.x + r * a.cos(), center.y + r * a.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

pub(crate) fn sample_gradient(stops: &[(f64, Rgba8)], t: f64) -> Rgba8 {
    let Some(first) = stops.first() else {
        return Rgba8::rgba(0, 0, 0, 0);
    };
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.0 {
            let span = b.0 - a.0;
            let local = if span > 0.0 { (t - a.0) / span } else { 1.0 };
            return a.1.mix(b.1, local);
        }
    }
    stops[stops.len() - 1].1
}

fn gradient_pixmap(stops: &[(f64, Rgba8)], rows: u32) -> MagicWishResult<vello_cpu::Pixmap> {
    let mut bytes = Vec::with_capacity(rows as usize * 4);
    for row in 0..rows {
        let t = (f64::from(row) + 0.5) / f64::from(rows);
        bytes.extend_from_slice(&sample_gradient(stops, t).to_premul());
    }
    image_premul_bytes_to_pixmap(&bytes, 1, rows)
}

pub(crate) fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> MagicWishResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MagicWishError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MagicWishError::validation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(MagicWishError::asset("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
