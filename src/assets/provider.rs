use std::{
    f64::consts::TAU,
    path::PathBuf,
    sync::{Arc, OnceLock},
    thread::JoinHandle,
};

use anyhow::Context;

use crate::{
    assets::{
        color::Rgba8,
        decode::{PreparedImage, decode_image_fit},
    },
    foundation::{
        core::{Point, Vec2},
        error::{MagicWishError, MagicWishResult},
        rng::SeededRng,
    },
    render::artwork::Artwork,
    wish::model::{Occasion, WishSpec},
};

/// Source of the finale backdrop.
///
/// Implementations may be slow; callers run them through [`spawn_backdrop`] and poll the
/// resulting [`BackdropSlot`] instead of blocking the render loop.
pub trait ImageProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Produce an image sized exactly `width`x`height`.
    fn provide(&self, wish: &WishSpec, width: u32, height: u32) -> MagicWishResult<PreparedImage>;
}

/// Write-once readiness cell for the backdrop image.
///
/// Cloning shares the cell, so a provider thread can fill what the renderer reads.
#[derive(Clone, Debug, Default)]
pub struct BackdropSlot {
    inner: Arc<OnceLock<PreparedImage>>,
}

impl BackdropSlot {
    /// A slot that never became ready (yet).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot that is already filled.
    pub fn ready(image: PreparedImage) -> Self {
        let slot = Self::default();
        slot.fill(image);
        slot
    }

    /// `true` once an image was stored.
    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }

    /// Image, when ready.
    pub fn get(&self) -> Option<&PreparedImage> {
        self.inner.get()
    }

    /// Store the image; later fills are ignored and return `false`.
    pub fn fill(&self, image: PreparedImage) -> bool {
        self.inner.set(image).is_ok()
    }
}

/// Run `provider` on a background thread, filling the returned slot on success.
///
/// Provider failures are logged and leave the slot empty.
pub fn spawn_backdrop(
    provider: Arc<dyn ImageProvider>,
    wish: WishSpec,
    width: u32,
    height: u32,
) -> MagicWishResult<(BackdropSlot, JoinHandle<()>)> {
    let slot = BackdropSlot::empty();
    let out = slot.clone();
    let handle = std::thread::Builder::new()
        .name("magicwish-backdrop".to_owned())
        .spawn(move || match provider.provide(&wish, width, height) {
            Ok(img) => {
                tracing::debug!(provider = provider.name(), width, height, "backdrop ready");
                out.fill(img);
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "backdrop unavailable; finale continues without it");
            }
        })
        .context("spawn backdrop thread")?;
    Ok((slot, handle))
}

/// Image file on disk, cover-fitted to the surface.
#[derive(Clone, Debug)]
pub struct FileBackdrop {
    /// File to decode.
    pub path: PathBuf,
}

impl FileBackdrop {
    /// Provider for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageProvider for FileBackdrop {
    fn name(&self) -> &str {
        "file"
    }

    fn provide(&self, _wish: &WishSpec, width: u32, height: u32) -> MagicWishResult<PreparedImage> {
        let bytes = std::fs::read(&self.path)
            .map_err(|e| MagicWishError::asset(format!("read {}: {e}", self.path.display())))?;
        decode_image_fit(&bytes, width, height)
    }
}

/// Occasion-themed artwork generated from the wish seed.
///
/// Same wish and size always give the same pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProceduralBackdrop;

impl ImageProvider for ProceduralBackdrop {
    fn name(&self) -> &str {
        "procedural"
    }

    fn provide(&self, wish: &WishSpec, width: u32, height: u32) -> MagicWishResult<PreparedImage> {
        if width == 0 || height == 0 {
            return Err(MagicWishError::validation("backdrop size must be non-zero"));
        }
        let mut art = Artwork::new(width, height, wish.background())?;
        let mut rng = SeededRng::new(wish.backdrop_seed());
        paint_occasion(&mut art, &mut rng, wish.occasion, wish.highlight(), wish.background())?;
        art.finish()
    }
}

const GOLD: Rgba8 = Rgba8::rgb(255, 215, 0);

/// Palette constants are tuned for a 1024px square.
const REFERENCE_SIDE: f64 = 1024.0;

fn paint_occasion(
    art: &mut Artwork,
    rng: &mut SeededRng,
    occasion: Occasion,
    hi: Rgba8,
    bg: Rgba8,
) -> MagicWishResult<()> {
    let (w, h) = (art.width(), art.height());
    let s = w.max(h);
    let k = s / REFERENCE_SIDE;
    match occasion {
        Occasion::Birthday => {
            art.radial(
                Point::new(0.5 * w, 0.4 * h),
                0.8 * s,
                &[(0.0, Rgba8::rgb(0xff, 0xf5, 0xf8)), (0.3, hi.fade(0.53)), (0.7, hi), (1.0, bg)],
            )?;
            orbs(art, rng, 15, (50.0, 150.0), |rng| GOLD.fade(rng.range(0.0, 0.3)))?;
            for _ in 0..8 {
                let at = Point::new(rng.range(0.0, w), rng.range(0.0, 0.7 * h));
                let r = rng.range(30.0, 70.0) * k;
                art.disc(at, r, Rgba8::from_hsla(rng.range(0.0, 360.0), 0.8, 0.6, 1.0));
                art.disc(at - Vec2::new(0.2 * r, 0.3 * r), 0.2 * r, Rgba8::WHITE.fade(0.3));
            }
            sparkles(art, rng, 100, |_| Rgba8::WHITE);
            sparkles(art, rng, 60, |_| hi);
            sparkles(art, rng, 30, |rng| Rgba8::from_hsla(rng.range(0.0, 360.0), 1.0, 0.75, 1.0));
        }
        Occasion::Anniversary => {
            art.linear(
                Point::ORIGIN,
                Point::new(w, h),
                &[(0.0, bg), (0.5, hi), (1.0, Rgba8::rgb(0xff, 0x44, 0x44))],
            )?;
            art.glow(Point::new(0.5 * w, 0.5 * h), 0.6 * s, Rgba8::rgba(255, 105, 180, 77))?;
            for _ in 0..30 {
                let c = Rgba8::from_hsla(
                    350.0 + rng.range(0.0, 20.0),
                    0.8,
                    0.5 + rng.range(0.0, 0.2),
                    rng.range(0.2, 0.7),
                );
                let at = Point::new(rng.range(0.0, w), rng.range(0.0, h));
                art.disc(at, rng.range(5.0, 15.0) * k, c);
            }
            sparkles(art, rng, 60, |_| GOLD);
            sparkles(art, rng, 40, |_| Rgba8::WHITE);
            sparkles(art, rng, 20, |rng| Rgba8::from_hsla(rng.range(0.0, 360.0), 1.0, 0.7, 0.8));
        }
        Occasion::NewYear => {
            art.linear(
                Point::ORIGIN,
                Point::new(0.0, h),
                &[(0.0, Rgba8::rgb(0x00, 0x04, 0x28)), (0.5, hi), (1.0, bg)],
            )?;
            for _ in 0..200 {
                let at = Point::new(rng.range(0.0, w), rng.range(0.0, 0.7 * h));
                let a = rng.range(0.2, 1.0);
                art.disc(at, rng.range(0.5, 2.5) * k, Rgba8::WHITE.fade(a));
            }
            for _ in 0..5 {
                let center = Point::new(rng.range(0.1 * w, 0.9 * w), rng.range(0.1 * h, 0.5 * h));
                let radius = rng.range(60.0, 140.0) * k;
                let color = Rgba8::from_hsla(rng.range(30.0, 90.0), 1.0, 0.6, 1.0);
                firework(art, rng, center, radius, color)?;
            }
            orbs(art, rng, 10, (30.0, 90.0), |rng| GOLD.fade(rng.range(0.0, 0.2)))?;
            sparkles(art, rng, 100, |_| GOLD);
            sparkles(art, rng, 50, |rng| Rgba8::from_hsla(rng.range(0.0, 360.0), 1.0, 0.7, 1.0));
        }
        Occasion::Wedding => {
            art.radial(
                Point::new(0.5 * w, 0.3 * h),
                s,
                &[(0.0, Rgba8::WHITE), (0.4, hi.fade(0.27)), (0.8, hi.fade(0.13)), (1.0, bg)],
            )?;
            for _ in 0..40 {
                let c = Rgba8::from_hsla(
                    350.0 + rng.range(0.0, 20.0),
                    0.3 + rng.range(0.0, 0.2),
                    0.9 + rng.range(0.0, 0.1),
                    rng.range(0.1, 0.4),
                );
                let at = Point::new(rng.range(0.0, w), rng.range(0.0, h));
                art.disc(at, rng.range(5.0, 15.0) * k, c);
            }
            for _ in 0..50 {
                let at = Point::new(rng.range(0.0, w), rng.range(0.0, h));
                art.disc(at, rng.range(2.0, 7.0) * k, Rgba8::rgba(245, 238, 238, 200));
            }
            sparkles(art, rng, 50, |_| Rgba8::WHITE.fade(0.8));
        }
        Occasion::Graduation => {
            art.linear(
                Point::ORIGIN,
                Point::new(w, h),
                &[(0.0, bg), (0.5, hi), (1.0, Rgba8::rgb(0x1a, 0x36, 0x5d))],
            )?;
            for _ in 0..80 {
                let c = if rng.next_f64() > 0.5 {
                    Rgba8::from_hsla(45.0, 1.0, 0.5 + rng.range(0.0, 0.2), rng.range(0.3, 0.9))
                } else {
                    Rgba8::from_hsla(220.0, 0.8, 0.4 + rng.range(0.0, 0.3), rng.range(0.3, 0.9))
                };
                let at = Point::new(rng.range(0.0, w), rng.range(0.0, h));
                art.disc(at, rng.range(3.0, 10.0) * k, c);
            }
            sparkles(art, rng, 60, |_| GOLD);
            sparkles(art, rng, 40, |_| Rgba8::WHITE);
        }
        Occasion::Other => {
            let night = Rgba8::rgb(0x0f, 0x05, 0x1d);
            art.fill(night);
            art.radial(Point::new(0.3 * w, 0.3 * h), s, &[(0.0, hi), (0.6, bg), (1.0, night)])?;
            orbs(art, rng, 8, (100.0, 300.0), |rng| {
                Rgba8::from_hsla(260.0 + rng.range(0.0, 60.0), 0.8, 0.5, rng.range(0.0, 0.2))
            })?;
            for _ in 0..150 {
                let at = Point::new(rng.range(0.0, w), rng.range(0.0, h));
                let a = rng.range(0.2, 1.0);
                art.disc(at, rng.range(0.5, 2.5) * k, Rgba8::WHITE.fade(a));
            }
            orbs(art, rng, 6, (30.0, 80.0), |rng| {
                Rgba8::from_hsla(rng.range(270.0, 330.0), 1.0, 0.7, 0.5)
            })?;
            sparkles(art, rng, 80, |_| Rgba8::WHITE);
            sparkles(art, rng, 40, |_| Rgba8::rgb(0xff, 0x69, 0xb4));
            sparkles(art, rng, 50, |rng| Rgba8::from_hsla(rng.range(0.0, 360.0), 1.0, 0.75, 0.9));
        }
    }
    Ok(())
}

fn orbs(
    art: &mut Artwork,
    rng: &mut SeededRng,
    count: usize,
    (min_r, max_r): (f64, f64),
    mut color: impl FnMut(&mut SeededRng) -> Rgba8,
) -> MagicWishResult<()> {
    let k = art.width().max(art.height()) / REFERENCE_SIDE;
    for _ in 0..count {
        let at = Point::new(rng.range(0.0, art.width()), rng.range(0.0, art.height()));
        let r = rng.range(min_r, max_r) * k;
        let c = color(rng);
        art.glow(at, r, c)?;
    }
    Ok(())
}

fn sparkles(
    art: &mut Artwork,
    rng: &mut SeededRng,
    count: usize,
    mut color: impl FnMut(&mut SeededRng) -> Rgba8,
) {
    let k = art.width().max(art.height()) / REFERENCE_SIDE;
    for _ in 0..count {
        let c = color(rng);
        let at = Point::new(rng.range(0.0, art.width()), rng.range(0.0, art.height()));
        let r = rng.range(1.0, 4.0) * k;
        let a = rng.range(0.2, 1.0);
        art.disc(at, r, c.fade(a));
    }
}

fn firework(
    art: &mut Artwork,
    rng: &mut SeededRng,
    center: Point,
    radius: f64,
    color: Rgba8,
) -> MagicWishResult<()> {
    let sparks = 20 + rng.index(10);
    for i in 0..sparks {
        let dir = Vec2::from_angle(i as f64 / sparks as f64 * TAU);
        let len = radius * rng.range(0.5, 1.0);
        // Trail fades from the core outwards.
        for step in 1..=8 {
            let t = f64::from(step) / 8.0;
            art.disc(center + dir * (len * t), 1.2, color.fade(1.0 - 0.8 * t));
        }
        art.disc(center + dir * len, 2.0, color);
    }
    art.glow(center, radius * 0.3, Rgba8::WHITE.fade(0.8))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/provider.rs"]
mod tests;
