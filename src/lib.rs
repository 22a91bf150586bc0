//! Magicwish turns a date and a short message into an animated greeting.
//!
//! The date becomes a 4x4 "date-echo" magic square whose first row repeats the date
//! (`DD, MM, CC, YY`) and whose rows, columns and diagonals all share one sum. A progress-driven
//! timeline reveals the square row by row, proves the sums, then fades into a finale with the
//! wish text over a backdrop image, with particle effects on top.
//!
//! - Parse a date and [`build`] the square ([`parse_date`], [`MagicGrid`])
//! - Describe a [`WishSpec`] and a [`TimelineConfig`], then create a [`Timeline`]
//! - Paint frames with a [`Painter`] into a [`Surface`], live ([`run_live`]) or offline
//!   ([`encode_wish`] into a [`GifSink`])
//!
//! Every frame is a pure function of the wish, the configuration, the frame index and the
//! particle-pool state, so a re-render of the same index reproduces the same pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod live;
mod particles;
mod render;
mod square;
mod timeline;
mod wish;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, FrameIndex, FrameRange, Point, Rect, Vec2,
};
pub use crate::foundation::error::{MagicWishError, MagicWishResult};
pub use crate::foundation::rng::SeededRng;

pub use crate::square::builder::{MagicGrid, build, build_from_date};
pub use crate::square::date::{DateQuadruple, parse_date};

pub use crate::wish::model::{
    DEFAULT_BACKGROUND, DEFAULT_HIGHLIGHT, MAX_MESSAGE_CHARS, Occasion, WishSpec,
};

pub use crate::assets::color::Rgba8;
pub use crate::assets::decode::{PreparedImage, decode_image, decode_image_fit};
pub use crate::assets::provider::{
    BackdropSlot, FileBackdrop, ImageProvider, ProceduralBackdrop, spawn_backdrop,
};

pub use crate::timeline::config::{EffectFeatures, StageTimings, Theme, TimelineConfig, Window};
pub use crate::timeline::display::{DrawOp, FrameDescriptor, TextAlign, TextBaseline, TextRole};
pub use crate::timeline::engine::{GridLayout, Timeline};
pub use crate::timeline::stages::{
    CellState, FinaleState, GRID_DIM, ProofState, ROW_SLICE, RowPhase, RowState, finale_state,
    grid_opacity, proof_state, reveal_cell, reveal_row, reveal_visible, rows_completed,
    square_progress,
};

pub use crate::particles::pool::{Particle, ParticlePool, Physics, PoolKind};
pub use crate::particles::systems::{
    AURA_CAP, AURA_PER_STEP, CONFETTI_BURST, CRACKER_BURST, ParticleCounts, ParticleSettings,
    ParticleStep, ParticleSystems,
};

pub use crate::render::painter::Painter;
pub use crate::render::surface::{FrameRGBA, Surface};
pub use crate::render::text::{FontFace, FontSet};

pub use crate::encode::gif::{DEFAULT_GIF_SPEED, GifSink};
pub use crate::encode::pipeline::{encode, encode_wish};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};

pub use crate::live::player::LivePlayer;
pub use crate::live::runner::{
    LiveOptions, LiveReport, PngPresenter, Presenter, SharedPointer, StopHandle, run_live,
};
