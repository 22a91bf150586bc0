use crate::{
    assets::color::Rgba8,
    foundation::core::{Point, Rect},
};

/// Typeface role; the painter maps each role to a concrete face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// Cell digits and labels.
    Body,
    /// Date row, sums, attribution.
    Bold,
    /// Finale title.
    Title,
    /// Finale message (italic).
    Message,
}

/// Horizontal anchoring of a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the left edge.
    Start,
    /// Anchor is the centre.
    Center,
}

/// Vertical anchoring of a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// Anchor is the vertical middle of the line box.
    Middle,
    /// Anchor is the alphabetic baseline.
    Alphabetic,
}

/// One paint instruction. Colours are straight alpha with opacity already folded in.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the whole canvas.
    Clear {
        /// Fill colour.
        color: Rgba8,
    },
    /// Axis-aligned rectangle.
    Rect {
        /// Area.
        rect: Rect,
        /// Fill colour.
        color: Rgba8,
    },
    /// Straight line segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke width in pixels.
        width: f64,
        /// Stroke colour.
        color: Rgba8,
    },
    /// Filled circle.
    Circle {
        /// Centre.
        center: Point,
        /// Radius in pixels.
        radius: f64,
        /// Fill colour.
        color: Rgba8,
    },
    /// Filled n-pointed star.
    Star {
        /// Centre.
        center: Point,
        /// Tip radius.
        outer: f64,
        /// Notch radius.
        inner: f64,
        /// Number of tips.
        points: u8,
        /// Rotation in radians.
        rotation: f64,
        /// Fill colour.
        color: Rgba8,
    },
    /// Single line of text.
    Text {
        /// Content.
        text: String,
        /// Face role.
        role: TextRole,
        /// Font size in pixels.
        size_px: f64,
        /// Anchor point.
        anchor: Point,
        /// Horizontal anchoring.
        align: TextAlign,
        /// Vertical anchoring.
        baseline: TextBaseline,
        /// Fill colour.
        color: Rgba8,
    },
    /// The finale backdrop stretched over the canvas.
    Backdrop {
        /// Opacity in `[0, 1]`.
        opacity: f64,
    },
    /// Full-width vertical gradient between `y0` and `y1`; stops clamp outside.
    VerticalGradient {
        /// Gradient start row.
        y0: f64,
        /// Gradient end row.
        y1: f64,
        /// `(offset, colour)` stops with increasing offsets.
        stops: Vec<(f64, Rgba8)>,
    },
}

/// Fully specified visual output for one progress value.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameDescriptor {
    /// Progress this frame was described at.
    pub progress: f64,
    /// Paint instructions in back-to-front order.
    pub ops: Vec<DrawOp>,
}

impl FrameDescriptor {
    /// Text runs in paint order, mostly for inspection.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
