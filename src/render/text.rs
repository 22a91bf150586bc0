use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    foundation::error::{MagicWishError, MagicWishResult},
    timeline::display::TextRole,
};

const ROLES: [TextRole; 4] = [
    TextRole::Body,
    TextRole::Bold,
    TextRole::Title,
    TextRole::Message,
];

/// Raw font face bytes plus the traits text layout should request.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Font file bytes (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection.
    pub index: u32,
    /// CSS weight of this face.
    pub weight: u16,
    /// Whether this face is italic/oblique.
    pub italic: bool,
}

/// Faces assigned to each [`TextRole`]. Roles without a face are skipped when painting.
#[derive(Clone, Debug, Default)]
pub struct FontSet {
    body: Option<FontFace>,
    bold: Option<FontFace>,
    title: Option<FontFace>,
    message: Option<FontFace>,
}

fn role_traits(role: TextRole) -> (u16, bool) {
    match role {
        TextRole::Body => (400, false),
        TextRole::Bold | TextRole::Title => (700, false),
        TextRole::Message => (400, true),
    }
}

impl FontSet {
    /// No faces; text ops are dropped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// One font file for every role; each role still requests its own weight and style.
    pub fn from_bytes(bytes: Vec<u8>) -> MagicWishResult<Self> {
        if bytes.is_empty() {
            return Err(MagicWishError::asset("font bytes are empty"));
        }
        let bytes = Arc::new(bytes);
        let mut set = Self::empty();
        for role in ROLES {
            let (weight, italic) = role_traits(role);
            set.set(
                role,
                FontFace {
                    bytes: bytes.clone(),
                    index: 0,
                    weight,
                    italic,
                },
            );
        }
        Ok(set)
    }

    /// One font file for every role.
    pub fn from_file(path: &Path) -> MagicWishResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Resolve each role against the system font database.
    ///
    /// The title prefers serif, the other roles sans-serif. When nothing matches, the first
    /// face in the database is used. An empty database yields an empty set.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let set = Self::from_database(&db);
        if set.is_empty() {
            tracing::warn!("no system fonts found; text will not be drawn");
        } else {
            tracing::debug!(faces = db.len(), "loaded system fonts");
        }
        set
    }

    fn from_database(db: &usvg::fontdb::Database) -> Self {
        let mut set = Self::empty();
        for role in ROLES {
            let (weight, italic) = role_traits(role);
            let families = match role {
                TextRole::Title => [
                    usvg::fontdb::Family::Serif,
                    usvg::fontdb::Family::SansSerif,
                ],
                _ => [
                    usvg::fontdb::Family::SansSerif,
                    usvg::fontdb::Family::Serif,
                ],
            };
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(weight),
                stretch: usvg::fontdb::Stretch::Normal,
                style: if italic {
                    usvg::fontdb::Style::Italic
                } else {
                    usvg::fontdb::Style::Normal
                },
            };
            let Some(id) = db.query(&query).or_else(|| db.faces().next().map(|f| f.id)) else {
                continue;
            };
            let Some(info) = db.face(id) else {
                continue;
            };
            let found_weight = info.weight.0;
            let found_italic = info.style != usvg::fontdb::Style::Normal;
            let Some((bytes, index)) = db.with_face_data(id, |data, index| (data.to_vec(), index))
            else {
                continue;
            };
            set.set(
                role,
                FontFace {
                    bytes: Arc::new(bytes),
                    index,
                    weight: found_weight,
                    italic: found_italic,
                },
            );
        }
        set.share_identical_faces();
        set
    }

    // Roles resolved to the same face share one buffer so layout registers it once.
    fn share_identical_faces(&mut self) {
        let mut seen: Vec<FontFace> = Vec::new();
        for role in ROLES {
            let Some(face) = self.face_mut(role) else {
                continue;
            };
            if let Some(prev) = seen
                .iter()
                .find(|p| p.index == face.index && p.bytes.as_slice() == face.bytes.as_slice())
            {
                face.bytes = prev.bytes.clone();
            } else {
                seen.push(face.clone());
            }
        }
    }

    /// Override one role.
    pub fn set(&mut self, role: TextRole, face: FontFace) {
        match role {
            TextRole::Body => self.body = Some(face),
            TextRole::Bold => self.bold = Some(face),
            TextRole::Title => self.title = Some(face),
            TextRole::Message => self.message = Some(face),
        }
    }

    /// Face for `role`, if any.
    pub fn face(&self, role: TextRole) -> Option<&FontFace> {
        match role {
            TextRole::Body => self.body.as_ref(),
            TextRole::Bold => self.bold.as_ref(),
            TextRole::Title => self.title.as_ref(),
            TextRole::Message => self.message.as_ref(),
        }
    }

    fn face_mut(&mut self, role: TextRole) -> Option<&mut FontFace> {
        match role {
            TextRole::Body => self.body.as_mut(),
            TextRole::Bold => self.bold.as_mut(),
            TextRole::Title => self.title.as_mut(),
            TextRole::Message => self.message.as_mut(),
        }
    }

    /// True when no role has a face.
    pub fn is_empty(&self) -> bool {
        ROLES.iter().all(|r| self.face(*r).is_none())
    }
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

struct RegisteredFace {
    family: String,
    weight: u16,
    italic: bool,
    font: vello_cpu::peniko::FontData,
}

/// A shaped single-line text run.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
}

impl ShapedText {
    pub(crate) fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    pub(crate) fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }

    /// Baseline of the first line, measured from the layout top.
    pub(crate) fn first_baseline(&self) -> f64 {
        self.layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(0.0)
    }
}

/// Stateful Parley shaper over a [`FontSet`].
pub(crate) struct TextEngine {
    fonts: FontSet,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<TextRole, RegisteredFace>,
    families_by_blob: HashMap<usize, String>,
}

impl TextEngine {
    pub(crate) fn new(fonts: FontSet) -> Self {
        Self {
            fonts,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
            families_by_blob: HashMap::new(),
        }
    }

    pub(crate) fn has_fonts(&self) -> bool {
        !self.fonts.is_empty()
    }

    fn register(&mut self, role: TextRole) -> MagicWishResult<Option<&RegisteredFace>> {
        if !self.registered.contains_key(&role) {
            let Some(face) = self.fonts.face(role).cloned() else {
                return Ok(None);
            };
            let key = Arc::as_ptr(&face.bytes) as usize;
            let family = match self.families_by_blob.get(&key) {
                Some(name) => name.clone(),
                None => {
                    let families = self.font_ctx.collection.register_fonts(
                        parley::fontique::Blob::from(face.bytes.as_ref().clone()),
                        None,
                    );
                    let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                        MagicWishError::asset("no font families registered from font bytes")
                    })?;
                    let name = self
                        .font_ctx
                        .collection
                        .family_name(family_id)
                        .ok_or_else(|| MagicWishError::asset("registered font family has no name"))?
                        .to_string();
                    self.families_by_blob.insert(key, name.clone());
                    name
                }
            };
            let font = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                face.index,
            );
            self.registered.insert(
                role,
                RegisteredFace {
                    family,
                    weight: face.weight,
                    italic: face.italic,
                    font,
                },
            );
        }
        Ok(self.registered.get(&role))
    }

    /// Shape `text` on one line. `None` when the role has no face.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        role: TextRole,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> MagicWishResult<Option<ShapedText>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MagicWishError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(face) = self.register(role)? else {
            return Ok(None);
        };
        let family = face.family.clone();
        let weight = face.weight;
        let italic = face.italic;
        let font = face.font.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));
        if italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(Some(ShapedText { layout, font }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
