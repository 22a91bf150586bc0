use crate::{
    assets::color::Rgba8,
    foundation::error::{MagicWishError, MagicWishResult},
    foundation::math::Fnv1a64,
    square::date::{DateQuadruple, parse_date},
};

/// Longest accepted wish message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 200;

/// Highlight colour used when a wish does not carry one.
pub const DEFAULT_HIGHLIGHT: Rgba8 = Rgba8::rgb(0xff, 0x6b, 0x6b);
/// Background colour used when a wish does not carry one.
pub const DEFAULT_BACKGROUND: Rgba8 = Rgba8::rgb(0x0a, 0x0a, 0x0f);

/// Occasion tag selecting the greeting and the backdrop palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    /// Birthday.
    #[default]
    Birthday,
    /// Anniversary.
    Anniversary,
    /// New year.
    #[serde(alias = "new_year", alias = "new-year")]
    NewYear,
    /// Wedding.
    Wedding,
    /// Graduation.
    Graduation,
    /// Anything else.
    Other,
}

impl Occasion {
    /// Word placed after "Happy" in the title.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Birthday => "Birthday",
            Self::Anniversary => "Anniversary",
            Self::NewYear => "New Year",
            Self::Wedding => "Wedding",
            Self::Graduation => "Graduation",
            Self::Other => "Celebration",
        }
    }

    /// Stable lowercase tag, as found in wish JSON.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::NewYear => "newyear",
            Self::Wedding => "wedding",
            Self::Graduation => "graduation",
            Self::Other => "other",
        }
    }
}

/// The immutable wish payload supplied by the host.
///
/// Field names follow the web form (`recipientName`, `colorHighlight`, ...).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishSpec {
    /// Occasion tag.
    #[serde(default)]
    pub occasion: Occasion,
    /// Recipient name, shown as "For ...".
    pub recipient_name: String,
    /// Optional sender name, shown as "From ...".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// Free-text message; explicit `\n` line breaks are honoured.
    pub message: String,
    /// Date string in `DD/MM/YYYY` form.
    pub date: String,
    /// Highlight colour (date row, sums, proof lines, attribution).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_highlight: Option<Rgba8>,
    /// Background fill colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_bg: Option<Rgba8>,
}

impl WishSpec {
    /// Parse a wish from JSON text.
    pub fn from_json(s: &str) -> MagicWishResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Apply the same checks the wish form performs.
    pub fn validate(&self) -> MagicWishResult<()> {
        if self.recipient_name.trim().is_empty() {
            return Err(MagicWishError::validation("recipient name must be non-empty"));
        }
        if !is_strict_dmy(&self.date) {
            return Err(MagicWishError::validation(format!(
                "date \"{}\" must be in DD/MM/YYYY format",
                self.date
            )));
        }
        if self.message.trim().is_empty() {
            return Err(MagicWishError::validation("message must be non-empty"));
        }
        let chars = self.message.chars().count();
        if chars > MAX_MESSAGE_CHARS {
            return Err(MagicWishError::validation(format!(
                "message is too long ({chars} > {MAX_MESSAGE_CHARS} characters)"
            )));
        }
        Ok(())
    }

    /// Parse [`WishSpec::date`] into the square's input quadruple.
    pub fn date_quadruple(&self) -> MagicWishResult<DateQuadruple> {
        parse_date(&self.date)
    }

    /// "Happy <Occasion>!"
    pub fn title(&self) -> String {
        format!("Happy {}!", self.occasion.display_name())
    }

    /// Message split on explicit line breaks; trailing `\r` is dropped.
    pub fn message_lines(&self) -> Vec<&str> {
        self.message
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect()
    }

    /// Recipient line.
    pub fn attribution(&self) -> String {
        format!("For {}", self.recipient_name.trim())
    }

    /// Sender line, when a non-blank sender is present.
    pub fn sender_line(&self) -> Option<String> {
        self.sender_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("From {s}"))
    }

    /// Effective highlight colour.
    pub fn highlight(&self) -> Rgba8 {
        self.color_highlight.unwrap_or(DEFAULT_HIGHLIGHT)
    }

    /// Effective background colour.
    pub fn background(&self) -> Rgba8 {
        self.color_bg.unwrap_or(DEFAULT_BACKGROUND)
    }

    /// Seed for decorative placement, stable across processes.
    ///
    /// Derived from the recipient name and the date (content and length), never from a clock.
    pub fn seed(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_str(self.recipient_name.trim());
        h.write_str(self.date.trim());
        h.write_u64(self.recipient_name.trim().chars().count() as u64);
        h.write_u64(self.date.trim().len() as u64);
        h.finish()
    }

    /// Seed for the procedural backdrop (also mixes in the occasion).
    pub fn backdrop_seed(&self) -> u64 {
        let mut h = Fnv1a64::new(self.seed());
        h.write_str(self.occasion.tag());
        h.finish()
    }

    /// Filesystem-friendly default output name, e.g. `magic_wish_kirthi.gif`.
    pub fn default_file_name(&self) -> String {
        let name = sanitize_file_stem(&self.recipient_name);
        if name.is_empty() {
            "magic_wish.gif".to_owned()
        } else {
            format!("magic_wish_{name}.gif")
        }
    }
}

fn is_strict_dmy(s: &str) -> bool {
    let parts: Vec<&str> = s.split('/').collect();
    parts.len() == 3
        && [2usize, 2, 4]
            .iter()
            .zip(&parts)
            .all(|(&n, p)| p.len() == n && p.bytes().all(|b| b.is_ascii_digit()))
}

fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
#[path = "../../tests/unit/wish/model.rs"]
mod tests;
