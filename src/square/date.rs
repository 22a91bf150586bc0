use crate::foundation::error::{MagicWishError, MagicWishResult};

/// The four date-derived integers a square is built from: `(A, B, C, D)`.
///
/// No calendar legality check happens here; `31/02/2024` is a perfectly good quadruple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DateQuadruple {
    /// Day of month (`A`).
    pub day: u32,
    /// Month (`B`).
    pub month: u32,
    /// `year / 100` (`C`).
    pub century: u32,
    /// `year % 100` (`D`).
    pub year_in_century: u32,
}

impl DateQuadruple {
    /// Split a full date into its quadruple.
    pub fn from_dmy(day: u32, month: u32, year: u32) -> Self {
        Self {
            day,
            month,
            century: year / 100,
            year_in_century: year % 100,
        }
    }

    /// `[A, B, C, D]` in square order.
    pub fn as_array(self) -> [u32; 4] {
        [self.day, self.month, self.century, self.year_in_century]
    }

    /// `A + B + C + D`.
    pub fn sum(self) -> u64 {
        self.as_array().iter().map(|&v| u64::from(v)).sum()
    }
}

/// Parse a `DD/MM/YYYY` date string.
///
/// Exactly three `/`-separated parts of ASCII digits are required; surrounding whitespace is
/// ignored. Digit counts are not enforced here (that is [`crate::WishSpec::validate`]'s job), so
/// `3/3/2007` parses too.
pub fn parse_date(s: &str) -> MagicWishResult<DateQuadruple> {
    let parts: Vec<&str> = s.trim().split('/').collect();
    if parts.len() != 3 {
        return Err(MagicWishError::parse(format!(
            "invalid date \"{s}\": expected DD/MM/YYYY"
        )));
    }

    fn field(part: &str, name: &str, whole: &str) -> MagicWishResult<u32> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MagicWishError::parse(format!(
                "invalid {name} \"{part}\" in date \"{whole}\": expected DD/MM/YYYY"
            )));
        }
        part.parse::<u32>().map_err(|e| {
            MagicWishError::parse(format!("invalid {name} \"{part}\" in date \"{whole}\": {e}"))
        })
    }

    let day = field(parts[0], "day", s)?;
    let month = field(parts[1], "month", s)?;
    let year = field(parts[2], "year", s)?;
    Ok(DateQuadruple::from_dmy(day, month, year))
}

#[cfg(test)]
#[path = "../../tests/unit/square/date.rs"]
mod tests;
