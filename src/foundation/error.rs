/// Convenience result type used across magicwish.
pub type MagicWishResult<T> = Result<T, MagicWishError>;

/// Top-level error taxonomy used by library APIs.
///
/// Every variant is local to one wish/render cycle; none of them leaves global state behind, so a
/// caller can always retry from scratch.
#[derive(thiserror::Error, Debug)]
pub enum MagicWishError {
    /// Invalid user-provided wish data, configuration, or frame geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed input text (a date that is not `DD/MM/YYYY`).
    #[error("parse error: {0}")]
    Parse(String),

    /// Background image could not be produced or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// The animated-image encoding capability failed; no partial output is kept.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MagicWishError {
    /// Build a [`MagicWishError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MagicWishError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`MagicWishError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`MagicWishError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MagicWishError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for MagicWishError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
