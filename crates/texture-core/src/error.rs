use thiserror::Error;

/// Errors raised where strings or user-supplied numbers enter the core.
///
/// Controller events never fail; these only surface when parsing class or
/// axis names, validating configuration, or building a strict composition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextureError {
    #[error("unknown texture class: {0:?}")]
    UnknownClass(String),

    #[error("unknown axis: {0:?} (expected clay, silt or sand)")]
    UnknownAxis(String),

    #[error("invalid composition: {0}")]
    InvalidComposition(String),

    #[error("invalid diagram config: {0}")]
    InvalidConfig(String),
}
