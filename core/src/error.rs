use thiserror::Error;

/// Errors surfaced to callers. Degenerate signals (silence, too few runs to
/// cluster) are not errors; decoding returns empty output for those.
#[derive(Debug, Error)]
pub enum MorseError {
    /// Bad caller input: empty text, no encodable characters, invalid params.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The audio container could not be read or written.
    #[error("audio codec error: {0}")]
    Codec(#[from] hound::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
