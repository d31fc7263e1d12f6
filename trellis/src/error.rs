//! Layout configuration error types.

use thiserror::Error;

use crate::layout::Axis;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("justify must be one of 'start', 'center', 'end', 'even' or unset, got `{0}`")]
    InvalidJustify(String),

    #[error("align `{keyword}` is not valid for a {axis}")]
    InvalidAlign { keyword: String, axis: Axis },

    #[error("a `stretch` child requires justify to be unset")]
    StretchWithJustify,

    #[error("spacing `auto` distributes space evenly and cannot be combined with justify `{0}`")]
    ConflictingSpacing(String),

    #[error("invalid spacing: {0}")]
    InvalidSpacing(String),

    #[error("unknown child sentinel `{0}`, expected `stretch` or `spacing:N`")]
    UnknownSentinel(String),
}
