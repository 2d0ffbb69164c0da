// File: crates/crossfilter-core/src/error.rs
// Summary: Error type returned by aggregator operations.

use std::fmt;
use thiserror::Error;

/// Which kind of handle failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
    Dimension,
    Group,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Dimension => f.write_str("dimension"),
            HandleKind::Group => f.write_str("group"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrossfilterError {
    /// Handle is out of range or was minted by a different aggregator.
    #[error("invalid {kind} handle #{index}")]
    InvalidHandle { kind: HandleKind, index: usize },

    #[error("too many dimensions: at most {max} are supported")]
    TooManyDimensions { max: usize },

    #[error("group #{index} is a `{found}` group, not `{expected}`")]
    GroupTypeMismatch { index: usize, expected: &'static str, found: &'static str },
}

pub type Result<T> = std::result::Result<T, CrossfilterError>;
