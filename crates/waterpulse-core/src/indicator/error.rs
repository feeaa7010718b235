//! Indicator errors

use thiserror::Error;

/// Errors raised while building a segmented control
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Segmented control needs at least one segment")]
    EmptySegments,

    #[error("Duplicate segment key: {0}")]
    DuplicateKey(String),

    #[error("Segment key must not be empty (position {0})")]
    BlankKey(usize),
}
