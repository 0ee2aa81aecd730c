//! Error types for the parsing entry points.
//!
//! The level, gain, KPI and chart helpers never fail; only explicit parsing
//! (hex colors, language tags) reports errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("expected 6 hex digits, got {0} bytes")]
    Length(usize),
    #[error("invalid hex digits in color {0:?}")]
    Digit(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LangError {
    #[error("unsupported language tag {0:?}")]
    Unsupported(String),
}
