//! Errors raised while constructing or parsing primitive values.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid name '{0}': expected 1-12 characters from a-z, 1-5 and '.'")]
    InvalidName(String),

    #[error("invalid symbol code '{0}': expected 1-7 uppercase letters")]
    InvalidSymbolCode(String),

    #[error("invalid symbol precision {0}: must be at most {max}", max = crate::symbol::MAX_PRECISION)]
    InvalidPrecision(u8),

    #[error("invalid asset '{0}'")]
    InvalidAsset(String),
}
