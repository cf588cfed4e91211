//! Token symbols.
//!
//! A [`SymbolCode`] is the ticker (`VOTE`); a [`Symbol`] pairs it with the
//! number of fractional digits fixed when the token is registered. Two
//! assets are only comparable when their full symbols match.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Maximum number of fractional digits a symbol may carry.
pub const MAX_PRECISION: u8 = 18;

/// Maximum length of a symbol code.
pub const MAX_CODE_LEN: usize = 7;

/// Token ticker: 1-7 uppercase ASCII letters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolCode(String);

impl SymbolCode {
    pub fn new(s: impl Into<String>) -> Result<Self, TypesError> {
        let s = s.into();
        if !s.is_empty() && s.len() <= MAX_CODE_LEN && s.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(s))
        } else {
            Err(TypesError::InvalidSymbolCode(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for SymbolCode {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SymbolCode> for String {
    fn from(code: SymbolCode) -> Self {
        code.0
    }
}

impl FromStr for SymbolCode {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ticker together with its precision, written `4,VOTE`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SymbolParts")]
pub struct Symbol {
    precision: u8,
    code: SymbolCode,
}

/// Unvalidated wire form of [`Symbol`].
#[derive(Deserialize)]
struct SymbolParts {
    precision: u8,
    code: SymbolCode,
}

impl TryFrom<SymbolParts> for Symbol {
    type Error = TypesError;

    fn try_from(parts: SymbolParts) -> Result<Self, Self::Error> {
        Self::new(parts.precision, parts.code)
    }
}

impl Symbol {
    pub fn new(precision: u8, code: SymbolCode) -> Result<Self, TypesError> {
        if precision > MAX_PRECISION {
            return Err(TypesError::InvalidPrecision(precision));
        }
        Ok(Self { precision, code })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn code(&self) -> &SymbolCode {
        &self.code
    }

    /// Number of raw units in one whole token.
    pub fn unit(&self) -> i64 {
        10i64.pow(self.precision as u32)
    }

    pub fn is_valid(&self) -> bool {
        self.precision <= MAX_PRECISION
    }
}

impl FromStr for Symbol {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| TypesError::InvalidSymbolCode(s.to_string()))?;
        let precision: u8 = precision
            .trim()
            .parse()
            .map_err(|_| TypesError::InvalidSymbolCode(s.to_string()))?;
        Self::new(precision, SymbolCode::new(code.trim())?)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}
