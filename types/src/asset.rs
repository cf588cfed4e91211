//! Fixed-precision token amounts.
//!
//! An [`Asset`] is a signed count of raw units plus the [`Symbol`] that
//! gives those units meaning: `"100.0000 VOTE"` is `1_000_000` raw units of
//! `4,VOTE`. Arithmetic is checked and only defined between assets of the
//! same symbol; nothing here wraps or saturates silently.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Symbol, SymbolCode, TypesError};

/// Largest magnitude a well-formed asset may hold.
pub const MAX_AMOUNT: i64 = (1 << 62) - 1;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    /// Zero units of `symbol`.
    pub fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Whether the amount is within range and the symbol is well formed.
    pub fn is_valid(&self) -> bool {
        (-MAX_AMOUNT..=MAX_AMOUNT).contains(&self.amount) && self.symbol.is_valid()
    }

    pub fn checked_add(&self, other: &Asset) -> Option<Asset> {
        if self.symbol != other.symbol {
            return None;
        }
        let amount = self.amount.checked_add(other.amount)?;
        (amount.abs() <= MAX_AMOUNT).then(|| Asset::new(amount, self.symbol.clone()))
    }

    pub fn checked_sub(&self, other: &Asset) -> Option<Asset> {
        if self.symbol != other.symbol {
            return None;
        }
        let amount = self.amount.checked_sub(other.amount)?;
        (amount.abs() <= MAX_AMOUNT).then(|| Asset::new(amount, self.symbol.clone()))
    }
}

impl PartialOrd for Asset {
    /// Assets of different symbols are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.symbol == other.symbol).then(|| self.amount.cmp(&other.amount))
    }
}

impl FromStr for Asset {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidAsset(s.to_string());
        let (number, code) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let code = SymbolCode::new(code.trim())?;

        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) if !f.is_empty() => (w, f),
            Some(_) => return Err(invalid()),
            None => (digits, ""),
        };
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let precision = u8::try_from(frac.len()).map_err(|_| invalid())?;
        let symbol = Symbol::new(precision, code)?;
        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| invalid())?
        };
        let mut amount = whole
            .checked_mul(symbol.unit())
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(invalid)?;
        if negative {
            amount = -amount;
        }

        let asset = Asset::new(amount, symbol);
        if asset.is_valid() {
            Ok(asset)
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let magnitude = self.amount.unsigned_abs();
        let precision = self.symbol.precision() as u32;
        if precision == 0 {
            return write!(f, "{sign}{magnitude} {}", self.symbol.code());
        }
        let unit = 10u64.pow(precision);
        write!(
            f,
            "{sign}{}.{:0width$} {}",
            magnitude / unit,
            magnitude % unit,
            self.symbol.code(),
            width = precision as usize
        )
    }
}
