//! Account, ballot, category and option identifiers.
//!
//! Names follow the familiar base32 account-name alphabet: at most 12
//! characters drawn from `a-z`, `1-5` and `.`, never ending in `.`.
//! The bytes of a valid name never contain `0x00`, which lets storage
//! backends use it as a separator in composite keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Maximum length of a name in characters.
pub const MAX_NAME_LEN: usize = 12;

/// A validated identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(s: impl Into<String>) -> Result<Self, TypesError> {
        let s = s.into();
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(TypesError::InvalidName(s))
        }
    }

    fn is_valid(s: &str) -> bool {
        !s.is_empty()
            && s.len() <= MAX_NAME_LEN
            && !s.ends_with('.')
            && s
                .bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'1'..=b'5' | b'.'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for Name {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl FromStr for Name {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_account_style_names() {
        for s in ["alice", "eosio.trail", "b1", "a", "zzzzzzzzzzzz", "opt.1"] {
            assert!(Name::new(s).is_ok(), "{s} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_names() {
        for s in ["", "Alice", "bob6", "thirteenchars", "trailing.", "has space", "x_y"] {
            assert!(Name::new(s).is_err(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<Name, _> = serde_json::from_str("\"alice\"");
        assert!(ok.is_ok());
        let bad: Result<Name, _> = serde_json::from_str("\"ALICE\"");
        assert!(bad.is_err());
    }
}
