//! Binary key layouts.
//!
//! Names and symbol codes never contain `0x00`, so it separates the parts
//! of composite keys. Expirations are big-endian so that byte order equals
//! chronological order.

use trail_types::{Name, SymbolCode, Timestamp};

use crate::LmdbError;

const SEP: u8 = 0;

/// `owner ++ 0x00`: prefix of every balance key of `owner`.
pub(crate) fn owner_prefix(owner: &Name) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner.as_bytes().len() + 1);
    key.extend_from_slice(owner.as_bytes());
    key.push(SEP);
    key
}

/// `owner ++ 0x00 ++ code`.
pub(crate) fn balance_key(owner: &Name, code: &SymbolCode) -> Vec<u8> {
    let mut key = owner_prefix(owner);
    key.extend_from_slice(code.as_bytes());
    key
}

/// `voter ++ 0x00 ++ ballot`.
pub(crate) fn receipt_key(voter: &Name, ballot: &Name) -> Vec<u8> {
    let mut key = owner_prefix(voter);
    key.extend_from_slice(ballot.as_bytes());
    key
}

/// `voter ++ 0x00 ++ code ++ 0x00`: prefix of `voter`'s index entries for `code`.
pub(crate) fn expiry_prefix(voter: &Name, code: &SymbolCode) -> Vec<u8> {
    let mut key = owner_prefix(voter);
    key.extend_from_slice(code.as_bytes());
    key.push(SEP);
    key
}

/// `expiry_prefix ++ expiration_be_u64 ++ ballot`.
pub(crate) fn expiry_key(
    voter: &Name,
    code: &SymbolCode,
    expiration: Timestamp,
    ballot: &Name,
) -> Vec<u8> {
    let mut key = expiry_prefix(voter, code);
    key.extend_from_slice(&expiration.as_secs().to_be_bytes());
    key.extend_from_slice(ballot.as_bytes());
    key
}

/// Recover the ballot name from an index key that starts with `prefix`.
pub(crate) fn ballot_from_expiry_key(prefix: &[u8], key: &[u8]) -> Result<Name, LmdbError> {
    let rest = key
        .strip_prefix(prefix)
        .and_then(|rest| rest.get(8..))
        .ok_or_else(|| LmdbError::CorruptKey(format!("short expiry key {key:?}")))?;
    let ballot =
        std::str::from_utf8(rest).map_err(|e| LmdbError::CorruptKey(e.to_string()))?;
    Name::new(ballot).map_err(|e| LmdbError::CorruptKey(e.to_string()))
}

/// Smallest key greater than every key starting with `prefix`.
pub(crate) fn increment_prefix(prefix: &mut Vec<u8>) {
    while let Some(last) = prefix.last_mut() {
        if *last < u8::MAX {
            *last += 1;
            return;
        }
        prefix.pop();
    }
}
