//! Primitive types for the Trail voting engine.
//!
//! This crate defines the value types shared by every other crate in the workspace:
//! account and ballot names, token symbols, fixed-precision assets and timestamps.

pub mod asset;
pub mod error;
pub mod name;
pub mod symbol;
pub mod time;

pub use asset::Asset;
pub use error::TypesError;
pub use name::Name;
pub use symbol::{Symbol, SymbolCode};
pub use time::{Clock, SystemClock, Timestamp};
