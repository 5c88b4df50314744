//! Cathode-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across cathode:
//!
//! - **Core Types**: Enums for content kinds, scheduling strategies, and slot sizes
//! - **Time Helpers**: SQL timestamp formatting, half-hour rounding, day bounds
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use cathode_common::{ContentKind, StrategyKind, Error, Result};
//!
//! let kind: ContentKind = "movie".parse().unwrap();
//! assert_eq!(kind, ContentKind::Movie);
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_input("bad channel number"))
//! }
//! ```

pub mod error;
pub mod time;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
