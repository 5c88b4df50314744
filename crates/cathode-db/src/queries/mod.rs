//! Database query operations, split by concern.

pub mod catalog;
pub mod schedule;
