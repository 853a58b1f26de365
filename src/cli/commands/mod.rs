//! Command implementations.

pub mod cache;
pub mod simulate;
pub mod validate;
