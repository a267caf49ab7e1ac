//! Crate-wide primitives: pixel layouts, rationals and the error type.

pub(crate) mod core;
pub(crate) mod error;
