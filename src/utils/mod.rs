//! Shared helpers.

pub mod offsets;
