//! C-compatible boundary

pub mod exports;
pub mod host;
