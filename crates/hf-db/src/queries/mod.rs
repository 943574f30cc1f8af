//! Database query modules.

pub mod accounts;
pub mod frames;
