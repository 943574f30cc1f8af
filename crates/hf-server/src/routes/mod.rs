//! Route handlers for the HTTP API.

pub mod accounts;
pub mod frames;
pub mod health;
