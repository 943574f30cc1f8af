//! hf-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, query modules, and the repository
//! traits the server is wired against.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod repository;
