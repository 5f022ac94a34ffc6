//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pooled storage wrapper with all queries

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Meme, RankedMeme, User};
pub use schema::SQLITE_INIT;
pub use sqlite::{MemeSort, SqlitePool, Storage, connect};
