//! `db` crate — pure persistence layer.
//!
//! Provides a connection pool, typed row structs, and repository functions
//! for every table in the hotel-manager schema.  Business rules live in the
//! `domain` crate; the only checks made here are the ones that must run
//! inside a transaction (date overlap, non-negative stock, one active
//! subscription per hotel).

pub mod error;
pub mod pool;
pub mod repository;
pub mod models;

pub use pool::DbPool;
pub use error::DbError;
