//! In-memory store for issues, media, and users.
//!
//! The store is an explicit object: construct one [`Store`] at process start
//! and hand an `Arc` of it to every handler. Nothing survives a restart.

pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::DbError;
pub use store::{Store, StoreCounts};
