//! Shared domain rules for the issue reporting system.
//!
//! Everything here is pure: the form schema and its per-step ruleset, media
//! bucket constraints, issue status transitions, and ticket id synthesis.
//! Both the interactive wizard and the HTTP backend depend on this crate so
//! the two sides enforce the same rules.

pub mod error;
pub mod issue;
pub mod media;
pub mod password;
pub mod schema;
pub mod ticket;
pub mod types;
