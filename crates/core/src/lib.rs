//! gift0 Core - Shared domain types.
//!
//! This crate provides the types used across all gift0 components:
//! - `server` - JSON API for lists, gifts, sharing, and URL intake
//! - `cli` - Command-line tools for migrations and extraction checks
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. Database encoding for the typed IDs and the
//! priority enum is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, fingerprints, share tokens, priorities, prices,
//!   and validated gift/list fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
pub use uuid;
pub use uuid::Uuid;
