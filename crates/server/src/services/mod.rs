//! Business logic for gift0.
//!
//! # Services
//!
//! - `identity` - Fingerprint to user resolution
//! - `lists` - List CRUD and sharing
//! - `gifts` - Gift CRUD and the purchased toggle
//! - `intake` - URL extraction to list placement
//!
//! Services borrow the store (and extractor) from [`AppState`](crate::state::AppState)
//! and are built per request.

mod error;
pub mod gifts;
pub mod identity;
pub mod intake;
pub mod lists;
#[cfg(test)]
mod vanishing;

pub use error::ServiceError;
pub use gifts::GiftService;
pub use identity::{IdentityService, ResolvedUser};
pub use intake::{BatchItem, BatchOutcome, IntakeOptions, IntakeOutcome, IntakeService};
pub use lists::{ListService, ViewedList};
