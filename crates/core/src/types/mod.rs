//! Core types for gift0.
//!
//! This module provides type-safe wrappers for the wishlist domain.

pub mod fields;
pub mod fingerprint;
pub mod id;
pub mod price;
pub mod priority;
pub mod share_token;
pub mod validation;

pub use fields::{GiftName, GiftUrl, ListName};
pub use fingerprint::Fingerprint;
pub use id::*;
pub use price::GiftPrice;
pub use priority::Priority;
pub use share_token::ShareToken;
pub use validation::ValidationError;
