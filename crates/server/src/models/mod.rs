//! Domain models for gift0.
//!
//! These types hold validated values from `gift0-core` and are separate from
//! the database row types in [`crate::db`].

pub mod gift;
pub mod list;
pub mod user;

pub use gift::{Gift, GiftUpdate, NewGift};
pub use list::{GiftList, ListWithGifts};
pub use user::User;
