//! User domain types.

use chrono::{DateTime, Utc};

use gift0_core::{Fingerprint, UserId};

/// An anonymous visitor, identified by a client-generated fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Fingerprint the user was first seen with.
    pub fingerprint: Fingerprint,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
