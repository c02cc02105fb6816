//! Core contact types for rollcall.
//!
//! This module defines the record kept for every student's guardian.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::link;

/// Identifier of a contact record.
///
/// Ids are handed out by the [`Roster`](crate::Roster) from a monotonic
/// counter and are never reused within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A guardian contact.
///
/// Name and phone are kept exactly as entered. The phone is only reduced to
/// digits when a link is composed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Identifier assigned by the roster.
    pub id: RecordId,

    /// Student name.
    pub name: String,

    /// Guardian phone number as entered.
    pub phone: String,

    /// When the record was added.
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(id: RecordId, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            created_at: Utc::now(),
        }
    }

    /// The phone number reduced to ASCII digits.
    #[must_use]
    pub fn phone_digits(&self) -> String {
        link::normalize_phone(&self.phone)
    }
}
