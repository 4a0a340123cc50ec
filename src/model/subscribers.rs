use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::domain::{EmailAddress, PersonName};

/// New newsletter sign-up
#[derive(Debug)]
pub struct NewSubscriber {
    pub email: EmailAddress,
    pub name: Option<PersonName>,
}

/// Stored Subscriber record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    /// Blank when the subscriber gave no name
    pub name: String,
    /// Inactive subscribers are kept but excluded from mailings
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Filters for the administrative subscriber listing
#[derive(Debug, Clone, Default)]
pub struct SubscriberQuery {
    pub is_active: Option<bool>,
    /// Case-insensitive substring of the email
    pub search: Option<String>,
}
