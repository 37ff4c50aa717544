//! Database models for addresses.

use crate::api::models::addresses::{AddressCreate, AddressUpdate};
use crate::types::{AddressId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating an address owned by `user_id`
#[derive(Debug, Clone)]
pub struct AddressCreateDBRequest {
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
}

impl AddressCreateDBRequest {
    pub fn new(user_id: UserId, create: AddressCreate) -> Self {
        Self {
            user_id,
            street: create.street,
            city: create.city,
            postal_code: create.postal_code,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AddressUpdateDBRequest {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl From<AddressUpdate> for AddressUpdateDBRequest {
    fn from(update: AddressUpdate) -> Self {
        Self {
            street: update.street,
            city: update.city,
            postal_code: update.postal_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddressDBResponse {
    pub id: AddressId,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
}
