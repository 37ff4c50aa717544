//! API request/response models for addresses.

use crate::db::models::addresses::AddressDBResponse;
use crate::types::{AddressId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct AddressCreate {
    #[schema(min_length = 1, max_length = 255, example = "Rua das Flores, 123")]
    #[validate(length(min = 1, max = 255))]
    pub street: String,
    #[schema(min_length = 1, max_length = 100, example = "São Paulo")]
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[serde(default, alias = "postalCode")]
    #[schema(max_length = 10, example = "01000-000")]
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
}

/// Partial update of an address. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct AddressUpdate {
    #[schema(min_length = 1, max_length = 255)]
    #[validate(length(min = 1, max = 255))]
    pub street: Option<String>,
    #[schema(min_length = 1, max_length = 100)]
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[serde(default, alias = "postalCode")]
    #[schema(max_length = 10)]
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
}

impl AddressUpdate {
    /// True when the request carries no field to change.
    pub fn is_empty(&self) -> bool {
        self.street.is_none() && self.city.is_none() && self.postal_code.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddressResponse {
    pub id: AddressId,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AddressDBResponse> for AddressResponse {
    fn from(db: AddressDBResponse) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            street: db.street,
            city: db.city,
            postal_code: db.postal_code,
            created_at: db.created_at,
        }
    }
}
