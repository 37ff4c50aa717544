//! API request/response models for users.

use super::addresses::AddressResponse;
use crate::api::validation::normalize_email;
use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Emails are normalized while deserializing so the validation rules see the stored form
fn deserialize_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|email| normalize_email(&email))
}

fn deserialize_optional_email<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|email| email.as_deref().map(normalize_email))
}

// User request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UserCreate {
    #[schema(min_length = 1, max_length = 255, example = "Maria Silva")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[schema(min_length = 1, max_length = 255, format = "email", example = "maria@example.com")]
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(length(min = 1, max = 255), email)]
    pub email: String,
}

/// Partial update of a user. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UserUpdate {
    #[schema(min_length = 1, max_length = 255)]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[schema(min_length = 1, max_length = 255, format = "email")]
    #[serde(default, deserialize_with = "deserialize_optional_email")]
    #[validate(length(min = 1, max = 255), email)]
    pub email: Option<String>,
}

impl UserUpdate {
    /// True when the request carries no field to change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

// User response models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Addresses owned by this user (only included on single-user lookups)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<AddressResponse>>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            created_at: db.created_at,
            addresses: None,
        }
    }
}

impl UserResponse {
    /// Attach the user's addresses to the response
    pub fn with_addresses(mut self, addresses: Vec<AddressResponse>) -> Self {
        self.addresses = Some(addresses);
        self
    }
}
