//! Error body schemas.
//!
//! Errors are produced by [`crate::errors::Error`]'s `IntoResponse` impl as ad-hoc JSON; these
//! types exist only to describe those bodies in the OpenAPI document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Body of a 400 response caused by field validation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "message": "Validation failed",
    "errors": {"email": ["must be a valid email address"]}
}))]
pub struct ValidationErrorBody {
    pub message: String,
    /// Messages per offending field
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Body of a 409 response caused by a uniqueness conflict.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "message": "An account with this email address already exists",
    "resource": "user"
}))]
pub struct ConflictBody {
    pub message: String,
    /// Kind of resource that collided
    pub resource: String,
}
