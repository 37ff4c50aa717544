//! Request body validation.
//!
//! [`ValidatedJson`] deserializes a JSON body and runs its [`Validate`] rules before the handler
//! sees it, so no storage access happens for a malformed or out-of-bounds payload.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::Error;

/// JSON body extractor that rejects payloads failing validation with a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::BadRequest {
                message: rejection.body_text(),
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Canonical form of an email address used for storage and uniqueness checks.
///
/// Surrounding whitespace is removed and the domain (after the last `@`) is lower-cased. The
/// local part is left alone since mailbox names may be case-sensitive.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}
