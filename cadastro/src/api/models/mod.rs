//! API request and response data models.
//!
//! These structures define the public API contract. They are kept separate from the database
//! models in [`crate::db::models`] so the wire format and the storage representation can evolve
//! independently.
//!
//! - Request models derive [`validator::Validate`]; field limits are checked by
//!   [`crate::api::validation::ValidatedJson`] before any storage access
//! - All models are annotated with `utoipa` for the generated OpenAPI document
//!
//! # Modules
//!
//! - [`users`]: user creation/update payloads and responses
//! - [`addresses`]: address creation/update payloads and responses
//! - [`pagination`]: `skip`/`limit` query parameters

pub mod addresses;
pub mod pagination;
pub mod users;
