//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for:
//! - Request validation and deserialization (via [`crate::api::validation::ValidatedJson`])
//! - Executing the operation through the database repositories
//! - Mapping repository outcomes to status codes and response bodies
//!
//! # Handler Modules
//!
//! - [`users`]: user CRUD under `/usuarios`, including cascade deletion
//! - [`addresses`]: address creation/listing under `/usuarios/{id}/enderecos`, update and
//!   deletion under `/enderecos/{id}`
//! - [`index`]: welcome document at `/`
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes and error bodies.

pub mod addresses;
pub mod index;
pub mod users;
