//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//! - **[`validation`]**: Validating JSON extractor and email normalization
//!
//! # API Structure
//!
//! - **Users** (`/usuarios/*`): user management; deleting a user deletes its addresses
//! - **Addresses** (`/usuarios/{id}/enderecos`, `/enderecos/*`): addresses owned by a user
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/docs` when the server is running.

pub mod handlers;
pub mod models;
pub mod validation;
