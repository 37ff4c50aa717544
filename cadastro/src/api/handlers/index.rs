use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Landing document pointing clients at the API documentation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Welcome {
    pub message: String,
    pub name: String,
    pub version: String,
    /// Interactive API reference
    pub docs: String,
    /// Raw OpenAPI document
    pub openapi: String,
}

// GET / - Welcome document
#[utoipa::path(
    get,
    path = "/",
    tag = "root",
    summary = "Welcome",
    responses(
        (status = 200, description = "Service name, version and documentation links", body = Welcome),
    )
)]
pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the users and addresses API".to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/docs".to_string(),
        openapi: "/api-docs/openapi.json".to_string(),
    })
}
