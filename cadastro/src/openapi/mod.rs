//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every route annotated with `#[utoipa::path]`. The document is served as
//! JSON at `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

pub mod extra_types;

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users and Addresses API",
        description = "Manage users and the addresses they own. Deleting a user deletes its addresses.",
    ),
    paths(
        api::handlers::index::welcome,
        api::handlers::users::create_user,
        api::handlers::users::list_users,
        api::handlers::users::get_user,
        api::handlers::users::update_user,
        api::handlers::users::delete_user,
        api::handlers::addresses::create_address,
        api::handlers::addresses::list_user_addresses,
        api::handlers::addresses::update_address,
        api::handlers::addresses::delete_address,
    ),
    components(
        schemas(
            api::handlers::index::Welcome,
            api::models::users::UserCreate,
            api::models::users::UserUpdate,
            api::models::users::UserResponse,
            api::models::addresses::AddressCreate,
            api::models::addresses::AddressUpdate,
            api::models::addresses::AddressResponse,
            extra_types::ValidationErrorBody,
            extra_types::ConflictBody,
        )
    ),
    tags(
        (name = "root", description = "Service landing document"),
        (name = "usuarios", description = "Users. Email addresses are unique across all users."),
        (name = "enderecos", description = "Addresses, each owned by exactly one user."),
    )
)]
pub struct ApiDoc;
