use crate::{
    AppState,
    api::{
        models::addresses::{AddressCreate, AddressResponse, AddressUpdate},
        validation::ValidatedJson,
    },
    db::{
        errors::DbError,
        handlers::{Addresses, Repository, Users, addresses::AddressFilter},
        models::addresses::{AddressCreateDBRequest, AddressUpdateDBRequest},
    },
    errors::{Error, Result},
    openapi::extra_types::ValidationErrorBody,
    types::{AddressId, UserId},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

// POST /usuarios/{id}/enderecos - Create an address for a user
#[utoipa::path(
    post,
    path = "/usuarios/{id}/enderecos",
    tag = "enderecos",
    summary = "Create address",
    description = "Create an address owned by an existing user",
    params(
        ("id" = i64, Path, description = "Owning user ID"),
    ),
    request_body = AddressCreate,
    responses(
        (status = 201, description = "Address created", body = AddressResponse),
        (status = 400, description = "Invalid payload", body = ValidationErrorBody),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn create_address(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    ValidatedJson(body): ValidatedJson<AddressCreate>,
) -> Result<(StatusCode, Json<AddressResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let address = Addresses::new(&mut conn)
        .create(&AddressCreateDBRequest::new(user_id, body))
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("User", user_id),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(AddressResponse::from(address))))
}

// GET /usuarios/{id}/enderecos - List the addresses of a user
#[utoipa::path(
    get,
    path = "/usuarios/{id}/enderecos",
    tag = "enderecos",
    summary = "List addresses",
    description = "List the addresses owned by a user",
    params(
        ("id" = i64, Path, description = "Owning user ID"),
    ),
    responses(
        (status = 200, description = "Addresses of the user", body = [AddressResponse]),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn list_user_addresses(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<AddressResponse>>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    if !Users::new(&mut tx).exists(user_id).await? {
        return Err(Error::not_found("User", user_id));
    }
    let addresses = Addresses::new(&mut tx).list(&AddressFilter::new(user_id)).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(addresses.into_iter().map(AddressResponse::from).collect()))
}

// PUT /enderecos/{id} - Update an address
#[utoipa::path(
    put,
    path = "/enderecos/{id}",
    tag = "enderecos",
    summary = "Update address",
    description = "Update an address. Omitted fields are left unchanged; the owner cannot be changed.",
    params(
        ("id" = i64, Path, description = "Address ID"),
    ),
    request_body = AddressUpdate,
    responses(
        (status = 200, description = "Address updated", body = AddressResponse),
        (status = 400, description = "Invalid payload or nothing to update", body = ValidationErrorBody),
        (status = 404, description = "Address not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(address_id = address_id))]
pub async fn update_address(
    State(state): State<AppState>,
    Path(address_id): Path<AddressId>,
    ValidatedJson(body): ValidatedJson<AddressUpdate>,
) -> Result<Json<AddressResponse>> {
    if body.is_empty() {
        return Err(Error::BadRequest {
            message: "At least one of 'street', 'city' or 'postal_code' must be provided".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let address = Addresses::new(&mut conn)
        .update(address_id, &AddressUpdateDBRequest::from(body))
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("Address", address_id),
            other => other.into(),
        })?;

    Ok(Json(AddressResponse::from(address)))
}

// DELETE /enderecos/{id} - Delete an address
#[utoipa::path(
    delete,
    path = "/enderecos/{id}",
    tag = "enderecos",
    summary = "Delete address",
    params(
        ("id" = i64, Path, description = "Address ID"),
    ),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 404, description = "Address not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(address_id = address_id))]
pub async fn delete_address(State(state): State<AppState>, Path(address_id): Path<AddressId>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    if Addresses::new(&mut conn).delete(address_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("Address", address_id))
    }
}
