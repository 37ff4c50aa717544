use crate::{
    AppState,
    api::{
        models::{
            addresses::AddressResponse,
            pagination::Pagination,
            users::{UserCreate, UserResponse, UserUpdate},
        },
        validation::ValidatedJson,
    },
    db::{
        errors::DbError,
        handlers::{Addresses, Repository, Users, addresses::AddressFilter, users::UserFilter},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    errors::{Error, Result},
    openapi::extra_types::{ConflictBody, ValidationErrorBody},
    types::UserId,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

// POST /usuarios - Create a user
#[utoipa::path(
    post,
    path = "/usuarios",
    tag = "usuarios",
    summary = "Create user",
    description = "Create a user. The email address must not belong to another user.",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid payload", body = ValidationErrorBody),
        (status = 409, description = "Email already registered", body = ConflictBody),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut conn);

    let user = repo.create(&UserCreateDBRequest::from(body)).await?;
    tracing::info!(user_id = user.id, "Created user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// GET /usuarios - List users
#[utoipa::path(
    get,
    path = "/usuarios",
    tag = "usuarios",
    summary = "List users",
    description = "List users in creation order",
    params(Pagination),
    responses(
        (status = 200, description = "Page of users", body = [UserResponse]),
        (status = 400, description = "Unparsable pagination parameters"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>, Query(pagination): Query<Pagination>) -> Result<Json<Vec<UserResponse>>> {
    let (skip, limit) = pagination.params(&state.config.pagination);

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let users = Users::new(&mut conn).list(&UserFilter::new(skip, limit)).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// GET /usuarios/{id} - Get a user with its addresses
#[utoipa::path(
    get,
    path = "/usuarios/{id}",
    tag = "usuarios",
    summary = "Get user",
    description = "Get a user together with the addresses it owns",
    params(
        ("id" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = id))]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Json<UserResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let user = Users::new(&mut tx).get_by_id(id).await?.ok_or_else(|| Error::not_found("User", id))?;
    let addresses = Addresses::new(&mut tx).list(&AddressFilter::new(id)).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    let addresses = addresses.into_iter().map(AddressResponse::from).collect();
    Ok(Json(UserResponse::from(user).with_addresses(addresses)))
}

// PUT /usuarios/{id} - Update a user
#[utoipa::path(
    put,
    path = "/usuarios/{id}",
    tag = "usuarios",
    summary = "Update user",
    description = "Update the name and/or email of a user. Omitted fields are left unchanged.",
    params(
        ("id" = i64, Path, description = "User ID"),
    ),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid payload or nothing to update", body = ValidationErrorBody),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered to another user", body = ConflictBody),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = id))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(body): ValidatedJson<UserUpdate>,
) -> Result<Json<UserResponse>> {
    if body.is_empty() {
        return Err(Error::BadRequest {
            message: "At least one of 'name' or 'email' must be provided".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut conn)
        .update(id, &UserUpdateDBRequest::new(body))
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("User", id),
            other => other.into(),
        })?;

    Ok(Json(UserResponse::from(user)))
}

// DELETE /usuarios/{id} - Delete a user and its addresses
#[utoipa::path(
    delete,
    path = "/usuarios/{id}",
    tag = "usuarios",
    summary = "Delete user",
    description = "Delete a user. Every address owned by the user is deleted in the same transaction.",
    params(
        ("id" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User and addresses deleted"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = id))]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    if Users::new(&mut conn).delete(id).await? {
        tracing::info!("Deleted user");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("User", id))
    }
}
