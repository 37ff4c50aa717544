//! Database repository for addresses.

use crate::types::{AddressId, UserId};
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::addresses::{AddressCreateDBRequest, AddressDBResponse, AddressUpdateDBRequest},
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use tracing::instrument;

/// Filter for listing the addresses of one user
#[derive(Debug, Clone)]
pub struct AddressFilter {
    pub user_id: UserId,
}

impl AddressFilter {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

#[derive(Debug, Clone, FromRow)]
struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Address> for AddressDBResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            user_id: address.user_id,
            street: address.street,
            city: address.city,
            postal_code: address.postal_code,
            created_at: address.created_at,
        }
    }
}

pub struct Addresses<'c> {
    db: &'c mut SqliteConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Addresses<'c> {
    type CreateRequest = AddressCreateDBRequest;
    type UpdateRequest = AddressUpdateDBRequest;
    type Response = AddressDBResponse;
    type Id = AddressId;
    type Filter = AddressFilter;

    /// Insert an address for an existing user.
    ///
    /// Returns [`DbError::NotFound`] when the owning user does not exist. Ownership is enforced
    /// by the foreign key, so the check and the insert are one statement.
    #[instrument(skip(self, request), fields(user_id = request.user_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (street, city, postal_code, user_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_id, street, city, postal_code, created_at
            "#,
        )
        .bind(&request.street)
        .bind(&request.city)
        .bind(&request.postal_code)
        .bind(request.user_id)
        .bind(Utc::now())
        .fetch_one(&mut *self.db)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::ForeignKeyViolation { .. } => DbError::NotFound,
            other => other,
        })?;

        Ok(address.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let address = sqlx::query_as::<_, Address>(
            "SELECT id, user_id, street, city, postal_code, created_at FROM addresses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(address.map(Into::into))
    }

    #[instrument(skip(self, filter), fields(user_id = filter.user_id), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT id, user_id, street, city, postal_code, created_at FROM addresses WHERE user_id = ? ORDER BY id ASC",
        )
        .bind(filter.user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(addresses.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            UPDATE addresses SET
                street = COALESCE(?1, street),
                city = COALESCE(?2, city),
                postal_code = COALESCE(?3, postal_code)
            WHERE id = ?4
            RETURNING id, user_id, street, city, postal_code, created_at
            "#,
        )
        .bind(&request.street)
        .bind(&request.city)
        .bind(&request.postal_code)
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(address.into())
    }
}

impl<'c> Addresses<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}
