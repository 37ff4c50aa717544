//! Database repository for users.

use crate::types::UserId;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
};
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, SqliteConnection};
use tracing::{debug, instrument};

/// Filter for listing users
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub skip: i64,
    pub limit: i64,
}

impl UserFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDBResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

pub struct Users<'c> {
    db: &'c mut SqliteConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // The unique index on email turns a duplicate into DbError::UniqueViolation
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, created_at)
            VALUES (?, ?, ?)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(Utc::now())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, email, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user.map(Into::into))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        // Ids are assigned monotonically, so ordering by id is insertion order
        let users = sqlx::query_as::<_, User>("SELECT id, name, email, created_at FROM users ORDER BY id ASC LIMIT ? OFFSET ?")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        Ok(self.delete_cascade(id).await?.is_some())
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        // A colliding email aborts the statement; the transaction is rolled back on drop and the
        // row keeps its previous values.
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE(?1, name),
                email = COALESCE(?2, email)
            WHERE id = ?3
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound)?;

        tx.commit().await?;

        Ok(user.into())
    }
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Delete a user together with every address it owns.
    ///
    /// Both deletes run in one transaction. Returns `None` when the user does not exist (nothing
    /// is removed), otherwise the number of addresses removed alongside the user row.
    #[instrument(skip(self), err)]
    pub async fn delete_cascade(&mut self, id: UserId) -> Result<Option<u64>> {
        let mut tx = self.db.begin().await?;

        let addresses_removed = sqlx::query("DELETE FROM addresses WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let users_removed = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if users_removed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        debug!(addresses_removed, "Deleted user and owned addresses");

        Ok(Some(addresses_removed))
    }

    #[instrument(skip(self), err)]
    pub async fn exists(&mut self, id: UserId) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::Repository;
    use super::*;
    use crate::db::handlers::{Addresses, addresses::AddressFilter};
    use crate::db::models::addresses::AddressCreateDBRequest;
    use crate::test_utils::TestDb;

    fn user_request(name: &str, email: &str) -> UserCreateDBRequest {
        UserCreateDBRequest {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn address_request(user_id: UserId, street: &str) -> AddressCreateDBRequest {
        AddressCreateDBRequest {
            user_id,
            street: street.to_string(),
            city: "Recife".to_string(),
            postal_code: Some("50000-000".to_string()),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_create_user() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&user_request("Ana Souza", "ana@example.com")).await.unwrap();
        assert!(user.id > 0);
        assert_eq!(user.name, "Ana Souza");
        assert_eq!(user.email, "ana@example.com");

        let fetched = repo.get_by_id(user.id).await.unwrap().expect("user should exist");
        assert_eq!(fetched, user);
    }

    #[test_log::test(tokio::test)]
    async fn test_create_user_duplicate_email_is_unique_violation() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        repo.create(&user_request("First", "dup@example.com")).await.unwrap();
        let err = repo.create(&user_request("Second", "dup@example.com")).await.unwrap_err();

        match err {
            DbError::UniqueViolation { table, column, .. } => {
                assert_eq!(table.as_deref(), Some("users"));
                assert_eq!(column.as_deref(), Some("email"));
            }
            other => panic!("expected unique violation, got {other:?}"),
        }
        assert_eq!(repo.list(&UserFilter::new(0, 10)).await.unwrap().len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_get_missing_user_returns_none() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        assert!(repo.get_by_id(4242).await.unwrap().is_none());
        assert!(!repo.exists(4242).await.unwrap());
    }

    #[test_log::test(tokio::test)]
    async fn test_list_users_pagination_window_in_creation_order() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let mut created = Vec::new();
        for i in 0..5 {
            created.push(repo.create(&user_request(&format!("User {i}"), &format!("user{i}@example.com"))).await.unwrap());
        }

        let first_page = repo.list(&UserFilter::new(0, 2)).await.unwrap();
        assert_eq!(first_page, created[0..2].to_vec());

        let middle = repo.list(&UserFilter::new(2, 2)).await.unwrap();
        assert_eq!(middle, created[2..4].to_vec());

        let tail = repo.list(&UserFilter::new(4, 10)).await.unwrap();
        assert_eq!(tail, created[4..].to_vec());

        assert!(repo.list(&UserFilter::new(5, 10)).await.unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_created_at_is_non_decreasing() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let mut previous = None;
        for i in 0..4 {
            let user = repo.create(&user_request("Clock", &format!("clock{i}@example.com"))).await.unwrap();
            if let Some(previous) = previous {
                assert!(user.created_at >= previous);
            }
            previous = Some(user.created_at);
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_update_user_partial() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&user_request("Before", "before@example.com")).await.unwrap();

        let updated = repo
            .update(
                user.id,
                &UserUpdateDBRequest {
                    name: Some("After".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "After");
        assert_eq!(updated.email, "before@example.com");
        assert_eq!(updated.created_at, user.created_at);
    }

    #[test_log::test(tokio::test)]
    async fn test_update_missing_user_is_not_found() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let err = repo
            .update(
                99,
                &UserUpdateDBRequest {
                    name: Some("Ghost".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[test_log::test(tokio::test)]
    async fn test_update_email_to_taken_email_leaves_row_unchanged() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        repo.create(&user_request("Owner", "taken@example.com")).await.unwrap();
        let other = repo.create(&user_request("Other", "other@example.com")).await.unwrap();

        let err = repo
            .update(
                other.id,
                &UserUpdateDBRequest {
                    name: Some("Renamed".to_string()),
                    email: Some("taken@example.com".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let unchanged = repo.get_by_id(other.id).await.unwrap().unwrap();
        assert_eq!(unchanged, other);
    }

    #[test_log::test(tokio::test)]
    async fn test_update_email_to_own_email_is_allowed() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&user_request("Same", "same@example.com")).await.unwrap();
        let updated = repo
            .update(
                user.id,
                &UserUpdateDBRequest {
                    name: None,
                    email: Some("same@example.com".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated, user);
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_user_cascades_addresses() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();

        let owner = Users::new(&mut conn).create(&user_request("Owner", "owner@example.com")).await.unwrap();
        let bystander = Users::new(&mut conn).create(&user_request("Bystander", "by@example.com")).await.unwrap();

        let mut address_ids = Vec::new();
        for street in ["Rua A", "Rua B", "Rua C"] {
            let address = Addresses::new(&mut conn).create(&address_request(owner.id, street)).await.unwrap();
            address_ids.push(address.id);
        }
        let kept = Addresses::new(&mut conn).create(&address_request(bystander.id, "Rua D")).await.unwrap();

        let total_before: i64 = sqlx::query_scalar("SELECT (SELECT COUNT(*) FROM users) + (SELECT COUNT(*) FROM addresses)")
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        let removed = Users::new(&mut conn).delete_cascade(owner.id).await.unwrap();
        assert_eq!(removed, Some(3));

        let total_after: i64 = sqlx::query_scalar("SELECT (SELECT COUNT(*) FROM users) + (SELECT COUNT(*) FROM addresses)")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(total_before - total_after, 4);

        let mut addresses = Addresses::new(&mut conn);
        for id in address_ids {
            assert!(addresses.get_by_id(id).await.unwrap().is_none());
        }
        let remaining = addresses.list(&AddressFilter::new(bystander.id)).await.unwrap();
        assert_eq!(remaining, vec![kept]);
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_missing_user_removes_nothing() {
        let db = TestDb::new().await;
        let mut conn = db.pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        repo.create(&user_request("Stays", "stays@example.com")).await.unwrap();

        assert!(!repo.delete(12345).await.unwrap());
        assert_eq!(repo.delete_cascade(12345).await.unwrap(), None);
        assert_eq!(repo.list(&UserFilter::new(0, 10)).await.unwrap().len(), 1);
    }
}
