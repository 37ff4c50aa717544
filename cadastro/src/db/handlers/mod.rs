//! Repository implementations for database access.
//!
//! Each repository wraps a borrowed SQLx connection (a pooled connection or an open transaction)
//! and implements the [`Repository`] trait for one table.
//!
//! # Available Repositories
//!
//! - [`Users`]: user records, email lookups and cascade deletion
//! - [`Addresses`]: addresses owned by a user
//!
//! # Common Pattern
//!
//! ```ignore
//! use cadastro::db::handlers::{Users, Repository};
//!
//! async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Users::new(&mut conn);
//!
//!     let users = repo.list(&UserFilter::new(0, 10)).await?;
//!     Ok(())
//! }
//! ```
//!
//! Operations that touch several rows (cascade delete, address creation) open their own
//! transaction on the borrowed connection, so callers do not need to.

pub mod addresses;
pub mod repository;
pub mod users;

pub use addresses::Addresses;
pub use repository::Repository;
pub use users::Users;
