//! Database record models.
//!
//! Request structs (`*CreateDBRequest`, `*UpdateDBRequest`) carry already-validated data into the
//! repositories, and `*DBResponse` structs carry rows back out. They are kept separate from the
//! API models in [`crate::api::models`] so the storage and wire representations can evolve
//! independently; `From` conversions bridge the two.
//!
//! - [`users`]: user accounts
//! - [`addresses`]: addresses owned by a user

pub mod addresses;
pub mod users;
