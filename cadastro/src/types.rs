//! Common type definitions.
//!
//! Entity identifiers are integers generated by the database (`INTEGER PRIMARY KEY
//! AUTOINCREMENT`), wrapped in type aliases so signatures say which table they point at:
//!
//! - [`UserId`]: row id in `users`
//! - [`AddressId`]: row id in `addresses`

// Type aliases for IDs
pub type UserId = i64;
pub type AddressId = i64;
