//! # clubhaus-db
//!
//! PostgreSQL persistence layer for the clubhaus club-management platform.
//!
//! Provides the connection pool wrapper, embedded migrations, and the
//! entity models for guardian accounts, member records, and the explicit
//! guardian-member link table. Models follow the associated-function CRUD
//! convention: plain `FromRow` structs with `async fn` query methods that
//! take a pool reference.

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use models::{
    GuardianAccount, GuardianLink, MemberRecord, NewGuardianAccount, UpsertGuardianLink,
};
pub use pool::DbPool;
