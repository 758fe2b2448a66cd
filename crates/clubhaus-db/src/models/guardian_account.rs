//! Guardian account entity model.
//!
//! A guardian account is a login identity with role "guardian" that may be
//! granted management rights over members. Email is the natural matching
//! key and is unique on its normalized (lowercased) form.

use chrono::{DateTime, Utc};
use clubhaus_core::GuardianId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A guardian account in the identity store.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GuardianAccount {
    /// Unique identifier for the account.
    pub id: uuid::Uuid,

    /// Guardian's full name.
    pub name: String,

    /// Login email address (unique on its normalized form).
    pub email: String,

    /// Short handle shown in member-facing views.
    pub display_handle: Option<String>,

    /// Account role. Engine-created accounts are always "guardian".
    pub role: String,

    /// Whether the account is active.
    pub is_active: bool,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a guardian account.
#[derive(Debug, Clone)]
pub struct NewGuardianAccount {
    pub name: String,
    pub email: String,
    pub display_handle: Option<String>,
}

impl GuardianAccount {
    /// Get the account ID as a typed `GuardianId`.
    #[must_use]
    pub fn guardian_id(&self) -> GuardianId {
        GuardianId::from_uuid(self.id)
    }

    /// Find an account by ID.
    pub async fn find_by_id(
        pool: &sqlx::PgPool,
        id: uuid::Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM guardian_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether an account exists.
    pub async fn exists(pool: &sqlx::PgPool, id: uuid::Uuid) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guardian_accounts WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// Find an account by normalized email.
    ///
    /// The caller passes an already-normalized email; comparison is against
    /// the lowercased stored value so stale mixed-case rows still match.
    pub async fn find_by_email(
        pool: &sqlx::PgPool,
        normalized_email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM guardian_accounts
            WHERE LOWER(email) = $1
            ORDER BY id ASC
            LIMIT 1
            ",
        )
        .bind(normalized_email)
        .fetch_optional(pool)
        .await
    }

    /// List all guardian accounts.
    pub async fn list_all(pool: &sqlx::PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM guardian_accounts ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    /// Create a provisional guardian account (no password, active).
    ///
    /// Used by the guardian-from-email materializer. The account is an
    /// activatable identity: credential setup happens through the normal
    /// invitation flow, outside this crate.
    pub async fn create_provisional(
        pool: &sqlx::PgPool,
        input: &NewGuardianAccount,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO guardian_accounts (name, email, display_handle, role, is_active)
            VALUES ($1, $2, $3, 'guardian', true)
            RETURNING *
            ",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.display_handle)
        .fetch_one(pool)
        .await
    }
}
