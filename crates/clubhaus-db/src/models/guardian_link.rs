//! Guardian link entity model.
//!
//! Many-to-many relationship between guardian accounts and member records.
//! Identity is the (guardian_id, member_id) pair; creating a duplicate is
//! an upsert, not an error.

use chrono::{DateTime, Utc};
use clubhaus_core::{GuardianId, MemberId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An explicit guardian-member link.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GuardianLink {
    /// Unique identifier for the link row.
    pub id: uuid::Uuid,

    /// The guardian account.
    pub guardian_id: uuid::Uuid,

    /// The member record.
    pub member_id: uuid::Uuid,

    /// Relationship kind, e.g. "parent" or "guardian".
    pub relationship_kind: String,

    /// Whether the guardian may manage this member.
    pub can_manage: bool,

    /// When the link was created.
    pub created_at: DateTime<Utc>,

    /// When the link was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a link.
#[derive(Debug, Clone)]
pub struct UpsertGuardianLink {
    pub guardian_id: uuid::Uuid,
    pub member_id: uuid::Uuid,
    pub relationship_kind: String,
    pub can_manage: bool,
}

impl GuardianLink {
    /// Get the guardian ID as a typed `GuardianId`.
    #[must_use]
    pub fn guardian(&self) -> GuardianId {
        GuardianId::from_uuid(self.guardian_id)
    }

    /// Get the member ID as a typed `MemberId`.
    #[must_use]
    pub fn member(&self) -> MemberId {
        MemberId::from_uuid(self.member_id)
    }

    /// Create or update the link for a (guardian, member) pair.
    ///
    /// The pair carries a unique constraint, so a second upsert updates
    /// kind and management flag in place instead of inserting a duplicate.
    pub async fn upsert(
        pool: &sqlx::PgPool,
        input: &UpsertGuardianLink,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO guardian_links (guardian_id, member_id, relationship_kind, can_manage)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (guardian_id, member_id) DO UPDATE
                SET relationship_kind = EXCLUDED.relationship_kind,
                    can_manage = EXCLUDED.can_manage,
                    updated_at = NOW()
            RETURNING *
            ",
        )
        .bind(input.guardian_id)
        .bind(input.member_id)
        .bind(&input.relationship_kind)
        .bind(input.can_manage)
        .fetch_one(pool)
        .await
    }

    /// Remove the link for a (guardian, member) pair.
    ///
    /// Returns whether a row was actually removed; absence is not an error.
    pub async fn remove(
        pool: &sqlx::PgPool,
        guardian_id: uuid::Uuid,
        member_id: uuid::Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            DELETE FROM guardian_links
            WHERE guardian_id = $1 AND member_id = $2
            ",
        )
        .bind(guardian_id)
        .bind(member_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all links, ordered for deterministic resolution.
    pub async fn list_all(pool: &sqlx::PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM guardian_links ORDER BY guardian_id ASC, member_id ASC")
            .fetch_all(pool)
            .await
    }

    /// List links for one guardian.
    pub async fn list_for_guardian(
        pool: &sqlx::PgPool,
        guardian_id: uuid::Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM guardian_links
            WHERE guardian_id = $1
            ORDER BY member_id ASC
            ",
        )
        .bind(guardian_id)
        .fetch_all(pool)
        .await
    }

    /// Count all links.
    pub async fn count(pool: &sqlx::PgPool) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guardian_links")
            .fetch_one(pool)
            .await?;
        Ok(result.0)
    }
}
