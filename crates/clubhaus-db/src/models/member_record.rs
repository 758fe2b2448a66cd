//! Member record entity model.
//!
//! Members are the managed individuals (club participants). Each record may
//! carry free-text guardian contact fields; the contact email is the sole
//! implicit signal linking a member to a guardian when no explicit link
//! exists. Reconciliation only ever reads these rows.

use chrono::{DateTime, Utc};
use clubhaus_core::{MemberId, TeamId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A member record managed by club administration.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Unique identifier for the member.
    pub id: uuid::Uuid,

    /// Member's first name.
    pub first_name: String,

    /// Member's last name.
    pub last_name: String,

    /// Free-text guardian contact email. Not validated against guardian
    /// accounts; normalized at comparison time.
    pub guardian_contact_email: Option<String>,

    /// Free-text guardian contact name.
    pub guardian_contact_name: Option<String>,

    /// Free-text guardian contact phone.
    pub guardian_contact_phone: Option<String>,

    /// Team the member belongs to, if any.
    pub team_id: Option<uuid::Uuid>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl MemberRecord {
    /// Get the member ID as a typed `MemberId`.
    #[must_use]
    pub fn member_id(&self) -> MemberId {
        MemberId::from_uuid(self.id)
    }

    /// Get the team ID as a typed `TeamId`, if set.
    #[must_use]
    pub fn team(&self) -> Option<TeamId> {
        self.team_id.map(TeamId::from_uuid)
    }

    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check whether a member exists.
    pub async fn exists(pool: &sqlx::PgPool, id: uuid::Uuid) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM member_records WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// List all member records.
    pub async fn list_all(pool: &sqlx::PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM member_records ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    /// List members whose contact email normalizes to the given value.
    ///
    /// Ascending id order so multi-link operations have a stable
    /// side-effect order.
    pub async fn list_by_contact_email(
        pool: &sqlx::PgPool,
        normalized_email: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM member_records
            WHERE guardian_contact_email IS NOT NULL
              AND LOWER(TRIM(guardian_contact_email)) = $1
            ORDER BY id ASC
            ",
        )
        .bind(normalized_email)
        .fetch_all(pool)
        .await
    }
}
