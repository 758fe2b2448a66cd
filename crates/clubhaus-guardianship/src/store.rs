//! Store interface for the reconciliation engine.
//!
//! The engine never touches a database handle directly. All reads and
//! writes go through [`GuardianshipStore`], so the same engine runs
//! against PostgreSQL in production and an in-memory fake in tests.

use async_trait::async_trait;
use clubhaus_core::{GuardianId, MemberId};
use clubhaus_db::{GuardianAccount, GuardianLink, MemberRecord, NewGuardianAccount, UpsertGuardianLink};
use sqlx::PgPool;

use crate::error::StoreError;

/// Access to the identity and relationship stores, as the engine needs them.
///
/// Reads return full row sets; the snapshot loader assembles and indexes
/// them. Writes are individually idempotent: `upsert_link` updates in
/// place on a duplicate pair, `remove_link` reports absence instead of
/// failing.
#[async_trait]
pub trait GuardianshipStore: Send + Sync {
    /// All guardian accounts.
    async fn fetch_guardians(&self) -> Result<Vec<GuardianAccount>, StoreError>;

    /// All member records.
    async fn fetch_members(&self) -> Result<Vec<MemberRecord>, StoreError>;

    /// All explicit guardian-member links.
    async fn fetch_links(&self) -> Result<Vec<GuardianLink>, StoreError>;

    /// Whether a guardian account currently exists.
    async fn guardian_exists(&self, id: GuardianId) -> Result<bool, StoreError>;

    /// Whether a member record currently exists.
    async fn member_exists(&self, id: MemberId) -> Result<bool, StoreError>;

    /// Look up a guardian account by normalized email.
    ///
    /// If several rows share a normalized email (stale data), the one with
    /// the smallest id wins, matching the resolver's tie-break.
    async fn find_guardian_by_email(
        &self,
        normalized_email: &str,
    ) -> Result<Option<GuardianAccount>, StoreError>;

    /// Members whose contact email normalizes to the given value,
    /// ascending member id.
    async fn members_by_contact_email(
        &self,
        normalized_email: &str,
    ) -> Result<Vec<MemberRecord>, StoreError>;

    /// Create a provisional guardian account.
    async fn create_guardian(
        &self,
        input: NewGuardianAccount,
    ) -> Result<GuardianAccount, StoreError>;

    /// Create or update the link for a (guardian, member) pair.
    async fn upsert_link(&self, input: UpsertGuardianLink) -> Result<GuardianLink, StoreError>;

    /// Remove the link for a (guardian, member) pair. Returns whether a
    /// row was removed.
    async fn remove_link(&self, guardian: GuardianId, member: MemberId)
        -> Result<bool, StoreError>;
}

/// PostgreSQL-backed store, delegating to the `clubhaus-db` models.
#[derive(Clone)]
pub struct PgGuardianshipStore {
    pool: PgPool,
}

impl PgGuardianshipStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuardianshipStore for PgGuardianshipStore {
    async fn fetch_guardians(&self) -> Result<Vec<GuardianAccount>, StoreError> {
        Ok(GuardianAccount::list_all(&self.pool).await?)
    }

    async fn fetch_members(&self) -> Result<Vec<MemberRecord>, StoreError> {
        Ok(MemberRecord::list_all(&self.pool).await?)
    }

    async fn fetch_links(&self) -> Result<Vec<GuardianLink>, StoreError> {
        Ok(GuardianLink::list_all(&self.pool).await?)
    }

    async fn guardian_exists(&self, id: GuardianId) -> Result<bool, StoreError> {
        Ok(GuardianAccount::exists(&self.pool, id.into_uuid()).await?)
    }

    async fn member_exists(&self, id: MemberId) -> Result<bool, StoreError> {
        Ok(MemberRecord::exists(&self.pool, id.into_uuid()).await?)
    }

    async fn find_guardian_by_email(
        &self,
        normalized_email: &str,
    ) -> Result<Option<GuardianAccount>, StoreError> {
        Ok(GuardianAccount::find_by_email(&self.pool, normalized_email).await?)
    }

    async fn members_by_contact_email(
        &self,
        normalized_email: &str,
    ) -> Result<Vec<MemberRecord>, StoreError> {
        Ok(MemberRecord::list_by_contact_email(&self.pool, normalized_email).await?)
    }

    async fn create_guardian(
        &self,
        input: NewGuardianAccount,
    ) -> Result<GuardianAccount, StoreError> {
        Ok(GuardianAccount::create_provisional(&self.pool, &input).await?)
    }

    async fn upsert_link(&self, input: UpsertGuardianLink) -> Result<GuardianLink, StoreError> {
        Ok(GuardianLink::upsert(&self.pool, &input).await?)
    }

    async fn remove_link(
        &self,
        guardian: GuardianId,
        member: MemberId,
    ) -> Result<bool, StoreError> {
        Ok(GuardianLink::remove(&self.pool, guardian.into_uuid(), member.into_uuid()).await?)
    }
}
