//! Guardianship reconciliation service.
//!
//! The operations exposed to the API layer: listing the unified view,
//! link/unlink mutations, guardian-from-email materialization, bulk sync,
//! and the status summary. Each operation runs to completion within one
//! request; multi-link operations write member-by-member in ascending
//! member id order so repeated runs produce identical side-effect order.

use serde::Serialize;
use tracing::instrument;

use clubhaus_core::{GuardianId, MemberId};
use clubhaus_db::{GuardianLink, MemberRecord, NewGuardianAccount, UpsertGuardianLink};

use crate::email::{is_plausible_email, normalize_email, placeholder_name};
use crate::error::{GuardianshipError, Result};
use crate::resolver::{resolve, RelationshipOrigin, ResolutionReport};
use crate::snapshot::Snapshot;
use crate::store::GuardianshipStore;

/// Default relationship kind for links created without explicit metadata.
pub const DEFAULT_RELATIONSHIP_KIND: &str = "parent";

/// A member in the children-of-guardian view.
#[derive(Debug, Clone, Serialize)]
pub struct GuardianChild {
    pub member: MemberRecord,
    pub origin: RelationshipOrigin,
}

/// One link write that failed inside a multi-link operation.
///
/// Link writes are independent and idempotent, so failures are collected
/// and reported instead of aborting the remaining writes; the caller can
/// retry just the failed members.
#[derive(Debug, Clone, Serialize)]
pub struct LinkFailure {
    pub member_id: MemberId,
    pub message: String,
}

/// Result of materializing a guardian account from a contact email.
#[derive(Debug, Clone, Serialize)]
pub struct MaterializeReport {
    /// The created or looked-up account.
    pub guardian_id: GuardianId,
    /// Whether a new account was created (false: an existing one matched).
    pub created_account: bool,
    /// Links successfully written, including pre-existing pairs updated
    /// in place.
    pub links_created: usize,
    /// Sibling links that failed to write.
    pub failed_links: Vec<LinkFailure>,
}

impl MaterializeReport {
    /// Whether some sibling links failed after the account was secured.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failed_links.is_empty()
    }
}

/// Result of a bulk sync pass.
#[derive(Debug, Clone, Serialize)]
pub struct BulkSyncReport {
    /// All resolved relationships, both origins.
    pub total_found: usize,
    /// Email matches newly promoted to explicit links.
    pub synced_relationships: usize,
    /// Members left for manual guardian-from-email action.
    pub orphaned_members: usize,
    /// Contact emails matching more than one account.
    pub ambiguous_matches: usize,
    /// Promotions that failed to write.
    pub failed_links: Vec<LinkFailure>,
}

/// Summary counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DatabaseStatus {
    pub total_relationships: usize,
    pub orphaned_member_count: usize,
}

/// The reconciliation engine service.
///
/// Generic over the store so production uses PostgreSQL while tests use
/// an in-memory fake behind the same [`GuardianshipStore`] interface.
pub struct GuardianshipService<S> {
    store: S,
}

impl<S: GuardianshipStore> GuardianshipService<S> {
    /// Create a service over a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve the full unified relationship view.
    #[instrument(skip(self))]
    pub async fn list_relationships(&self) -> Result<ResolutionReport> {
        let snapshot = Snapshot::load(&self.store).await?;
        Ok(resolve(&snapshot))
    }

    /// Members managed by one guardian, with the origin of each
    /// relationship.
    #[instrument(skip(self))]
    pub async fn children_of(&self, guardian: GuardianId) -> Result<Vec<GuardianChild>> {
        if !self
            .store
            .guardian_exists(guardian)
            .await
            .map_err(GuardianshipError::StoreUnavailable)?
        {
            return Err(GuardianshipError::UnknownGuardian(guardian));
        }

        let snapshot = Snapshot::load(&self.store).await?.scoped_to(guardian);
        let report = resolve(&snapshot);

        Ok(report
            .relationships
            .into_iter()
            .filter(|r| r.guardian_id == guardian)
            .filter_map(|r| {
                snapshot.members().get(&r.member_id).map(|m| GuardianChild {
                    member: m.clone(),
                    origin: r.origin,
                })
            })
            .collect())
    }

    /// Create or update the explicit link for a (guardian, member) pair.
    ///
    /// Idempotent: a second call updates kind and management flag in place.
    /// Both ids are re-validated against the store at write time rather
    /// than trusted from a snapshot.
    #[instrument(skip(self))]
    pub async fn link(
        &self,
        guardian: GuardianId,
        member: MemberId,
        kind: Option<String>,
        can_manage: Option<bool>,
    ) -> Result<GuardianLink> {
        if !self
            .store
            .guardian_exists(guardian)
            .await
            .map_err(GuardianshipError::StoreUnavailable)?
        {
            return Err(GuardianshipError::UnknownGuardian(guardian));
        }
        if !self
            .store
            .member_exists(member)
            .await
            .map_err(GuardianshipError::StoreUnavailable)?
        {
            return Err(GuardianshipError::UnknownMember(member));
        }

        let link = self
            .store
            .upsert_link(UpsertGuardianLink {
                guardian_id: guardian.into_uuid(),
                member_id: member.into_uuid(),
                relationship_kind: kind
                    .unwrap_or_else(|| DEFAULT_RELATIONSHIP_KIND.to_string()),
                can_manage: can_manage.unwrap_or(true),
            })
            .await
            .map_err(GuardianshipError::StoreUnavailable)?;

        tracing::info!(
            guardian_id = %guardian,
            member_id = %member,
            kind = %link.relationship_kind,
            "Guardian link upserted"
        );

        Ok(link)
    }

    /// Remove the explicit link for a (guardian, member) pair.
    ///
    /// Returns whether a link was removed; absence is a no-op, not an
    /// error. Contact-email text on the member is left untouched, so the
    /// resolver may still report the pair as an email match afterwards.
    #[instrument(skip(self))]
    pub async fn unlink(&self, guardian: GuardianId, member: MemberId) -> Result<bool> {
        let removed = self
            .store
            .remove_link(guardian, member)
            .await
            .map_err(GuardianshipError::StoreUnavailable)?;

        if removed {
            tracing::info!(
                guardian_id = %guardian,
                member_id = %member,
                "Guardian link removed"
            );
        }

        Ok(removed)
    }

    /// Turn an orphaned contact email into a first-class guardian account
    /// and link every member sharing that email.
    ///
    /// 1. Normalize and validate the email.
    /// 2. Find the members carrying it; nothing to do means
    ///    [`GuardianshipError::NoMatchingMembers`].
    /// 3. Re-check the store for an existing account with that email
    ///    (another process may have created one since the caller looked),
    ///    otherwise create a provisional guardian account. Creation
    ///    failure aborts before any link is written.
    /// 4. Link each member ascending by id; individual failures are
    ///    collected into the report, not rolled back. Each link write is
    ///    independently idempotent and retryable.
    #[instrument(skip(self))]
    pub async fn create_guardian_from_email(&self, email: &str) -> Result<MaterializeReport> {
        let normalized = normalize_email(email);
        if !is_plausible_email(&normalized) {
            return Err(GuardianshipError::InvalidEmail(email.to_string()));
        }

        let members = self
            .store
            .members_by_contact_email(&normalized)
            .await
            .map_err(GuardianshipError::StoreUnavailable)?;
        if members.is_empty() {
            return Err(GuardianshipError::NoMatchingMembers(normalized));
        }

        let existing = self
            .store
            .find_guardian_by_email(&normalized)
            .await
            .map_err(GuardianshipError::StoreUnavailable)?;

        let (account, created_account) = match existing {
            Some(account) => (account, false),
            None => {
                let name = members
                    .iter()
                    .find_map(|m| {
                        m.guardian_contact_name
                            .as_deref()
                            .map(str::trim)
                            .filter(|n| !n.is_empty())
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| placeholder_name(&normalized));

                let account = self
                    .store
                    .create_guardian(NewGuardianAccount {
                        name,
                        email: normalized.clone(),
                        display_handle: None,
                    })
                    .await
                    .map_err(GuardianshipError::GuardianCreationFailed)?;

                tracing::info!(
                    guardian_id = %account.guardian_id(),
                    email = %normalized,
                    "Provisional guardian account created from contact email"
                );

                (account, true)
            }
        };

        let guardian_id = account.guardian_id();
        let mut links_created = 0;
        let mut failed_links = Vec::new();

        for member in &members {
            let result = self
                .store
                .upsert_link(UpsertGuardianLink {
                    guardian_id: guardian_id.into_uuid(),
                    member_id: member.id,
                    relationship_kind: DEFAULT_RELATIONSHIP_KIND.to_string(),
                    can_manage: true,
                })
                .await;

            match result {
                Ok(_) => links_created += 1,
                Err(e) => {
                    tracing::warn!(
                        guardian_id = %guardian_id,
                        member_id = %member.member_id(),
                        error = %e,
                        "Sibling link failed during guardian materialization"
                    );
                    failed_links.push(LinkFailure {
                        member_id: member.member_id(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            guardian_id = %guardian_id,
            created_account = created_account,
            links_created = links_created,
            failed = failed_links.len(),
            "Guardian-from-email materialization finished"
        );

        Ok(MaterializeReport {
            guardian_id,
            created_account,
            links_created,
            failed_links,
        })
    }

    /// Promote every current email match to an explicit link in one pass.
    ///
    /// Direct links are left untouched and orphans are only counted:
    /// bulk sync never invents guardian accounts; that stays an explicit,
    /// reviewable action via [`Self::create_guardian_from_email`].
    /// Running bulk sync twice in a row promotes nothing on the second
    /// run.
    #[instrument(skip(self))]
    pub async fn bulk_sync(&self) -> Result<BulkSyncReport> {
        let snapshot = Snapshot::load(&self.store).await?;
        let report = resolve(&snapshot);

        let total_found = report.relationships.len();
        let mut synced = 0;
        let mut failed_links = Vec::new();

        // Resolver output ascends by member id within the email matches,
        // giving the stable side-effect order the audit trail expects.
        for rel in report.with_origin(RelationshipOrigin::EmailMatch) {
            match self
                .link(rel.guardian_id, rel.member_id, None, None)
                .await
            {
                Ok(_) => synced += 1,
                Err(e) => {
                    tracing::warn!(
                        guardian_id = %rel.guardian_id,
                        member_id = %rel.member_id,
                        error = %e,
                        "Bulk sync promotion failed"
                    );
                    failed_links.push(LinkFailure {
                        member_id: rel.member_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            total_found = total_found,
            synced = synced,
            orphaned = report.orphans.len(),
            "Bulk sync completed"
        );

        Ok(BulkSyncReport {
            total_found,
            synced_relationships: synced,
            orphaned_members: report.orphans.len(),
            ambiguous_matches: report.ambiguities.len(),
            failed_links,
        })
    }

    /// Summary counts for the admin dashboard.
    #[instrument(skip(self))]
    pub async fn database_status(&self) -> Result<DatabaseStatus> {
        let snapshot = Snapshot::load(&self.store).await?;
        let report = resolve(&snapshot);

        Ok(DatabaseStatus {
            total_relationships: report.relationships.len(),
            orphaned_member_count: report.orphans.len(),
        })
    }
}
