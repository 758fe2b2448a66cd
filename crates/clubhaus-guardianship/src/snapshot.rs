//! Immutable snapshot of the guardianship data.
//!
//! One reconciliation pass works against a single [`Snapshot`]: the
//! guardian accounts, member records, and explicit links, plus a
//! normalized-email index over accounts. A failed read fails the whole
//! load; the engine never reconciles against a partial snapshot.

use std::collections::BTreeMap;

use clubhaus_core::{GuardianId, MemberId};
use clubhaus_db::{GuardianAccount, GuardianLink, MemberRecord};

use crate::email::normalize_email;
use crate::error::{GuardianshipError, Result};
use crate::store::GuardianshipStore;

/// In-memory view of all reconciliation-relevant rows.
///
/// BTree maps keep iteration (and therefore resolution and side-effect
/// order) deterministic: guardians and members ascend by id, links by
/// (guardian, member) pair.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    guardians: BTreeMap<GuardianId, GuardianAccount>,
    members: BTreeMap<MemberId, MemberRecord>,
    links: BTreeMap<(GuardianId, MemberId), GuardianLink>,
    /// Normalized email -> candidate accounts, ascending id. The first
    /// entry is the resolver's tie-break winner.
    email_index: BTreeMap<String, Vec<GuardianId>>,
}

impl Snapshot {
    /// Load a full snapshot through the store.
    ///
    /// Any read failure maps to [`GuardianshipError::StoreUnavailable`]
    /// and no snapshot is produced.
    pub async fn load<S: GuardianshipStore + ?Sized>(store: &S) -> Result<Self> {
        let guardians = store
            .fetch_guardians()
            .await
            .map_err(GuardianshipError::StoreUnavailable)?;
        let members = store
            .fetch_members()
            .await
            .map_err(GuardianshipError::StoreUnavailable)?;
        let links = store
            .fetch_links()
            .await
            .map_err(GuardianshipError::StoreUnavailable)?;

        Ok(Self::from_rows(guardians, members, links))
    }

    /// Assemble a snapshot from raw rows (pure; used by `load` and tests).
    #[must_use]
    pub fn from_rows(
        guardians: Vec<GuardianAccount>,
        members: Vec<MemberRecord>,
        links: Vec<GuardianLink>,
    ) -> Self {
        let guardians: BTreeMap<GuardianId, GuardianAccount> = guardians
            .into_iter()
            .map(|g| (g.guardian_id(), g))
            .collect();

        let mut email_index: BTreeMap<String, Vec<GuardianId>> = BTreeMap::new();
        // BTreeMap iteration ascends by id, so candidate lists come out
        // pre-sorted with the smallest id first.
        for (id, account) in &guardians {
            let normalized = normalize_email(&account.email);
            if normalized.is_empty() {
                continue;
            }
            email_index.entry(normalized).or_default().push(*id);
        }

        Self {
            guardians,
            members: members.into_iter().map(|m| (m.member_id(), m)).collect(),
            links: links
                .into_iter()
                .map(|l| ((l.guardian(), l.member()), l))
                .collect(),
            email_index,
        }
    }

    /// Restrict the snapshot to one guardian for the children-of view.
    ///
    /// Keeps every account (so email lookups stay complete), the target
    /// guardian's links, and the members reachable from the target either
    /// by link or by contact-email match.
    #[must_use]
    pub fn scoped_to(&self, guardian: GuardianId) -> Self {
        let guardian_email = self
            .guardians
            .get(&guardian)
            .map(|g| normalize_email(&g.email));

        let links: BTreeMap<(GuardianId, MemberId), GuardianLink> = self
            .links
            .iter()
            .filter(|((g, _), _)| *g == guardian)
            .map(|(k, v)| (*k, v.clone()))
            .collect();

        let members: BTreeMap<MemberId, MemberRecord> = self
            .members
            .iter()
            .filter(|(id, member)| {
                links.contains_key(&(guardian, **id))
                    || match (&guardian_email, &member.guardian_contact_email) {
                        (Some(ge), Some(ce)) => normalize_email(ce) == *ge,
                        _ => false,
                    }
            })
            .map(|(k, v)| (*k, v.clone()))
            .collect();

        Self {
            guardians: self.guardians.clone(),
            members,
            links,
            email_index: self.email_index.clone(),
        }
    }

    /// Guardian accounts by id.
    #[must_use]
    pub fn guardians(&self) -> &BTreeMap<GuardianId, GuardianAccount> {
        &self.guardians
    }

    /// Member records by id.
    #[must_use]
    pub fn members(&self) -> &BTreeMap<MemberId, MemberRecord> {
        &self.members
    }

    /// Explicit links by (guardian, member) pair.
    #[must_use]
    pub fn links(&self) -> &BTreeMap<(GuardianId, MemberId), GuardianLink> {
        &self.links
    }

    /// Candidate accounts for a normalized email, ascending id.
    #[must_use]
    pub fn guardians_by_email(&self, normalized_email: &str) -> &[GuardianId] {
        self.email_index
            .get(normalized_email)
            .map_or(&[], Vec::as_slice)
    }

    /// Whether an explicit link exists for the pair.
    #[must_use]
    pub fn has_link(&self, guardian: GuardianId, member: MemberId) -> bool {
        self.links.contains_key(&(guardian, member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn account(id: u128, email: &str) -> GuardianAccount {
        GuardianAccount {
            id: Uuid::from_u128(id),
            name: format!("Guardian {id}"),
            email: email.to_string(),
            display_handle: None,
            role: "guardian".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_email_index_candidates_sorted_ascending() {
        // Two stale rows sharing one normalized email.
        let snapshot = Snapshot::from_rows(
            vec![account(2, "Shared@Example.com"), account(1, "shared@example.com")],
            vec![],
            vec![],
        );

        let candidates = snapshot.guardians_by_email("shared@example.com");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], GuardianId::from_uuid(Uuid::from_u128(1)));
        assert_eq!(candidates[1], GuardianId::from_uuid(Uuid::from_u128(2)));
    }

    #[test]
    fn test_email_index_normalizes_account_email() {
        let snapshot = Snapshot::from_rows(vec![account(1, "  Mixed.Case@Example.COM ")], vec![], vec![]);
        assert_eq!(snapshot.guardians_by_email("mixed.case@example.com").len(), 1);
        assert!(snapshot.guardians_by_email("Mixed.Case@Example.COM").is_empty());
    }

    #[test]
    fn test_unknown_email_has_no_candidates() {
        let snapshot = Snapshot::from_rows(vec![account(1, "a@b.c")], vec![], vec![]);
        assert!(snapshot.guardians_by_email("missing@b.c").is_empty());
    }
}
