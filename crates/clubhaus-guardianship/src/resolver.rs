//! Relationship resolution.
//!
//! Pure pass over a [`Snapshot`] producing the unified relationship view:
//! explicit links first, then contact-email matches for pairs not already
//! covered, orphans for contact emails that resolve to no account, and an
//! ambiguity record whenever one email matches several accounts.
//!
//! Resolution is deterministic and side-effect free; running it twice on
//! the same snapshot yields identical output.

use serde::Serialize;

use clubhaus_core::{GuardianId, MemberId};

use crate::email::normalize_email;
use crate::snapshot::Snapshot;

/// How a relationship was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipOrigin {
    /// An explicit guardian link row exists.
    DirectLink,
    /// Inferred solely from the member's contact email matching an
    /// account's login email.
    EmailMatch,
}

/// One entry in the unified relationship view.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledRelationship {
    pub guardian_id: GuardianId,
    pub member_id: MemberId,
    pub origin: RelationshipOrigin,
    /// Denormalized display fields for the API layer.
    pub guardian_name: String,
    pub guardian_email: String,
    pub member_name: String,
    /// Link metadata, present for direct links only.
    pub relationship_kind: Option<String>,
    pub can_manage: Option<bool>,
}

/// A member whose contact email matches no guardian account.
#[derive(Debug, Clone, Serialize)]
pub struct OrphanedMember {
    pub member_id: MemberId,
    pub member_name: String,
    /// The normalized contact email that failed to resolve.
    pub contact_email: String,
    pub contact_name: Option<String>,
}

/// One contact email matching more than one guardian account.
///
/// The resolver still resolves deterministically (smallest account id),
/// but surfaces the ambiguity so an operator can disambiguate by hand.
#[derive(Debug, Clone, Serialize)]
pub struct AmbiguousEmailMatch {
    pub member_id: MemberId,
    pub contact_email: String,
    /// Every matching account, ascending id.
    pub candidates: Vec<GuardianId>,
    /// The account the resolver picked.
    pub resolved_to: GuardianId,
}

/// Full output of one resolution pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionReport {
    pub relationships: Vec<ReconciledRelationship>,
    pub orphans: Vec<OrphanedMember>,
    pub ambiguities: Vec<AmbiguousEmailMatch>,
}

impl ResolutionReport {
    /// Relationships with the given origin.
    pub fn with_origin(
        &self,
        origin: RelationshipOrigin,
    ) -> impl Iterator<Item = &ReconciledRelationship> {
        self.relationships
            .iter()
            .filter(move |r| r.origin == origin)
    }
}

/// Resolve the unified relationship view for a snapshot.
///
/// Links whose guardian or member row is missing from the snapshot are
/// skipped; foreign keys prevent that in the real store.
#[must_use]
pub fn resolve(snapshot: &Snapshot) -> ResolutionReport {
    let mut report = ResolutionReport::default();

    // Step 1: every explicit link is a DirectLink relationship. Link order
    // (guardian, member) is the snapshot's BTree order, so output is stable.
    for ((guardian_id, member_id), link) in snapshot.links() {
        let (Some(guardian), Some(member)) = (
            snapshot.guardians().get(guardian_id),
            snapshot.members().get(member_id),
        ) else {
            continue;
        };

        report.relationships.push(ReconciledRelationship {
            guardian_id: *guardian_id,
            member_id: *member_id,
            origin: RelationshipOrigin::DirectLink,
            guardian_name: guardian.name.clone(),
            guardian_email: guardian.email.clone(),
            member_name: member.full_name(),
            relationship_kind: Some(link.relationship_kind.clone()),
            can_manage: Some(link.can_manage),
        });
    }

    // Step 2: members with a contact email, ascending member id.
    for (member_id, member) in snapshot.members() {
        let Some(raw_email) = member.guardian_contact_email.as_deref() else {
            continue;
        };
        let normalized = normalize_email(raw_email);
        if normalized.is_empty() {
            continue;
        }

        let candidates = snapshot.guardians_by_email(&normalized);
        let Some(resolved) = candidates.first().copied() else {
            report.orphans.push(OrphanedMember {
                member_id: *member_id,
                member_name: member.full_name(),
                contact_email: normalized,
                contact_name: member.guardian_contact_name.clone(),
            });
            continue;
        };

        // Duplicate normalized account emails should not occur, but stale
        // rows are possible; record the tie-break instead of picking
        // silently.
        if candidates.len() > 1 {
            report.ambiguities.push(AmbiguousEmailMatch {
                member_id: *member_id,
                contact_email: normalized.clone(),
                candidates: candidates.to_vec(),
                resolved_to: resolved,
            });
        }

        // Precedence: a pair already covered by a direct link is reported
        // once, as DirectLink.
        if snapshot.has_link(resolved, *member_id) {
            continue;
        }

        // The email index only holds ids present in the guardians map.
        let Some(guardian) = snapshot.guardians().get(&resolved) else {
            continue;
        };

        report.relationships.push(ReconciledRelationship {
            guardian_id: resolved,
            member_id: *member_id,
            origin: RelationshipOrigin::EmailMatch,
            guardian_name: guardian.name.clone(),
            guardian_email: guardian.email.clone(),
            member_name: member.full_name(),
            relationship_kind: None,
            can_manage: None,
        });
    }

    report
}
