//! Guardianship reconciliation handlers.
//!
//! Thin wrappers over the reconciliation engine: parse the request, call
//! the service, translate the result into response DTOs.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use clubhaus_core::{GuardianId, MemberId};
use clubhaus_db::GuardianLink;
use clubhaus_guardianship::{
    AmbiguousEmailMatch, BulkSyncReport, DatabaseStatus, GuardianChild, LinkFailure,
    MaterializeReport, OrphanedMember, ReconciledRelationship, RelationshipOrigin,
};

use crate::error::Result;
use crate::router::GuardianshipState;

fn origin_str(origin: RelationshipOrigin) -> &'static str {
    match origin {
        RelationshipOrigin::DirectLink => "direct_link",
        RelationshipOrigin::EmailMatch => "email_match",
    }
}

// ============================================================================
// Request/Response Types for the Relationship View
// ============================================================================

/// One relationship in the unified view.
#[derive(Debug, Serialize, ToSchema)]
pub struct RelationshipResponse {
    pub guardian_id: Uuid,
    pub member_id: Uuid,
    /// "direct_link" or "email_match".
    pub origin: String,
    pub guardian_name: String,
    pub guardian_email: String,
    pub member_name: String,
    pub relationship_kind: Option<String>,
    pub can_manage: Option<bool>,
}

impl From<ReconciledRelationship> for RelationshipResponse {
    fn from(rel: ReconciledRelationship) -> Self {
        Self {
            guardian_id: rel.guardian_id.into_uuid(),
            member_id: rel.member_id.into_uuid(),
            origin: origin_str(rel.origin).to_string(),
            guardian_name: rel.guardian_name,
            guardian_email: rel.guardian_email,
            member_name: rel.member_name,
            relationship_kind: rel.relationship_kind,
            can_manage: rel.can_manage,
        }
    }
}

/// A member whose contact email resolved to no account.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrphanResponse {
    pub member_id: Uuid,
    pub member_name: String,
    pub contact_email: String,
    pub contact_name: Option<String>,
}

impl From<OrphanedMember> for OrphanResponse {
    fn from(orphan: OrphanedMember) -> Self {
        Self {
            member_id: orphan.member_id.into_uuid(),
            member_name: orphan.member_name,
            contact_email: orphan.contact_email,
            contact_name: orphan.contact_name,
        }
    }
}

/// A contact email matching more than one account.
#[derive(Debug, Serialize, ToSchema)]
pub struct AmbiguityResponse {
    pub member_id: Uuid,
    pub contact_email: String,
    pub candidate_guardian_ids: Vec<Uuid>,
    pub resolved_to: Uuid,
}

impl From<AmbiguousEmailMatch> for AmbiguityResponse {
    fn from(ambiguity: AmbiguousEmailMatch) -> Self {
        Self {
            member_id: ambiguity.member_id.into_uuid(),
            contact_email: ambiguity.contact_email,
            candidate_guardian_ids: ambiguity
                .candidates
                .into_iter()
                .map(GuardianId::into_uuid)
                .collect(),
            resolved_to: ambiguity.resolved_to.into_uuid(),
        }
    }
}

/// Response for the full relationship listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListRelationshipsResponse {
    pub relationships: Vec<RelationshipResponse>,
    pub orphans: Vec<OrphanResponse>,
    pub ambiguities: Vec<AmbiguityResponse>,
    pub total: usize,
}

// ============================================================================
// Request/Response Types for the Children View
// ============================================================================

/// One member in the children-of-guardian view.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChildResponse {
    pub member_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub team_id: Option<Uuid>,
    /// "direct_link" or "email_match".
    pub origin: String,
}

impl From<GuardianChild> for ChildResponse {
    fn from(child: GuardianChild) -> Self {
        Self {
            member_id: child.member.id,
            first_name: child.member.first_name,
            last_name: child.member.last_name,
            team_id: child.member.team_id,
            origin: origin_str(child.origin).to_string(),
        }
    }
}

/// Response for listing a guardian's children.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListChildrenResponse {
    pub guardian_id: Uuid,
    pub children: Vec<ChildResponse>,
}

// ============================================================================
// Request/Response Types for Links
// ============================================================================

/// Request to create or update a link.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLinkRequest {
    pub guardian_id: Uuid,
    pub member_id: Uuid,
    /// Relationship kind, defaults to "parent".
    pub relationship_kind: Option<String>,
    /// Management flag, defaults to true.
    pub can_manage: Option<bool>,
}

/// Response for a link.
#[derive(Debug, Serialize, ToSchema)]
pub struct LinkResponse {
    pub id: Uuid,
    pub guardian_id: Uuid,
    pub member_id: Uuid,
    pub relationship_kind: String,
    pub can_manage: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GuardianLink> for LinkResponse {
    fn from(link: GuardianLink) -> Self {
        Self {
            id: link.id,
            guardian_id: link.guardian_id,
            member_id: link.member_id,
            relationship_kind: link.relationship_kind,
            can_manage: link.can_manage,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Response for an unlink operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnlinkResponse {
    /// False when no link existed (a no-op, not an error).
    pub removed: bool,
}

// ============================================================================
// Request/Response Types for Guardian Materialization
// ============================================================================

/// Request to materialize a guardian from a contact email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGuardianFromEmailRequest {
    pub email: String,
}

/// One sibling link that failed to write.
#[derive(Debug, Serialize, ToSchema)]
pub struct LinkFailureResponse {
    pub member_id: Uuid,
    pub message: String,
}

impl From<LinkFailure> for LinkFailureResponse {
    fn from(failure: LinkFailure) -> Self {
        Self {
            member_id: failure.member_id.into_uuid(),
            message: failure.message,
        }
    }
}

/// Response for guardian materialization.
#[derive(Debug, Serialize, ToSchema)]
pub struct MaterializeResponse {
    pub guardian_id: Uuid,
    /// False when an existing account matched the email.
    pub created_account: bool,
    pub links_created: usize,
    /// Non-empty when some sibling links failed; each is retryable.
    pub failed_links: Vec<LinkFailureResponse>,
}

impl From<MaterializeReport> for MaterializeResponse {
    fn from(report: MaterializeReport) -> Self {
        Self {
            guardian_id: report.guardian_id.into_uuid(),
            created_account: report.created_account,
            links_created: report.links_created,
            failed_links: report
                .failed_links
                .into_iter()
                .map(LinkFailureResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Request/Response Types for Sync and Status
// ============================================================================

/// Response for a bulk sync pass.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkSyncResponse {
    pub total_found: usize,
    pub synced_relationships: usize,
    pub orphaned_members: usize,
    pub ambiguous_matches: usize,
    pub failed_links: Vec<LinkFailureResponse>,
}

impl From<BulkSyncReport> for BulkSyncResponse {
    fn from(report: BulkSyncReport) -> Self {
        Self {
            total_found: report.total_found,
            synced_relationships: report.synced_relationships,
            orphaned_members: report.orphaned_members,
            ambiguous_matches: report.ambiguous_matches,
            failed_links: report
                .failed_links
                .into_iter()
                .map(LinkFailureResponse::from)
                .collect(),
        }
    }
}

/// Response for the status summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseStatusResponse {
    pub total_relationships: usize,
    pub orphaned_member_count: usize,
}

impl From<DatabaseStatus> for DatabaseStatusResponse {
    fn from(status: DatabaseStatus) -> Self {
        Self {
            total_relationships: status.total_relationships,
            orphaned_member_count: status.orphaned_member_count,
        }
    }
}

// ============================================================================
// Handler Implementations
// ============================================================================

/// List the unified relationship view.
#[utoipa::path(
    get,
    path = "/guardianship/relationships",
    tag = "Guardianship",
    responses(
        (status = 200, description = "Unified relationship view", body = ListRelationshipsResponse),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn list_relationships(
    State(state): State<GuardianshipState>,
) -> Result<Json<ListRelationshipsResponse>> {
    let report = state.service.list_relationships().await?;

    let relationships: Vec<RelationshipResponse> = report
        .relationships
        .into_iter()
        .map(RelationshipResponse::from)
        .collect();
    let total = relationships.len();

    Ok(Json(ListRelationshipsResponse {
        relationships,
        orphans: report.orphans.into_iter().map(OrphanResponse::from).collect(),
        ambiguities: report
            .ambiguities
            .into_iter()
            .map(AmbiguityResponse::from)
            .collect(),
        total,
    }))
}

/// List the children of one guardian.
#[utoipa::path(
    get,
    path = "/guardianship/guardians/{guardian_id}/children",
    tag = "Guardianship",
    params(
        ("guardian_id" = Uuid, Path, description = "Guardian account ID")
    ),
    responses(
        (status = 200, description = "Members managed by the guardian", body = ListChildrenResponse),
        (status = 404, description = "Guardian not found"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn list_children(
    State(state): State<GuardianshipState>,
    Path(guardian_id): Path<Uuid>,
) -> Result<Json<ListChildrenResponse>> {
    let children = state
        .service
        .children_of(GuardianId::from_uuid(guardian_id))
        .await?;

    Ok(Json(ListChildrenResponse {
        guardian_id,
        children: children.into_iter().map(ChildResponse::from).collect(),
    }))
}

/// Create or update a guardian-member link.
#[utoipa::path(
    post,
    path = "/guardianship/links",
    tag = "Guardianship",
    request_body = CreateLinkRequest,
    responses(
        (status = 200, description = "Resulting link", body = LinkResponse),
        (status = 404, description = "Guardian or member not found"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn create_link(
    State(state): State<GuardianshipState>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<Json<LinkResponse>> {
    let link = state
        .service
        .link(
            GuardianId::from_uuid(request.guardian_id),
            MemberId::from_uuid(request.member_id),
            request.relationship_kind,
            request.can_manage,
        )
        .await?;

    Ok(Json(LinkResponse::from(link)))
}

/// Remove a guardian-member link.
#[utoipa::path(
    delete,
    path = "/guardianship/links/{guardian_id}/{member_id}",
    tag = "Guardianship",
    params(
        ("guardian_id" = Uuid, Path, description = "Guardian account ID"),
        ("member_id" = Uuid, Path, description = "Member record ID")
    ),
    responses(
        (status = 200, description = "Removal outcome", body = UnlinkResponse),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn delete_link(
    State(state): State<GuardianshipState>,
    Path((guardian_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<UnlinkResponse>> {
    let removed = state
        .service
        .unlink(
            GuardianId::from_uuid(guardian_id),
            MemberId::from_uuid(member_id),
        )
        .await?;

    Ok(Json(UnlinkResponse { removed }))
}

/// Materialize a guardian account from an orphaned contact email.
#[utoipa::path(
    post,
    path = "/guardianship/guardians/from-email",
    tag = "Guardianship",
    request_body = CreateGuardianFromEmailRequest,
    responses(
        (status = 200, description = "Materialization outcome", body = MaterializeResponse),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "No member carries that contact email"),
        (status = 502, description = "Account provisioning failed"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn create_guardian_from_email(
    State(state): State<GuardianshipState>,
    Json(request): Json<CreateGuardianFromEmailRequest>,
) -> Result<Json<MaterializeResponse>> {
    let report = state
        .service
        .create_guardian_from_email(&request.email)
        .await?;

    Ok(Json(MaterializeResponse::from(report)))
}

/// Promote all current email matches to explicit links.
#[utoipa::path(
    post,
    path = "/guardianship/sync",
    tag = "Guardianship",
    responses(
        (status = 200, description = "Sync summary", body = BulkSyncResponse),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn bulk_sync(
    State(state): State<GuardianshipState>,
) -> Result<Json<BulkSyncResponse>> {
    let report = state.service.bulk_sync().await?;
    Ok(Json(BulkSyncResponse::from(report)))
}

/// Relationship and orphan counts for the admin dashboard.
#[utoipa::path(
    get,
    path = "/guardianship/status",
    tag = "Guardianship",
    responses(
        (status = 200, description = "Status summary", body = DatabaseStatusResponse),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn database_status(
    State(state): State<GuardianshipState>,
) -> Result<Json<DatabaseStatusResponse>> {
    let status = state.service.database_status().await?;
    Ok(Json(DatabaseStatusResponse::from(status)))
}
