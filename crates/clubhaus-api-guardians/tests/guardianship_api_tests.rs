//! Guardianship API tests.
//!
//! Covers the response DTO shapes the admin UI depends on and the mapping
//! from engine errors to HTTP status codes.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use clubhaus_api_guardians::error::GuardianApiError;
use clubhaus_api_guardians::handlers::guardianship::{
    AmbiguityResponse, BulkSyncResponse, ChildResponse, DatabaseStatusResponse,
    LinkFailureResponse, ListChildrenResponse, ListRelationshipsResponse, MaterializeResponse,
    OrphanResponse, RelationshipResponse, UnlinkResponse,
};
use clubhaus_core::{GuardianId, MemberId};
use clubhaus_guardianship::{GuardianshipError, StoreError};

// ============================================================================
// Response shape tests
// ============================================================================

#[test]
fn test_relationship_response_structure() {
    let response = RelationshipResponse {
        guardian_id: Uuid::new_v4(),
        member_id: Uuid::new_v4(),
        origin: "direct_link".to_string(),
        guardian_name: "Dana Osei".to_string(),
        guardian_email: "dana@example.com".to_string(),
        member_name: "Noa Osei".to_string(),
        relationship_kind: Some("parent".to_string()),
        can_manage: Some(true),
    };

    assert_eq!(response.origin, "direct_link");
    assert_eq!(response.relationship_kind.as_deref(), Some("parent"));
}

#[test]
fn test_email_match_relationship_has_no_link_metadata() {
    let response = RelationshipResponse {
        guardian_id: Uuid::new_v4(),
        member_id: Uuid::new_v4(),
        origin: "email_match".to_string(),
        guardian_name: "Dana Osei".to_string(),
        guardian_email: "dana@example.com".to_string(),
        member_name: "Noa Osei".to_string(),
        relationship_kind: None,
        can_manage: None,
    };

    assert_eq!(response.origin, "email_match");
    assert!(response.relationship_kind.is_none());
    assert!(response.can_manage.is_none());
}

#[test]
fn test_list_relationships_response_structure() {
    let response = ListRelationshipsResponse {
        relationships: vec![],
        orphans: vec![OrphanResponse {
            member_id: Uuid::new_v4(),
            member_name: "Ada Kim".to_string(),
            contact_email: "x@y.com".to_string(),
            contact_name: None,
        }],
        ambiguities: vec![],
        total: 0,
    };

    assert_eq!(response.total, 0);
    assert_eq!(response.orphans.len(), 1);
    assert_eq!(response.orphans[0].contact_email, "x@y.com");
}

#[test]
fn test_ambiguity_response_keeps_all_candidates() {
    let resolved = Uuid::new_v4();
    let response = AmbiguityResponse {
        member_id: Uuid::new_v4(),
        contact_email: "shared@example.com".to_string(),
        candidate_guardian_ids: vec![resolved, Uuid::new_v4()],
        resolved_to: resolved,
    };

    assert_eq!(response.candidate_guardian_ids.len(), 2);
    assert!(response.candidate_guardian_ids.contains(&response.resolved_to));
}

#[test]
fn test_children_response_structure() {
    let guardian_id = Uuid::new_v4();
    let response = ListChildrenResponse {
        guardian_id,
        children: vec![
            ChildResponse {
                member_id: Uuid::new_v4(),
                first_name: "Noa".to_string(),
                last_name: "Osei".to_string(),
                team_id: None,
                origin: "direct_link".to_string(),
            },
            ChildResponse {
                member_id: Uuid::new_v4(),
                first_name: "Kai".to_string(),
                last_name: "Osei".to_string(),
                team_id: Some(Uuid::new_v4()),
                origin: "email_match".to_string(),
            },
        ],
    };

    assert_eq!(response.guardian_id, guardian_id);
    assert_eq!(response.children.len(), 2);
    assert_eq!(response.children[1].origin, "email_match");
}

#[test]
fn test_materialize_response_partial_failure() {
    let failed_member = Uuid::new_v4();
    let response = MaterializeResponse {
        guardian_id: Uuid::new_v4(),
        created_account: true,
        links_created: 3,
        failed_links: vec![LinkFailureResponse {
            member_id: failed_member,
            message: "serialization conflict".to_string(),
        }],
    };

    // The UI renders "3 of 4 children linked; retry for ..." from this.
    assert_eq!(response.links_created, 3);
    assert_eq!(response.failed_links.len(), 1);
    assert_eq!(response.failed_links[0].member_id, failed_member);
}

#[test]
fn test_bulk_sync_response_structure() {
    let response = BulkSyncResponse {
        total_found: 5,
        synced_relationships: 2,
        orphaned_members: 1,
        ambiguous_matches: 0,
        failed_links: vec![],
    };

    assert_eq!(response.total_found, 5);
    assert_eq!(response.synced_relationships, 2);
    assert!(response.failed_links.is_empty());
}

#[test]
fn test_status_and_unlink_responses() {
    let status = DatabaseStatusResponse {
        total_relationships: 12,
        orphaned_member_count: 3,
    };
    assert_eq!(status.total_relationships, 12);
    assert_eq!(status.orphaned_member_count, 3);

    let noop = UnlinkResponse { removed: false };
    assert!(!noop.removed);
}

// ============================================================================
// Error mapping tests
// ============================================================================

fn status_of(err: GuardianApiError) -> StatusCode {
    err.into_response().status()
}

#[test]
fn test_unknown_ids_map_to_not_found() {
    let guardian = GuardianId::new();
    let member = MemberId::new();

    let err: GuardianApiError = GuardianshipError::UnknownGuardian(guardian).into();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);

    let err: GuardianApiError = GuardianshipError::UnknownMember(member).into();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);
}

#[test]
fn test_no_matching_members_maps_to_not_found() {
    let err: GuardianApiError =
        GuardianshipError::NoMatchingMembers("x@y.com".to_string()).into();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);
}

#[test]
fn test_invalid_email_maps_to_bad_request() {
    let err: GuardianApiError = GuardianshipError::InvalidEmail("nope".to_string()).into();
    assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
}

#[test]
fn test_store_unavailable_maps_to_service_unavailable() {
    let err: GuardianApiError =
        GuardianshipError::StoreUnavailable(StoreError::new("connection refused")).into();
    assert_eq!(status_of(err), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_provisioning_failure_maps_to_bad_gateway() {
    let err: GuardianApiError =
        GuardianshipError::GuardianCreationFailed(StoreError::new("disk full")).into();
    assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
}
