//! OpenAPI document assembly.

use utoipa::OpenApi;

use clubhaus_api_guardians::handlers::guardianship;

/// OpenAPI documentation for the clubhaus API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "clubhaus API",
        description = "Club management API: guardianship reconciliation",
        version = "0.1.0"
    ),
    paths(
        guardianship::list_relationships,
        guardianship::list_children,
        guardianship::create_link,
        guardianship::delete_link,
        guardianship::create_guardian_from_email,
        guardianship::bulk_sync,
        guardianship::database_status,
    ),
    components(schemas(
        guardianship::RelationshipResponse,
        guardianship::OrphanResponse,
        guardianship::AmbiguityResponse,
        guardianship::ListRelationshipsResponse,
        guardianship::ChildResponse,
        guardianship::ListChildrenResponse,
        guardianship::CreateLinkRequest,
        guardianship::LinkResponse,
        guardianship::UnlinkResponse,
        guardianship::CreateGuardianFromEmailRequest,
        guardianship::LinkFailureResponse,
        guardianship::MaterializeResponse,
        guardianship::BulkSyncResponse,
        guardianship::DatabaseStatusResponse,
    )),
    tags(
        (name = "Guardianship", description = "Guardian-member relationship reconciliation")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/guardianship/relationships"));
        assert!(json.contains("/guardianship/sync"));
    }
}
