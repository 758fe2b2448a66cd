//! Router configuration for the guardianship API.

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use clubhaus_guardianship::{GuardianshipService, PgGuardianshipStore};

use crate::handlers;

/// The service type the HTTP layer runs against in production.
pub type PgGuardianshipService = GuardianshipService<PgGuardianshipStore>;

/// Shared state for guardianship API handlers.
#[derive(Clone)]
pub struct GuardianshipState {
    pub service: Arc<PgGuardianshipService>,
}

impl GuardianshipState {
    /// Create a new guardianship state.
    pub fn new(service: Arc<PgGuardianshipService>) -> Self {
        Self { service }
    }
}

/// Create the guardianship API router.
///
/// # Example
///
/// ```ignore
/// use clubhaus_api_guardians::router::{guardianship_routes, GuardianshipState};
///
/// let state = GuardianshipState::new(Arc::new(service));
/// let app = Router::new()
///     .nest("/guardianship", guardianship_routes(state));
/// ```
pub fn guardianship_routes(state: GuardianshipState) -> Router {
    Router::new()
        // Unified relationship view (routes are relative to where the
        // router is nested)
        .route("/relationships", get(handlers::list_relationships))
        .route(
            "/guardians/:guardian_id/children",
            get(handlers::list_children),
        )
        // Link mutations
        .route("/links", post(handlers::create_link))
        .route(
            "/links/:guardian_id/:member_id",
            delete(handlers::delete_link),
        )
        // Repair operations
        .route(
            "/guardians/from-email",
            post(handlers::create_guardian_from_email),
        )
        .route("/sync", post(handlers::bulk_sync))
        // Dashboard summary
        .route("/status", get(handlers::database_status))
        .with_state(state)
}
