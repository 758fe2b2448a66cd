//! # Guardianship API
//!
//! REST API endpoints for guardianship reconciliation in clubhaus.
//!
//! This crate is the thin HTTP layer over the reconciliation engine in
//! `clubhaus-guardianship`: it parses requests, calls the engine, and
//! translates engine errors into typed JSON responses.
//!
//! ## Endpoints
//!
//! - `GET    /relationships` - Unified relationship view with orphan report
//! - `GET    /guardians/{guardian_id}/children` - Children of one guardian
//! - `POST   /links` - Create or update a guardian-member link
//! - `DELETE /links/{guardian_id}/{member_id}` - Remove a link
//! - `POST   /guardians/from-email` - Materialize a guardian from a contact email
//! - `POST   /sync` - Promote all email matches to explicit links
//! - `GET    /status` - Relationship and orphan counts
//!
//! ## Example
//!
//! ```ignore
//! use clubhaus_api_guardians::router::{guardianship_routes, GuardianshipState};
//!
//! let app = Router::new()
//!     .nest("/guardianship", guardianship_routes(state));
//! ```

pub mod error;
pub mod handlers;
pub mod router;

// Re-export for convenience
pub use error::{GuardianApiError, Result};
pub use router::{guardianship_routes, GuardianshipState};
