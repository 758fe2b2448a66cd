//! # clubhaus-guardianship
//!
//! The parent-child relationship reconciliation engine.
//!
//! Guardianship facts live in two partially-overlapping places: the
//! explicit `guardian_links` table, and the free-text guardian contact
//! fields on member records. This crate keeps the two consistent:
//!
//! 1. **Resolution**: compute the unified relationship view over an
//!    immutable [`Snapshot`], with explicit links taking precedence over
//!    contact-email matches, and members whose contact email resolves to
//!    no account reported as orphaned.
//! 2. **Repair**: idempotent link/unlink mutations, materialization of a
//!    guardian account from an orphaned contact email (linking every
//!    sibling that shares the email in one pass), and a bulk sync that
//!    promotes all current email matches to explicit links.
//!
//! All store access goes through the [`GuardianshipStore`] trait so the
//! engine runs unchanged against PostgreSQL ([`PgGuardianshipStore`]) or
//! an in-memory fake in tests.

pub mod email;
pub mod error;
pub mod resolver;
pub mod service;
pub mod snapshot;
pub mod store;

pub use email::{normalize_email, placeholder_name};
pub use error::{GuardianshipError, Result, StoreError};
pub use resolver::{
    resolve, AmbiguousEmailMatch, OrphanedMember, ReconciledRelationship, RelationshipOrigin,
    ResolutionReport,
};
pub use service::{
    BulkSyncReport, DatabaseStatus, GuardianChild, GuardianshipService, LinkFailure,
    MaterializeReport,
};
pub use snapshot::Snapshot;
pub use store::{GuardianshipStore, PgGuardianshipStore};
