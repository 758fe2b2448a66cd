//! Guardianship API handlers.

pub mod guardianship;

pub use guardianship::{
    bulk_sync, create_guardian_from_email, create_link, database_status, delete_link,
    list_children, list_relationships,
};
