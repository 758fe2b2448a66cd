//! # clubhaus-core
//!
//! Core types shared across the clubhaus workspace.
//!
//! Currently this crate provides the strongly typed identifier types used
//! throughout the club-management platform. Keeping them in a leaf crate
//! means every other crate agrees on what a "guardian id" is without
//! depending on the persistence layer.

pub mod ids;

pub use ids::{GuardianId, MemberId, ParseIdError, TeamId};
