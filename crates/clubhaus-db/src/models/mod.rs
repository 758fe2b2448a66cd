//! Entity models for the clubhaus database.

pub mod guardian_account;
pub mod guardian_link;
pub mod member_record;

pub use guardian_account::{GuardianAccount, NewGuardianAccount};
pub use guardian_link::{GuardianLink, UpsertGuardianLink};
pub use member_record::MemberRecord;
