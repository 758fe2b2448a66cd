//! Contact email normalization.
//!
//! Free-text guardian contact emails and account login emails are compared
//! on their normalized form only. Normalization is deliberately minimal:
//! trim and lowercase. Anything fuzzier (name matching, typo tolerance) is
//! a product decision, not an engineering default.

/// Normalize an email for comparison: trim whitespace, lowercase.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a normalized email is usable as a matching key.
#[must_use]
pub fn is_plausible_email(normalized: &str) -> bool {
    !normalized.is_empty() && normalized.contains('@') && !normalized.starts_with('@')
}

/// Fallback guardian name derived from the email local part.
///
/// Used when an orphaned member carries no `guardian_contact_name`.
#[must_use]
pub fn placeholder_name(normalized_email: &str) -> String {
    match normalized_email.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => "Guardian".to_string(),
    }
}
