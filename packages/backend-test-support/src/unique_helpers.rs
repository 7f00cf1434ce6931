//! Test helpers for generating unique test data.
//!
//! Integration tests may share one Postgres database, so every user they
//! create needs an email and display name no other run has used.

use ulid::Ulid;

/// Random suffix short enough to fit display-name limits (32 chars).
fn short_suffix() -> String {
    let ulid = Ulid::new().to_string().to_lowercase();
    // The trailing 16 chars of a ULID are random; twelve is plenty here.
    ulid[ulid.len() - 12..].to_string()
}

/// Unique display name in the form `{prefix}-{suffix}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_name;
///
/// let a = unique_name("alice");
/// let b = unique_name("alice");
/// assert_ne!(a, b);
/// assert!(a.len() <= 32);
/// ```
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", short_suffix())
}

/// Unique email in the form `{prefix}-{ulid}@example.test`.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new().to_string().to_lowercase())
}
