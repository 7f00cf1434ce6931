//! PII redaction for raw database and token text that ends up in logs.
//!
//! Postgres unique-violation messages echo the offending key
//! (`Key (email)=(ann@example.com) already exists`) and argon2 digests or
//! JWTs can surface in error chains; both are masked before logging.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

/// Base64-ish runs of 16+ chars: JWT segments, argon2 salts and hashes.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[A-Za-z0-9+/_-]{16,}={0,2}").unwrap()
});

/// Mask emails (keep first char of the local part and the domain) and
/// replace long opaque tokens with `[REDACTED_TOKEN]`.
pub fn redact(input: &str) -> String {
    let emails_masked = EMAIL_REGEX.replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => full.to_string(),
        }
    });

    TOKEN_REGEX
        .replace_all(&emails_masked, |caps: &regex::Captures| {
            let run = &caps[0];
            // Hyphenated UUIDs and snake_case identifiers (constraint names)
            // split into short groups; opaque material does not.
            let separated = run.contains(['-', '_']);
            if separated && run.split(['-', '_']).all(|g| g.len() < 16) {
                run.to_string()
            } else {
                "[REDACTED_TOKEN]".to_string()
            }
        })
        .into_owned()
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
