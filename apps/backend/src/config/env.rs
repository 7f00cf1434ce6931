//! Environment variable helpers.

use std::time::Duration;

use crate::error::AppError;

/// Non-empty variable from `lookup`.
pub fn var_from<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

/// Required variable from `lookup`, or a config error naming it.
pub fn must_var_from<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    var_from(lookup, name)
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Parse durations such as `900`, `45s`, `15m`, `24h` or `7d`.
/// A bare number is seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, AppError> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| AppError::config(format!("invalid duration '{raw}'")))?;

    let secs = match unit {
        "" | "s" => value,
        "m" => value * 60,
        "h" => value * 60 * 60,
        "d" => value * 24 * 60 * 60,
        _ => return Err(AppError::config(format!("invalid duration unit in '{raw}'"))),
    };

    if secs == 0 {
        return Err(AppError::config(format!("duration '{raw}' must be positive")));
    }
    Ok(Duration::from_secs(secs))
}
