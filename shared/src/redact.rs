//! Helpers for keeping sensitive values out of production logs.

pub const REDACTED: &str = "[REDACTED]";

/// Returns `value` unchanged outside production, or a fixed placeholder in production.
pub fn redact(production: bool, value: &str) -> &str {
    if production { REDACTED } else { value }
}
