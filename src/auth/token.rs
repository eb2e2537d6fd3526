//! Bearer token extraction from the `Authorization` header.

use crate::types::BearerToken;

/// Extract the bearer token from an `Authorization` header value.
///
/// The `Bearer` prefix is matched case-insensitively and must be followed
/// by at least one whitespace character; surrounding whitespace is trimmed.
/// A value without the prefix is treated as the raw token. Returns `None`
/// when nothing is left after trimming.
pub fn extract_bearer_token(header: Option<&str>) -> Option<BearerToken> {
    let raw = header.unwrap_or("").trim();

    let token = match raw.get(..6) {
        Some(prefix)
            if prefix.eq_ignore_ascii_case("bearer")
                && raw[6..].starts_with(char::is_whitespace) =>
        {
            raw[6..].trim()
        }
        _ => raw,
    };

    if token.is_empty() {
        None
    } else {
        Some(BearerToken::new(token))
    }
}
