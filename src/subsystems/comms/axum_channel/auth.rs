//! Shared-secret checks for the `x-api-key` header.

use axum::http::HeaderMap;

pub(super) const API_KEY_HEADER: &str = "x-api-key";

/// `true` when the request's `x-api-key` equals `expected`.
///
/// Fails closed: when no key is configured every request is rejected.
pub(super) fn api_key_matches(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    provided == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(key: Option<&str>) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(k) = key {
            h.insert(API_KEY_HEADER, HeaderValue::from_str(k).unwrap());
        }
        h
    }

    #[test]
    fn matching_key_passes() {
        assert!(api_key_matches(&headers(Some("s3cret")), Some("s3cret")));
    }

    #[test]
    fn wrong_or_missing_key_fails() {
        assert!(!api_key_matches(&headers(Some("nope")), Some("s3cret")));
        assert!(!api_key_matches(&headers(None), Some("s3cret")));
    }

    #[test]
    fn unconfigured_secret_rejects_everything() {
        assert!(!api_key_matches(&headers(Some("")), None));
        assert!(!api_key_matches(&headers(Some("anything")), None));
    }
}
