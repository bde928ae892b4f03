//! API version negotiation.

use axum::http::{HeaderMap, header};

use crate::application::serializer::ApiVersion;

/// Negotiate the serialization version from the `Accept` header.
///
/// Looks for a `version` media-type parameter, e.g.
/// `application/json; version=2.0`. Absent or unrecognized values fall back
/// to the configured default rather than failing the request.
pub fn negotiate_version(headers: &HeaderMap, default: ApiVersion) -> ApiVersion {
    let Some(accept) = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
    else {
        return default;
    };

    accept
        .split([';', ','])
        .filter_map(|part| part.trim().strip_prefix("version="))
        .find_map(ApiVersion::parse_param)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn missing_accept_header_uses_default() {
        let headers = HeaderMap::new();
        assert_eq!(
            negotiate_version(&headers, ApiVersion::V1),
            ApiVersion::V1
        );
    }

    #[test]
    fn version_parameter_is_honored() {
        let headers = headers_with_accept("application/json; version=2.0");
        assert_eq!(
            negotiate_version(&headers, ApiVersion::V1),
            ApiVersion::V2
        );
    }

    #[test]
    fn major_only_version_is_honored() {
        let headers = headers_with_accept("application/json; version=2");
        assert_eq!(
            negotiate_version(&headers, ApiVersion::V1),
            ApiVersion::V2
        );
    }

    #[test]
    fn unknown_version_falls_back_to_default() {
        let headers = headers_with_accept("application/json; version=9.0");
        assert_eq!(
            negotiate_version(&headers, ApiVersion::V2),
            ApiVersion::V2
        );
    }

    #[test]
    fn accept_without_version_uses_default() {
        let headers = headers_with_accept("application/json");
        assert_eq!(
            negotiate_version(&headers, ApiVersion::V2),
            ApiVersion::V2
        );
    }
}
