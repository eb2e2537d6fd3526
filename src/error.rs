//! Request error taxonomy for the gateway.
//!
//! Every failure in the upsert pipeline is converted to one of these
//! variants at the point of detection and turned into a terminal HTTP
//! response; nothing propagates past the handler uncaught.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

/// Terminal request errors, one variant per guard in the upsert pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Request used a method other than POST
    MethodNotAllowed,
    /// Base URL or service-role key missing from configuration
    Misconfigured,
    /// No bearer token in the Authorization header
    MissingToken,
    /// Identity service rejected the token or resolved no user
    InvalidToken,
    /// Profile lookup against the store failed
    ProfileLookup,
    /// Caller is authenticated but not an admin
    NotAdmin,
    /// Payload is missing slug or title after normalization
    MissingFields,
    /// The store rejected the upsert; carries the store's message verbatim.
    /// Passthrough is acceptable here because the caller has already been
    /// confirmed as an admin.
    Store(String),
    /// Catch-all for anything the pipeline did not anticipate
    Unexpected(String),
}

impl GatewayError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::ProfileLookup => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotAdmin => StatusCode::FORBIDDEN,
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotAllowed => write!(f, "Method Not Allowed"),
            Self::Misconfigured => write!(f, "Server misconfigured"),
            Self::MissingToken => write!(f, "Missing auth token"),
            Self::InvalidToken => write!(f, "Invalid auth token"),
            Self::ProfileLookup => write!(f, "Profile lookup failed"),
            Self::NotAdmin => write!(f, "Admins only"),
            Self::MissingFields => write!(f, "slug and title are required"),
            Self::Store(msg) => write!(f, "{}", msg),
            Self::Unexpected(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<anyhow::Error> for GatewayError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unexpected(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            GatewayError::Misconfigured.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(GatewayError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(GatewayError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            GatewayError::ProfileLookup.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(GatewayError::NotAdmin.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            GatewayError::MissingFields.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Store("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Unexpected("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_phrases() {
        assert_eq!(GatewayError::Misconfigured.to_string(), "Server misconfigured");
        assert_eq!(GatewayError::MissingToken.to_string(), "Missing auth token");
        assert_eq!(GatewayError::InvalidToken.to_string(), "Invalid auth token");
        assert_eq!(
            GatewayError::ProfileLookup.to_string(),
            "Profile lookup failed"
        );
        assert_eq!(GatewayError::NotAdmin.to_string(), "Admins only");
        assert_eq!(
            GatewayError::MissingFields.to_string(),
            "slug and title are required"
        );
    }

    #[test]
    fn test_store_message_passthrough() {
        let err = GatewayError::Store("duplicate key value".to_string());
        assert_eq!(err.to_string(), "duplicate key value");
    }

    #[test]
    fn test_from_anyhow() {
        let err: GatewayError = anyhow::anyhow!("something broke").into();
        assert_eq!(err, GatewayError::Unexpected("something broke".to_string()));
    }
}
