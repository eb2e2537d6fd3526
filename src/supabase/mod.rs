//! Narrow interfaces over the hosted Supabase backend.
//!
//! The upsert pipeline depends on three capabilities, not on a concrete
//! client: identity verification (GoTrue), a read-only profile lookup, and
//! the article upsert (both PostgREST). Each is a trait so tests can swap
//! in doubles without network access; [`client::SupabaseClient`] implements
//! all three over HTTP.

mod client;

pub use client::SupabaseClient;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::article::ArticlePayload;
use crate::auth::AuthenticatedCaller;
use crate::types::{BearerToken, ExternalUserId};

/// Errors from talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupabaseError {
    /// The configured base URL could not be parsed or joined
    InvalidBaseUrl(String),
    /// Transport-level failure (DNS, TLS, connection, timeout)
    Request(String),
    /// The backend answered with a non-success status
    Api { status: u16, message: String },
    /// The backend answered with a body we could not decode
    Decode(String),
    /// A single-row lookup matched more than one row
    AmbiguousProfile,
}

impl fmt::Display for SupabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(msg) => write!(f, "invalid base URL: {}", msg),
            Self::Request(msg) => write!(f, "request failed: {}", msg),
            Self::Api { status, message } => write!(f, "{} (status {})", message, status),
            Self::Decode(msg) => write!(f, "failed to decode response: {}", msg),
            Self::AmbiguousProfile => write!(f, "profile lookup matched more than one row"),
        }
    }
}

impl std::error::Error for SupabaseError {}

impl From<reqwest::Error> for SupabaseError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

/// Exchange an opaque bearer token for a user identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `token` with the identity service.
    ///
    /// `Ok(None)` means the service rejected the token or resolved no
    /// user; `Err` means the exchange itself failed. The handler treats
    /// both as an invalid token.
    async fn verify_token(
        &self,
        token: &BearerToken,
    ) -> Result<Option<AuthenticatedCaller>, SupabaseError>;
}

/// Read-only, zero-or-one lookup of the admin flag on a profile.
#[async_trait]
pub trait ProfileReader: Send + Sync {
    /// Fetch the `is_admin` flag for `user`.
    ///
    /// `Ok(None)` means no profile row exists, which is not an error by
    /// itself; the caller decides that means "not admin".
    async fn admin_flag(&self, user: &ExternalUserId) -> Result<Option<bool>, SupabaseError>;
}

/// Insert-or-update of an article keyed on `slug`.
#[async_trait]
pub trait ArticleWriter: Send + Sync {
    /// Upsert `article` and return the persisted row, or an empty JSON
    /// object if the store returned none.
    async fn upsert_article(&self, article: &ArticlePayload) -> Result<Value, SupabaseError>;
}
