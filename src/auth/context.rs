//! Caller identity for request-scoped use.

use crate::types::ExternalUserId;

/// An authenticated caller, as resolved by the external identity service.
///
/// Created per request after token verification and discarded when the
/// request ends. Existence of this value means the identity service
/// returned a user without error; it says nothing about authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    id: ExternalUserId,
    email: Option<String>,
}

impl AuthenticatedCaller {
    /// Create a new caller identity.
    pub fn new(id: ExternalUserId, email: Option<String>) -> Self {
        Self { id, email }
    }

    /// The external user id, used to key the profile lookup.
    pub fn id(&self) -> &ExternalUserId {
        &self.id
    }

    /// Email if the identity service supplied one (for logging only).
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
