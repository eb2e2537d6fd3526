//! NewType wrappers for strong typing throughout the gateway.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing the service-role credential where the public anon key is
//! expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// User identifier issued by the external identity service.
    ///
    /// This is the GoTrue user UUID from the verified token. It is only
    /// used to filter the `profiles` lookup; the gateway never creates or
    /// deletes profile records.
    ExternalUserId
);

newtype_string!(
    /// An opaque bearer token extracted from the `Authorization` header.
    ///
    /// The gateway never parses or validates the token locally; it is
    /// forwarded verbatim to the identity service for verification.
    BearerToken
);

newtype_string!(
    /// The public (anonymous) Supabase API key.
    ///
    /// Safe to expose to browsers. Returned by the public-config endpoint.
    AnonKey
);

newtype_string!(
    /// The privileged service-role Supabase API key.
    ///
    /// Bypasses row-level security. Used only for the admin upsert path
    /// and must never appear in the public-config response; keeping it a
    /// distinct type from `AnonKey` makes that mix-up a compile error.
    ServiceRoleKey
);
