//! Authentication for the admin upsert path.
//!
//! The gateway establishes identity in exactly one place: a bearer token is
//! pulled out of the `Authorization` header and exchanged with the external
//! identity service for a user. No local token parsing or signature
//! checking happens here; verification is fully delegated.
//!
//! ## Security Model
//!
//! - Token extraction is purely syntactic and never fails open: an empty
//!   result means "no token", not "anonymous user"
//! - Authorization (the admin flag) is a separate step owned by the
//!   handler, fail-closed to "not admin"

mod context;
mod token;

pub use context::AuthenticatedCaller;
pub use token::extract_bearer_token;
