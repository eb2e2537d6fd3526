// Core modules
mod article;
mod auth;
mod config;
mod error;
mod supabase;
mod types;

pub mod api;

// Re-export key types and functions
pub use api::{AdminBackend, AppState, create_router};
pub use article::ArticlePayload;
pub use auth::{AuthenticatedCaller, extract_bearer_token};
pub use config::AppConfig;
pub use error::GatewayError;
pub use supabase::{
    ArticleWriter, IdentityVerifier, ProfileReader, SupabaseClient, SupabaseError,
};
pub use types::{AnonKey, BearerToken, ExternalUserId, ServiceRoleKey};

use axum::Router;
use std::sync::Arc;

/// Convenience function to create the fully wired gateway router.
///
/// Builds the Supabase-backed capabilities when the configuration allows
/// it and returns a router ready to serve.
pub fn create_app(config: AppConfig) -> Router {
    let state = AppState::from_config(config);
    create_router(Arc::new(state))
}
