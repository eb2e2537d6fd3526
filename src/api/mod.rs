// HTTP endpoints for the gateway

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{any, get},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::article::ArticlePayload;
use crate::auth::extract_bearer_token;
use crate::config::AppConfig;
use crate::error::GatewayError;
use crate::supabase::{
    ArticleWriter, IdentityVerifier, ProfileReader, SupabaseClient, SupabaseError,
};
use crate::types::ServiceRoleKey;

/// The three backend capabilities the upsert pipeline needs.
///
/// Bundled so the handler can treat "admin backend available" as a single
/// question; in production all three point at one [`SupabaseClient`].
#[derive(Clone)]
pub struct AdminBackend {
    pub identity: Arc<dyn IdentityVerifier>,
    pub profiles: Arc<dyn ProfileReader>,
    pub articles: Arc<dyn ArticleWriter>,
}

impl AdminBackend {
    /// Build a backend from explicit capability implementations.
    pub fn new(
        identity: Arc<dyn IdentityVerifier>,
        profiles: Arc<dyn ProfileReader>,
        articles: Arc<dyn ArticleWriter>,
    ) -> Self {
        Self {
            identity,
            profiles,
            articles,
        }
    }

    /// Build a backend where all capabilities share one Supabase client.
    pub fn supabase(base_url: &str, service_key: ServiceRoleKey) -> Result<Self, SupabaseError> {
        let client = Arc::new(SupabaseClient::new(base_url, service_key)?);
        Ok(Self {
            identity: client.clone(),
            profiles: client.clone(),
            articles: client,
        })
    }
}

/// Shared state for all routes.
///
/// `backend: None` is the "server misconfigured" state: the public-config
/// endpoint still works, the upsert endpoint answers 500 without making
/// any external call.
pub struct AppState {
    pub config: AppConfig,
    pub backend: Option<AdminBackend>,
}

impl AppState {
    /// Derive state from configuration, constructing the Supabase-backed
    /// capabilities only when both privileged values are present.
    pub fn from_config(config: AppConfig) -> Self {
        let backend = match config.admin_credentials() {
            Some((url, key)) => match AdminBackend::supabase(url, key.clone()) {
                Ok(backend) => Some(backend),
                Err(e) => {
                    warn!("admin backend disabled: {}", e);
                    None
                }
            },
            None => {
                warn!(
                    "SUPABASE_URL and/or SUPABASE_SERVICE_ROLE not set; \
                     upsert endpoint will report the server as misconfigured"
                );
                None
            }
        };

        Self { config, backend }
    }
}

/// Build the router.
///
/// The upsert route is registered for every method so the handler itself
/// can answer 405 with the expected plain-text body instead of axum's
/// default method rejection.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/public-config", any(public_config))
        .route("/api/upsert-article", any(upsert_article))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::new()),
        )
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Serve the whitelisted public configuration on any method.
///
/// `no-store` because the admin UI re-reads this on every load and stale
/// keys after a rotation would strand it.
async fn public_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(state.config.public_view()),
    )
}

async fn upsert_article(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match run_upsert(&state, &method, &headers, &body).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// The linear guard pipeline for the admin upsert.
///
/// Each stage short-circuits to a terminal error; external calls happen
/// strictly in order (verify, profile lookup, upsert) and none is retried.
async fn run_upsert(
    state: &AppState,
    method: &Method,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Value, GatewayError> {
    if method != Method::POST {
        return Err(GatewayError::MethodNotAllowed);
    }

    let backend = state.backend.as_ref().ok_or_else(|| {
        error!("upsert rejected: admin backend not configured");
        GatewayError::Misconfigured
    })?;

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = extract_bearer_token(authorization).ok_or(GatewayError::MissingToken)?;

    let caller = match backend.identity.verify_token(&token).await {
        Ok(Some(caller)) => caller,
        Ok(None) => return Err(GatewayError::InvalidToken),
        Err(e) => {
            warn!("token verification failed: {}", e);
            return Err(GatewayError::InvalidToken);
        }
    };

    // Fail closed: only an explicit `true` on an existing profile row
    // counts as admin.
    let is_admin = backend.profiles.admin_flag(caller.id()).await.map_err(|e| {
        error!(user = %caller.id(), "profile lookup failed: {}", e);
        GatewayError::ProfileLookup
    })?;
    if is_admin != Some(true) {
        warn!(user = %caller.id(), "upsert rejected: caller is not an admin");
        return Err(GatewayError::NotAdmin);
    }

    let payload = ArticlePayload::from_request_body(body);
    if !payload.has_required_fields() {
        return Err(GatewayError::MissingFields);
    }

    backend
        .articles
        .upsert_article(&payload)
        .await
        .map_err(|e| {
            error!(slug = %payload.slug, "article upsert failed: {}", e);
            match e {
                SupabaseError::Api { message, .. } => GatewayError::Store(message),
                other => GatewayError::Store(other.to_string()),
            }
        })
}
