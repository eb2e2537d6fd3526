//! Process-wide configuration for the gateway.
//!
//! Configuration is loaded once at startup and passed into the router
//! explicitly, so the "missing configuration" guard in the upsert handler
//! is testable without touching the process environment.

use serde::Serialize;
use std::env;

use crate::types::{AnonKey, ServiceRoleKey};

/// Environment variable holding the Supabase project base URL.
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
/// Environment variable holding the public (anonymous) API key.
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
/// Environment variable holding the privileged service-role key.
pub const ENV_SUPABASE_SERVICE_ROLE: &str = "SUPABASE_SERVICE_ROLE";

/// Gateway configuration sourced from the environment.
///
/// Every field is optional: the public-config endpoint serves whatever is
/// present (absent values serialize as `null`), while the admin upsert
/// path refuses to run unless both privileged values are set.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Base URL of the Supabase project (e.g. `https://xyz.supabase.co`).
    pub supabase_url: Option<String>,
    /// Public anonymous key, safe to hand to browsers.
    pub anon_key: Option<AnonKey>,
    /// Service-role key. Never exposed through the public-config endpoint.
    pub service_role_key: Option<ServiceRoleKey>,
}

/// The whitelisted public projection of [`AppConfig`].
///
/// Field names match what the browser client expects to read.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicConfig {
    #[serde(rename = "SUPABASE_URL")]
    pub supabase_url: Option<String>,
    #[serde(rename = "SUPABASE_ANON_KEY")]
    pub anon_key: Option<AnonKey>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    ///
    /// Blank or whitespace-only values count as absent, so an empty
    /// `SUPABASE_SERVICE_ROLE=` line in a deploy manifest does not make
    /// the admin path think it is configured.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            supabase_url: get(ENV_SUPABASE_URL),
            anon_key: get(ENV_SUPABASE_ANON_KEY).map(AnonKey::new),
            service_role_key: get(ENV_SUPABASE_SERVICE_ROLE).map(ServiceRoleKey::new),
        }
    }

    /// Return the base URL and service-role key together, or `None` if
    /// either is missing.
    ///
    /// The upsert handler treats `None` as "server misconfigured" and
    /// answers 500 before making any external call.
    pub fn admin_credentials(&self) -> Option<(&str, &ServiceRoleKey)> {
        match (&self.supabase_url, &self.service_role_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key)),
            _ => None,
        }
    }

    /// Project the non-secret values for the public-config endpoint.
    pub fn public_view(&self) -> PublicConfig {
        PublicConfig {
            supabase_url: self.supabase_url.clone(),
            anon_key: self.anon_key.clone(),
        }
    }
}
