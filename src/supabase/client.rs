//! HTTP client for the Supabase GoTrue and PostgREST APIs.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::article::ArticlePayload;
use crate::auth::AuthenticatedCaller;
use crate::types::{BearerToken, ExternalUserId, ServiceRoleKey};

use super::{ArticleWriter, IdentityVerifier, ProfileReader, SupabaseError};

/// Client holding the base URL and the service-role credential.
///
/// Every request carries the service-role key in the `apikey` header; the
/// identity-verification call additionally forwards the caller's token as
/// the bearer credential, which is how GoTrue knows whose token to verify.
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
    service_key: ServiceRoleKey,
}

/// User shape returned by `GET /auth/v1/user`.
#[derive(Debug, Deserialize)]
struct GoTrueUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Row shape for `profiles?select=is_admin`.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(default)]
    is_admin: Option<bool>,
}

/// PostgREST error body.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

impl SupabaseClient {
    /// Create a client for the given project base URL.
    pub fn new(base_url: &str, service_key: ServiceRoleKey) -> Result<Self, SupabaseError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| SupabaseError::InvalidBaseUrl(e.to_string()))?;

        // Url::join drops the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            service_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SupabaseError> {
        self.base_url
            .join(path)
            .map_err(|e| SupabaseError::InvalidBaseUrl(e.to_string()))
    }

    /// Turn a non-success response into an API error, preferring the
    /// PostgREST `message` field over the raw body.
    async fn api_error(response: reqwest::Response) -> SupabaseError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        SupabaseError::Api { status, message }
    }
}

/// Decide the admin flag from the rows a `profiles` lookup returned.
///
/// Zero rows is tolerated (no profile yet is not an error); a single row
/// yields its flag with absence meaning `false`; anything more means the
/// lookup was not the single-row query it is supposed to be.
fn admin_flag_from_rows(rows: &[ProfileRow]) -> Result<Option<bool>, SupabaseError> {
    match rows {
        [] => Ok(None),
        [row] => Ok(Some(row.is_admin.unwrap_or(false))),
        _ => Err(SupabaseError::AmbiguousProfile),
    }
}

/// Pick the persisted row out of an upsert representation, falling back
/// to an empty object when the store returned none.
fn first_row(rows: Vec<Value>) -> Value {
    rows.into_iter()
        .next()
        .unwrap_or_else(|| Value::Object(Default::default()))
}

#[async_trait]
impl IdentityVerifier for SupabaseClient {
    async fn verify_token(
        &self,
        token: &BearerToken,
    ) -> Result<Option<AuthenticatedCaller>, SupabaseError> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .http
            .get(url)
            .header("apikey", self.service_key.as_str())
            .bearer_auth(token.as_str())
            .send()
            .await?;

        // GoTrue answers 401/403 for bad tokens; any non-success counts
        // as "no resolved user" rather than a transport failure.
        if !response.status().is_success() {
            debug!(status = %response.status(), "identity service rejected token");
            return Ok(None);
        }

        let user: GoTrueUser = response
            .json()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;

        match user.id {
            Some(id) if !id.is_empty() => Ok(Some(AuthenticatedCaller::new(
                ExternalUserId::new(id),
                user.email,
            ))),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ProfileReader for SupabaseClient {
    async fn admin_flag(&self, user: &ExternalUserId) -> Result<Option<bool>, SupabaseError> {
        let url = self.endpoint("rest/v1/profiles")?;
        let filter = format!("eq.{}", user.as_str());
        let response = self
            .http
            .get(url)
            .query(&[("select", "is_admin"), ("id", filter.as_str())])
            .header("apikey", self.service_key.as_str())
            .bearer_auth(self.service_key.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let rows: Vec<ProfileRow> = response
            .json()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;

        admin_flag_from_rows(&rows)
    }
}

#[async_trait]
impl ArticleWriter for SupabaseClient {
    async fn upsert_article(&self, article: &ArticlePayload) -> Result<Value, SupabaseError> {
        let url = self.endpoint("rest/v1/articles")?;
        let response = self
            .http
            .post(url)
            .query(&[("on_conflict", "slug"), ("select", "*")])
            .header("apikey", self.service_key.as_str())
            .bearer_auth(self.service_key.as_str())
            .header(
                "Prefer",
                "resolution=merge-duplicates,return=representation",
            )
            .json(article)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;

        Ok(first_row(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SupabaseClient {
        SupabaseClient::new(base, ServiceRoleKey::new("service-key")).unwrap()
    }

    #[test]
    fn test_endpoint_joining() {
        let c = client("https://xyz.supabase.co");
        assert_eq!(
            c.endpoint("auth/v1/user").unwrap().as_str(),
            "https://xyz.supabase.co/auth/v1/user"
        );
        assert_eq!(
            c.endpoint("rest/v1/articles").unwrap().as_str(),
            "https://xyz.supabase.co/rest/v1/articles"
        );
    }

    #[test]
    fn test_endpoint_joining_with_trailing_slash() {
        let c = client("https://xyz.supabase.co/");
        assert_eq!(
            c.endpoint("auth/v1/user").unwrap().as_str(),
            "https://xyz.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_endpoint_joining_with_base_path() {
        let c = client("https://example.com/supabase");
        assert_eq!(
            c.endpoint("rest/v1/profiles").unwrap().as_str(),
            "https://example.com/supabase/rest/v1/profiles"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SupabaseClient::new("not a url", ServiceRoleKey::new("k"));
        assert!(matches!(result, Err(SupabaseError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_profile_row_default_flag() {
        let row: ProfileRow = serde_json::from_str("{}").unwrap();
        assert_eq!(row.is_admin, None);

        let row: ProfileRow = serde_json::from_str(r#"{"is_admin": true}"#).unwrap();
        assert_eq!(row.is_admin, Some(true));
    }

    #[test]
    fn test_admin_flag_from_zero_rows_is_no_profile() {
        assert_eq!(admin_flag_from_rows(&[]), Ok(None));
    }

    #[test]
    fn test_admin_flag_from_single_row() {
        let row = |flag| ProfileRow { is_admin: flag };

        assert_eq!(admin_flag_from_rows(&[row(Some(true))]), Ok(Some(true)));
        assert_eq!(admin_flag_from_rows(&[row(Some(false))]), Ok(Some(false)));
        // Absent flag on an existing row reads as false, never as admin.
        assert_eq!(admin_flag_from_rows(&[row(None)]), Ok(Some(false)));
    }

    #[test]
    fn test_admin_flag_from_multiple_rows_is_an_error() {
        let rows = vec![
            ProfileRow {
                is_admin: Some(true),
            },
            ProfileRow {
                is_admin: Some(false),
            },
        ];
        assert_eq!(
            admin_flag_from_rows(&rows),
            Err(SupabaseError::AmbiguousProfile)
        );
    }

    #[test]
    fn test_first_row_takes_the_first_representation_row() {
        let rows = vec![
            serde_json::json!({"slug": "hello"}),
            serde_json::json!({"slug": "other"}),
        ];
        assert_eq!(first_row(rows), serde_json::json!({"slug": "hello"}));
    }

    #[test]
    fn test_first_row_of_empty_representation_is_empty_object() {
        assert_eq!(first_row(Vec::new()), serde_json::json!({}));
    }

    #[test]
    fn test_gotrue_user_tolerates_extra_fields() {
        let user: GoTrueUser = serde_json::from_str(
            r#"{"id": "u1", "email": "a@b.c", "aud": "authenticated", "role": "authenticated"}"#,
        )
        .unwrap();
        assert_eq!(user.id.as_deref(), Some("u1"));
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
    }
}
