// src/client.rs

use crate::error::AuthError;
use crate::model::{LoginRequest, LoginResponse, TenantTokenRequest, TenantTokenResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// HTTP client for the identity provider endpoint.
///
/// Thin wrapper over `reqwest`; every failure it can produce — unreachable
/// endpoint, timeout, non-2xx status, undecodable body — surfaces as
/// [`AuthError::IdentityProvider`], kept distinct from the validation
/// taxonomy.
#[derive(Clone)]
pub struct IdpClient {
    http: reqwest::Client,
}

impl Default for IdpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IdpClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Creates a client with a per-request deadline.
    pub fn with_timeout(timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Submits credentials and receives the identity token plus the user's
    /// tenant memberships.
    #[instrument(skip(self, request), fields(email = %request.email), err)]
    pub async fn login(
        &self,
        endpoint: &Url,
        request: &LoginRequest<'_>,
    ) -> Result<LoginResponse, AuthError> {
        let url = join(endpoint, "login")?;
        self.post_json(url, request).await
    }

    /// Exchanges the identity token for a tenant-scoped token.
    #[instrument(skip(self, request), fields(tenant_id = %request.tenant_id), err)]
    pub async fn tenant_token(
        &self,
        endpoint: &Url,
        request: &TenantTokenRequest<'_>,
    ) -> Result<TenantTokenResponse, AuthError> {
        let url = join(endpoint, "token")?;
        self.post_json(url, request).await
    }

    async fn post_json<B, R>(&self, url: Url, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%url, "sending request to identity provider");
        let response = self.http.post(url.clone()).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::IdentityProvider(format!(
                "{url} returned {status}"
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AuthError::IdentityProvider(format!("malformed response from {url}: {e}")))
    }
}

fn join(endpoint: &Url, path: &str) -> Result<Url, AuthError> {
    endpoint
        .join(path)
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))
}
