// src/manager.rs

use crate::client::IdpClient;
use crate::config::Config;
use crate::error::AuthError;
use crate::model::{LoginRequest, Tenant, TenantTokenRequest, TenantUser, Token, User};
use crate::nonce::{NonceProvider, RandomNonce};
use crate::validator::{Clock, Expected, Validator};
use jsonwebtoken::{Algorithm, DecodingKey};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The authentication engine: credential login followed by tenant-scoped
/// token exchange.
///
/// One `AuthManager` owns one logical session. `config` is public so the
/// caller can swap the audience between the login phase and the
/// tenant-selection phase; both flows take `&mut self`, so invocations on
/// one instance are serialized and each captures its config snapshot at
/// call start.
pub struct AuthManager {
    /// Current authentication context. Read once per flow invocation.
    pub config: Config,
    client: IdpClient,
    validator: Validator,
    nonce: Box<dyn NonceProvider>,
    // Identity token retained between a successful login and tenant exchange.
    id_token: Option<Token>,
}

impl AuthManager {
    /// Creates an engine that verifies provider tokens with the given key
    /// and algorithm.
    pub fn new(config: Config, decoding_key: DecodingKey, algorithm: Algorithm) -> Self {
        Self {
            config,
            client: IdpClient::new(),
            validator: Validator::new(decoding_key, algorithm),
            nonce: Box::new(RandomNonce),
            id_token: None,
        }
    }

    /// Sets a per-request deadline for identity provider calls. Expiry
    /// surfaces as [`AuthError::IdentityProvider`].
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, AuthError> {
        self.client = IdpClient::with_timeout(timeout)?;
        Ok(self)
    }

    /// Replaces the nonce source. Used by tests for deterministic nonces.
    #[must_use]
    pub fn with_nonce_provider(mut self, nonce: Box<dyn NonceProvider>) -> Self {
        self.nonce = nonce;
        self
    }

    /// Replaces the validation clock. Used by tests to freeze time.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.validator = self.validator.with_clock(clock);
        self
    }

    /// The identity token retained from the last successful login, if any.
    pub fn id_token(&self) -> Option<&Token> {
        self.id_token.as_ref()
    }

    /// Drops the retained identity token, ending the session.
    pub fn logout(&mut self) {
        self.id_token = None;
    }

    /// Authenticates the user against the identity provider.
    ///
    /// Generates a fresh nonce, submits the credentials, validates the
    /// returned identity token against the config in effect at call start
    /// and that nonce, retains the token for a later tenant exchange, and
    /// returns the user with their tenant memberships in provider order.
    #[instrument(skip(self, password), err)]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let nonce = self.nonce.generate();
        let expected = Expected::snapshot(&self.config, nonce.clone());
        let endpoint = self.config.endpoint.clone();

        let response = self
            .client
            .login(
                &endpoint,
                &LoginRequest {
                    email,
                    password,
                    nonce: &nonce,
                },
            )
            .await?;

        let token = self.validator.validate(&response.id_token, &expected)?;
        let email = token.claims.sub.clone();
        self.id_token = Some(token);

        info!(%email, tenants = response.tenants.len(), "login succeeded");
        Ok(User {
            email,
            tenants: response.tenants,
        })
    }

    /// Exchanges the retained identity token for a token scoped to `tenant`.
    ///
    /// Fails with [`AuthError::MissingIdToken`] before any network call if
    /// no login has succeeded. The caller is expected to have updated
    /// `config.audience` to the tenant-scoped audience beforehand.
    #[instrument(skip(self), fields(tenant_id = %tenant.id), err)]
    pub async fn choose_tenant(&mut self, tenant: &Tenant) -> Result<TenantUser, AuthError> {
        let id_token = self.id_token.as_ref().ok_or(AuthError::MissingIdToken)?;

        let nonce = self.nonce.generate();
        let expected = Expected::snapshot(&self.config, nonce.clone());
        let endpoint = self.config.endpoint.clone();

        let response = self
            .client
            .tenant_token(
                &endpoint,
                &TenantTokenRequest {
                    id_token: &id_token.raw,
                    tenant_id: &tenant.id,
                    nonce: &nonce,
                },
            )
            .await?;

        let token = self.validator.validate(&response.token, &expected)?;

        let issuer = token.claims.iss.clone();
        let user_groups = token.claims.namespaced(&issuer, "user_groups").unwrap_or_default();
        let product_groups = token
            .claims
            .namespaced(&issuer, "product_groups")
            .unwrap_or_default();
        let roles = token.claims.namespaced(&issuer, "roles").unwrap_or_default();

        info!(tenant_id = %tenant.id, "tenant exchange succeeded");
        Ok(TenantUser {
            token,
            user_groups,
            product_groups,
            roles,
        })
    }
}
