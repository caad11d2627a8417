// src/model.rs

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A tenant the authenticated user is a member of.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
}

/// A user or product group carried in a tenant-scoped token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// The claims decoded from a verified token.
///
/// Standard claims are typed; provider-namespaced claims (tenant id,
/// groups, roles) land in `custom` and are read through
/// [`TokenClaims::namespaced`], keyed as `{issuer}{name}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
    pub nonce: String,
    #[serde(flatten)]
    pub custom: serde_json::Map<String, serde_json::Value>,
}

impl TokenClaims {
    /// Reads a provider-namespaced custom claim, deserializing it into `T`.
    /// Returns `None` if the claim is absent or has an unexpected shape.
    pub fn namespaced<T: DeserializeOwned>(&self, issuer: &str, name: &str) -> Option<T> {
        self.custom
            .get(&format!("{issuer}{name}"))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// A verified token: the raw compact form plus its decoded claims.
/// Claims are only ever populated after the signature check has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub raw: String,
    pub claims: TokenClaims,
}

/// Result of a successful login. `tenants` preserves the provider's order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub tenants: Vec<Tenant>,
}

/// Result of a successful tenant exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TenantUser {
    pub token: Token,
    pub user_groups: Vec<Group>,
    pub product_groups: Vec<Group>,
    pub roles: Vec<String>,
}

/// Body of the credential submission sent to the identity provider.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub nonce: &'a str,
}

/// Body of the identity provider's login response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id_token: String,
    pub tenants: Vec<Tenant>,
}

/// Body of the tenant-scoped token request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantTokenRequest<'a> {
    pub id_token: &'a str,
    pub tenant_id: &'a str,
    pub nonce: &'a str,
}

/// Body of the identity provider's tenant-token response.
#[derive(Debug, Deserialize)]
pub struct TenantTokenResponse {
    pub token: String,
}
