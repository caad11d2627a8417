// src/config.rs

use crate::error::AuthError;
use url::Url;

/// Issuer expected when none is configured explicitly.
pub const DEFAULT_ISSUER: &str = "https://id.tenant-auth.dev/";

/// Audience expected when none is configured explicitly.
pub const DEFAULT_AUDIENCE: &str = "Frontend";

/// Configuration for one authentication context.
///
/// The engine reads this once per request/validate pair; the caller is free
/// to mutate it between the login phase and the tenant-selection phase
/// (typically swapping `audience` for the tenant-scoped one). Each flow
/// invocation captures an immutable snapshot at call start, so a mutation
/// never takes effect mid-flight.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the identity provider endpoint.
    pub endpoint: Url,
    /// Expected `aud` claim of tokens validated in this context.
    pub audience: String,
    /// Expected `iss` claim of tokens validated in this context.
    pub issuer: String,
}

impl Config {
    /// Creates a configuration with all fields explicit.
    pub fn new(
        endpoint: Url,
        audience: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            audience: audience.into(),
            issuer: issuer.into(),
        }
    }

    /// Builds a default configuration for the given endpoint: the supplied
    /// audience plus the crate's default issuer.
    pub fn for_endpoint(endpoint: &str, audience: impl Into<String>) -> Result<Self, AuthError> {
        let endpoint = Url::parse(endpoint).map_err(|e| AuthError::InvalidUrl(e.to_string()))?;
        Ok(Self::new(endpoint, audience, DEFAULT_ISSUER))
    }
}
