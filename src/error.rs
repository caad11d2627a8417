// src/error.rs

use thiserror::Error;

/// The primary error type for the `tenant-auth` crate.
///
/// The first five variants map one-to-one onto the token validation
/// pipeline stages, in the order the stages run. A failed call carries
/// exactly one of them.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Issuer must be {expected}, got {actual}")]
    IssuerMismatch { expected: String, actual: String },

    #[error("Audience must be {expected}, got {actual}")]
    AudienceMismatch { expected: String, actual: String },

    #[error("Nonce must be {expected} but it was {actual}")]
    NonceMismatch { expected: String, actual: String },

    #[error("Missing id token")]
    MissingIdToken,

    /// Transport or protocol failure talking to the identity provider:
    /// unreachable endpoint, timeout, non-2xx status, malformed body.
    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    /// The provider returned something that is not a decodable JWT.
    #[error("Malformed token: {0}")]
    MalformedToken(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::IdentityProvider(err.to_string())
    }
}
