// src/validator.rs

use crate::config::Config;
use crate::error::AuthError;
use crate::model::{Token, TokenClaims};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument};

/// Time source for the expiry check. Injectable so tests can freeze it.
pub trait Clock: Send + Sync {
    /// Current time as seconds since the Unix epoch.
    fn now(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

/// The values a token must match, captured once per flow invocation.
///
/// Issuer and audience are snapshotted from the [`Config`] in effect when the
/// flow starts; the nonce is the one generated for that specific request.
#[derive(Debug, Clone)]
pub struct Expected {
    pub issuer: String,
    pub audience: String,
    pub nonce: String,
}

impl Expected {
    /// Snapshots the current config together with a freshly generated nonce.
    pub fn snapshot(config: &Config, nonce: String) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            nonce,
        }
    }
}

/// Decodes tokens received from the identity provider and runs the
/// fixed-order validation pipeline against them.
///
/// The order is a security property: signature first, so no claim is read
/// from an unverified token, then expiry, issuer, audience, nonce. Each
/// stage short-circuits with its own error.
#[derive(Clone)]
pub struct Validator {
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl Validator {
    /// Creates a validator verifying signatures with the given key and
    /// algorithm, using wall-clock time for the expiry check.
    pub fn new(decoding_key: DecodingKey, algorithm: Algorithm) -> Self {
        Self {
            decoding_key,
            algorithm,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source. Used by tests to freeze the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates a raw token against the expected issuer, audience and nonce.
    ///
    /// Runs, in order: signature, expiry, issuer, audience, nonce. All five
    /// checks are unconditional; the decoded [`Token`] is returned only if
    /// every one passes.
    #[instrument(skip(self, raw), err)]
    pub fn validate(&self, raw: &str, expected: &Expected) -> Result<Token, AuthError> {
        // 1. Signature. Claims must not be trusted before this passes.
        let claims = self.check_signature(raw)?;
        debug!(sub = %claims.sub, "token signature verified");

        // 2-5. Claim checks, short-circuiting in pipeline order.
        check_expiry(&claims, self.clock.now())?;
        check_issuer(&claims, &expected.issuer)?;
        check_audience(&claims, &expected.audience)?;
        check_nonce(&claims, &expected.nonce)?;

        Ok(Token {
            raw: raw.to_owned(),
            claims,
        })
    }

    /// Verifies the signature and decodes the claims. Claim validation is
    /// deliberately disabled here; the pipeline performs those checks itself
    /// so each stage yields its distinct error.
    fn check_signature(&self, raw: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        match decode::<TokenClaims>(raw, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    Err(AuthError::InvalidSignature)
                }
                _ => Err(AuthError::MalformedToken(err)),
            },
        }
    }
}

fn check_expiry(claims: &TokenClaims, now: u64) -> Result<(), AuthError> {
    if now >= claims.exp {
        return Err(AuthError::TokenExpired);
    }
    Ok(())
}

fn check_issuer(claims: &TokenClaims, expected: &str) -> Result<(), AuthError> {
    if claims.iss != expected {
        return Err(AuthError::IssuerMismatch {
            expected: expected.to_owned(),
            actual: claims.iss.clone(),
        });
    }
    Ok(())
}

fn check_audience(claims: &TokenClaims, expected: &str) -> Result<(), AuthError> {
    if claims.aud != expected {
        return Err(AuthError::AudienceMismatch {
            expected: expected.to_owned(),
            actual: claims.aud.clone(),
        });
    }
    Ok(())
}

fn check_nonce(claims: &TokenClaims, expected: &str) -> Result<(), AuthError> {
    if claims.nonce != expected {
        return Err(AuthError::NonceMismatch {
            expected: expected.to_owned(),
            actual: claims.nonce.clone(),
        });
    }
    Ok(())
}
