#![allow(dead_code)]

use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tenant_auth::prelude::*;
use url::Url;

/// Installs a fmt subscriber once per test binary; `RUST_LOG` controls
/// verbosity of the engine's traces.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shared secret used to sign test tokens (HS256).
pub const SECRET: &[u8] = b"tenant-auth-test-secret";

/// Issuer placed in test tokens; matches the crate default.
pub const ISSUER: &str = "https://id.tenant-auth.dev/";

/// The instant the validation clock is frozen at: 2021-02-20T08:47:20Z.
pub const FROZEN_NOW: u64 = 1_613_810_840;

/// An hour past the frozen clock.
pub const FUTURE_EXP: u64 = FROZEN_NOW + 3_600;

pub struct FrozenClock(pub u64);

impl Clock for FrozenClock {
    fn now(&self) -> u64 {
        self.0
    }
}

/// Nonce provider that replays a fixed script of values, one per request.
pub struct ScriptedNonce {
    queue: Mutex<VecDeque<String>>,
}

impl ScriptedNonce {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(values.into_iter().map(Into::into).collect()),
        }
    }
}

impl NonceProvider for ScriptedNonce {
    fn generate(&self) -> String {
        self.queue
            .lock()
            .expect("nonce script lock poisoned")
            .pop_front()
            .expect("nonce script exhausted")
    }
}

/// Standard claims for a test token, issued shortly before the frozen clock.
pub fn standard_claims(aud: &str, nonce: &str, exp: u64) -> serde_json::Value {
    json!({
        "iss": ISSUER,
        "sub": "analyst@localhost",
        "aud": aud,
        "iat": FROZEN_NOW - 100,
        "exp": exp,
        "nonce": nonce,
    })
}

/// Signs claims with the shared test secret.
pub fn mint(claims: &serde_json::Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(SECRET),
    )
    .expect("failed to sign test token")
}

/// Signs claims with a different secret, producing an invalid signature.
pub fn mint_wrong_signature(claims: &serde_json::Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(b"not-the-right-secret"),
    )
    .expect("failed to sign test token")
}

pub fn decoding_key() -> DecodingKey {
    DecodingKey::from_secret(SECRET)
}

pub fn frozen_validator() -> Validator {
    init_tracing();
    Validator::new(decoding_key(), Algorithm::HS256).with_clock(Arc::new(FrozenClock(FROZEN_NOW)))
}

/// An `AuthManager` against the given endpoint with a frozen clock and a
/// scripted nonce source.
pub fn manager<I, S>(endpoint: &str, audience: &str, nonces: I) -> AuthManager
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    init_tracing();
    let config = Config::new(
        Url::parse(endpoint).expect("invalid test endpoint"),
        audience,
        ISSUER,
    );
    AuthManager::new(config, decoding_key(), Algorithm::HS256)
        .with_clock(Arc::new(FrozenClock(FROZEN_NOW)))
        .with_nonce_provider(Box::new(ScriptedNonce::new(nonces)))
}
