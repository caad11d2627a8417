// src/nonce.rs

use rand::RngCore;

/// Source of per-request nonces.
///
/// A fresh nonce is generated immediately before every outbound request and
/// compared against the `nonce` claim of the response token; it never
/// outlives the single flow invocation it was generated for.
pub trait NonceProvider: Send + Sync {
    /// Produces a fresh, cryptographically unpredictable opaque string.
    fn generate(&self) -> String;
}

/// Default provider: 32 bytes from the OS-seeded thread RNG, base64-url
/// encoded. Failure to obtain entropy panics; that is not a recoverable
/// condition.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNonce;

impl NonceProvider for RandomNonce {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        base64_url::encode(&bytes)
    }
}
