// src/lib.rs

pub mod client;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod nonce;
pub mod validator;

/// The public prelude for the `tenant-auth` crate.
///
/// This module re-exports the most commonly used types for convenience.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::AuthError;
    pub use crate::manager::AuthManager;
    pub use crate::model::{Group, Tenant, TenantUser, Token, TokenClaims, User};
    pub use crate::nonce::{NonceProvider, RandomNonce};
    pub use crate::validator::{Clock, Expected, SystemClock, Validator};
    pub use jsonwebtoken::Algorithm;
}
