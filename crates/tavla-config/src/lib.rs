//! Server configuration module.
//!
//! Supports configuration via environment variables:
//!
//! ```bash
//! # Signing secret for access tokens; also the private key file password.
//! TAVLA_SECRET_KEY=project-service-secret
//!
//! # HMAC signing algorithm (HS256 by default).
//! TAVLA_ALGORITHM=HS256
//!
//! # Password-protected PKCS#8 PEM with the identity-codec private key.
//! TAVLA_PRIVATE_KEYFILE=private.pem
//! ```
//!
//! The private key is loaded once at startup via [`Settings::private_key`];
//! if that fails the process must not begin serving traffic.

use std::env;
use std::path::PathBuf;

use jsonwebtoken::Algorithm;
use tavla_crypto::{KeyError, RsaPrivateKey};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("unsupported signing algorithm: {0}. Expected HS256, HS384, or HS512")]
    InvalidAlgorithm(String),

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Process settings for token signing and identity decryption.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Symmetric token signing secret; doubles as the key file password.
    pub secret_key: String,
    /// HMAC-family token signing algorithm.
    pub algorithm: Algorithm,
    /// Path to the password-protected private key file.
    pub private_keyfile: PathBuf,
}

impl Settings {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = env::var("TAVLA_SECRET_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("TAVLA_SECRET_KEY".to_string()))?;
        let algorithm = env::var("TAVLA_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let private_keyfile =
            env::var("TAVLA_PRIVATE_KEYFILE").unwrap_or_else(|_| "private.pem".to_string());

        Self::new(secret_key, &algorithm, private_keyfile.into())
    }

    /// Build settings from explicit values, validating the algorithm.
    pub fn new(
        secret_key: String,
        algorithm: &str,
        private_keyfile: PathBuf,
    ) -> Result<Self, ConfigError> {
        let algorithm = match algorithm.parse::<Algorithm>() {
            Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => alg,
            _ => return Err(ConfigError::InvalidAlgorithm(algorithm.to_string())),
        };
        Ok(Self {
            secret_key,
            algorithm,
            private_keyfile,
        })
    }

    /// Load and decrypt the identity-codec private key.
    ///
    /// This is the one fatal failure point: callers should abort startup on
    /// error rather than serve without decryption material.
    pub fn private_key(&self) -> Result<RsaPrivateKey, ConfigError> {
        Ok(tavla_crypto::load_private_key(
            &self.private_keyfile,
            &self.secret_key,
        )?)
    }
}
