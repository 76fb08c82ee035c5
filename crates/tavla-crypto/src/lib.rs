//! Identity codec for tavla.
//!
//! Clients encrypt their actor identifier with the service's RSA public key
//! before placing it in a request header; the service decrypts it with its
//! private key. OAEP padding with SHA-256 (digest and MGF1, empty label)
//! makes the ciphertext non-deterministic and tamper-evident, and base64
//! makes it header-safe.
//!
//! The private key lives in a password-protected PKCS#8 PEM file loaded once
//! at startup; a process that cannot load it must not serve traffic.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand_core::OsRng;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rsa::Oaep;
use sha2::Sha256;
use thiserror::Error;

pub use rsa::{RsaPrivateKey, RsaPublicKey};

#[derive(Debug, Error)]
pub enum EncryptError {
    #[error("RSA-OAEP encryption failed")]
    Rsa(#[source] rsa::Error),
}

/// Decryption failures. All variants are attacker-reachable via the identity
/// header and must surface as an authorization failure, never a server fault.
#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("identity ciphertext is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("RSA-OAEP decryption failed")]
    Rsa(#[source] rsa::Error),
    #[error("decrypted identity is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read key file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decrypt or parse private key")]
    Pkcs8(#[from] pkcs8::Error),
    #[error("key generation failed")]
    Generate(#[source] rsa::Error),
}

/// Encrypt an actor identifier under the service public key.
///
/// This is the client-side half of the codec; servers only decrypt.
pub fn encrypt_identity(actor_id: &str, public_key: &RsaPublicKey) -> Result<String, EncryptError> {
    let ciphertext = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), actor_id.as_bytes())
        .map_err(EncryptError::Rsa)?;
    Ok(STANDARD.encode(ciphertext))
}

/// Decrypt a base64 identity ciphertext from a request header.
pub fn decrypt_identity(
    header_value: &str,
    private_key: &RsaPrivateKey,
) -> Result<String, DecryptError> {
    let ciphertext = STANDARD.decode(header_value.as_bytes())?;
    let plaintext = private_key
        .decrypt(Oaep::new::<Sha256>(), &ciphertext)
        .map_err(DecryptError::Rsa)?;
    Ok(String::from_utf8(plaintext)?)
}

/// Load the service private key from a password-protected PKCS#8 PEM file.
pub fn load_private_key(
    path: impl AsRef<Path>,
    password: &str,
) -> Result<RsaPrivateKey, KeyError> {
    let path = path.as_ref();
    let pem = std::fs::read_to_string(path).map_err(|source| KeyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RsaPrivateKey::from_pkcs8_encrypted_pem(&pem, password)?)
}

/// Generate a fresh private key (provisioning and tests).
pub fn generate_private_key(bits: usize) -> Result<RsaPrivateKey, KeyError> {
    RsaPrivateKey::new(&mut OsRng, bits).map_err(KeyError::Generate)
}

/// Serialize a private key as a password-protected PKCS#8 PEM (provisioning).
pub fn to_encrypted_pem(key: &RsaPrivateKey, password: &str) -> Result<String, KeyError> {
    let pem = key.to_pkcs8_encrypted_pem(OsRng, password.as_bytes(), LineEnding::LF)?;
    Ok(pem.to_string())
}
