//! Payload Vault
//!
//! Sensor payloads are stored encrypted and only released after a
//! positive policy decision. Each payload is sealed with AES-256-GCM
//! under a service-wide key; the random nonce travels with the
//! ciphertext.

mod envelope;
mod key;

pub use envelope::{decrypt, decrypt_value, encrypt, encrypt_value, EncryptedEnvelope};
pub use key::VaultKey;

use thiserror::Error;

/// Vault errors
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Invalid key material: {0}")]
    InvalidKey(String),
}
