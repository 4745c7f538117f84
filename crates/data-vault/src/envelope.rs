//! AES-256-GCM Envelope Encryption

use crate::{VaultError, VaultKey};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};

// AES-GCM standard nonce size
const NONCE_SIZE: usize = 12;

/// Sealed payload: nonce + ciphertext (the GCM tag rides in the ciphertext)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

/// Encrypt plaintext under the vault key with a fresh random nonce
pub fn encrypt(key: &VaultKey, plaintext: &[u8]) -> Result<EncryptedEnvelope, VaultError> {
    let cipher = Aes256Gcm::new_from_slice(key.material())
        .map_err(|e| VaultError::Encryption(format!("cipher init failed: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| VaultError::Encryption(format!("encryption failed: {}", e)))?;

    Ok(EncryptedEnvelope {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypt an envelope under the vault key
pub fn decrypt(key: &VaultKey, envelope: &EncryptedEnvelope) -> Result<Vec<u8>, VaultError> {
    let cipher = Aes256Gcm::new_from_slice(key.material())
        .map_err(|e| VaultError::Decryption(format!("cipher init failed: {}", e)))?;

    cipher
        .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_ref())
        .map_err(|e| VaultError::Decryption(format!("decryption failed: {}", e)))
}

/// Serialize a value to JSON and seal it
pub fn encrypt_value<T: Serialize>(
    key: &VaultKey,
    value: &T,
) -> Result<EncryptedEnvelope, VaultError> {
    let plaintext = serde_json::to_vec(value)
        .map_err(|e| VaultError::Serialization(format!("serialize failed: {}", e)))?;
    encrypt(key, &plaintext)
}

/// Unseal an envelope and deserialize the JSON payload
pub fn decrypt_value<T: for<'de> Deserialize<'de>>(
    key: &VaultKey,
    envelope: &EncryptedEnvelope,
) -> Result<T, VaultError> {
    let plaintext = decrypt(key, envelope)?;
    serde_json::from_slice(&plaintext)
        .map_err(|e| VaultError::Serialization(format!("deserialize failed: {}", e)))
}
