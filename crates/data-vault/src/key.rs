//! Vault Key Handling

use crate::VaultError;
use rand::RngCore;
use zeroize::Zeroizing;

/// A 256-bit vault key, zeroized on drop.
pub struct VaultKey {
    material: Zeroizing<[u8; 32]>,
}

impl VaultKey {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self {
            material: Zeroizing::new(bytes),
        }
    }

    /// Decode a 64-character hex string (the SECRET_KEY env format)
    pub fn from_hex(hex_str: &str) -> Result<Self, VaultError> {
        let decoded = hex::decode(hex_str.trim())
            .map_err(|e| VaultError::InvalidKey(format!("not valid hex: {}", e)))?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| VaultError::InvalidKey("key must be exactly 32 bytes".to_string()))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Generate a fresh random key
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    pub(crate) fn material(&self) -> &[u8; 32] {
        &self.material
    }
}
