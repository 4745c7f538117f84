//! Server configuration from the environment

use data_vault::VaultKey;
use tracing::warn;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub addr: String,
    /// Hex-encoded 256-bit payload key, if provided
    pub secret_key_hex: Option<String>,
}

impl ServerConfig {
    /// Read configuration from `PORT` and `SECRET_KEY`
    pub fn from_env() -> Self {
        let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
        Self {
            addr: format!("0.0.0.0:{port}"),
            secret_key_hex: std::env::var("SECRET_KEY").ok(),
        }
    }

    /// Resolve the vault key, generating an ephemeral one when unset.
    ///
    /// An ephemeral key means payloads do not survive a restart; fine for
    /// development, logged loudly so it is never a surprise elsewhere.
    pub fn vault_key(&self) -> Result<VaultKey, data_vault::VaultError> {
        match &self.secret_key_hex {
            Some(hex_str) => VaultKey::from_hex(hex_str),
            None => {
                warn!("SECRET_KEY not set; using an ephemeral vault key");
                Ok(VaultKey::generate())
            }
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:5000".to_string(),
            secret_key_hex: None,
        }
    }
}
