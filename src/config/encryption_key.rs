//! Process-wide encryption key for the credential cache
//!
//! The key is injected once at startup. A missing or empty key is reported
//! as `Error::NoKey` instead of silently disabling encryption.

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Environment variable holding the cache encryption key
pub const ENCRYPTION_KEY_ENV: &str = "PK_ENCRYPTION_KEY";

#[derive(Clone)]
pub struct EncryptionKey {
    secret: SecretString,
}

impl EncryptionKey {
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret: String = secret.into();
        if secret.is_empty() {
            return Err(Error::NoKey("encryption key is empty".to_string()));
        }
        Ok(Self {
            secret: SecretString::from(secret),
        })
    }

    /// Read the key from `PK_ENCRYPTION_KEY`
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(ENCRYPTION_KEY_ENV)
    }

    pub fn from_env_var(var_name: &str) -> Result<Self> {
        let value = std::env::var(var_name)
            .map_err(|_| Error::NoKey(format!("environment variable {} not set", var_name)))?;
        Self::new(value)
    }

    /// 256-bit cipher key: SHA-256 of the configured secret
    pub(crate) fn cipher_key(&self) -> Zeroizing<[u8; 32]> {
        let digest = Sha256::digest(self.secret.expose_secret().as_bytes());
        Zeroizing::new(digest.into())
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
