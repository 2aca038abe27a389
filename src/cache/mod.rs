//! Encrypted credential cache
//!
//! Persists the EVM signature that seeds a derived account, sealed with the
//! process-wide encryption key, so a returning user is restored without a
//! new signature prompt.

mod cipher;
mod store;

pub use cipher::{decrypt_signature, encrypt_signature};
pub use store::{DerivationStore, EncryptedDerivation, FileStore, MemoryStore};

use crate::config::EncryptionKey;
use crate::types::{EvmAddress, EvmSignature, SecondaryAddress};
use crate::{Error, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct CredentialCache {
    store: Arc<dyn DerivationStore>,
    key: Option<EncryptionKey>,
    /// Serializes writes and read-modify-write sequences
    write_lock: Mutex<()>,
}

impl CredentialCache {
    /// `key` is `None` when the deployment has no encryption key; `store`
    /// and `recover` then fail with `Error::NoKey`.
    pub fn new(store: Arc<dyn DerivationStore>, key: Option<EncryptionKey>) -> Self {
        Self {
            store,
            key,
            write_lock: Mutex::new(()),
        }
    }

    /// Cache backed by a fresh [`MemoryStore`]
    pub fn in_memory(key: Option<EncryptionKey>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), key)
    }

    fn key(&self) -> Result<&EncryptionKey> {
        self.key
            .as_ref()
            .ok_or_else(|| Error::NoKey("cache encryption key not configured".to_string()))
    }

    /// Encrypt and persist, replacing any prior record for `evm_address`
    pub async fn store(
        &self,
        evm_address: &EvmAddress,
        secondary_address: &SecondaryAddress,
        signature: &EvmSignature,
    ) -> Result<()> {
        let sealed = encrypt_signature(signature, self.key()?)?;

        let _guard = self.write_lock.lock().await;
        self.store
            .put(EncryptedDerivation {
                evm_address: evm_address.clone(),
                secondary_address: Some(secondary_address.clone()),
                encrypted_signature: Some(sealed),
                updated_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            evm_address = %evm_address,
            secondary_address = %secondary_address,
            "Stored encrypted derivation"
        );
        Ok(())
    }

    /// Drop the ciphertext, keeping the address metadata
    pub async fn forget(&self, evm_address: &EvmAddress) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let Some(mut record) = self.store.get(evm_address).await? else {
            return Ok(());
        };
        if record.is_forgotten() {
            return Ok(());
        }

        record.encrypted_signature = None;
        record.updated_at = Utc::now();
        self.store.put(record).await?;

        tracing::debug!(evm_address = %evm_address, "Forgot cached signature");
        Ok(())
    }

    /// Decrypt the cached signature for `evm_address`
    pub async fn recover(&self, evm_address: &EvmAddress) -> Result<EvmSignature> {
        let sealed = self
            .store
            .get(evm_address)
            .await?
            .and_then(|record| record.encrypted_signature)
            .ok_or_else(|| Error::NoRecord(evm_address.to_string()))?;

        decrypt_signature(&sealed, self.key()?)
    }

    /// Record metadata, including forgotten entries
    pub async fn record(&self, evm_address: &EvmAddress) -> Result<Option<EncryptedDerivation>> {
        self.store.get(evm_address).await
    }

    pub async fn list(&self) -> Result<Vec<EncryptedDerivation>> {
        self.store.list().await
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
