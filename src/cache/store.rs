//! Derivation store backends
//!
//! A store maps an EVM address to its [`EncryptedDerivation`] record. It
//! holds ciphertext only and never sees the encryption key.

use crate::types::{EvmAddress, SecondaryAddress};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Persisted derivation metadata for one EVM address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedDerivation {
    pub evm_address: EvmAddress,
    #[serde(default)]
    pub secondary_address: Option<SecondaryAddress>,
    /// `None` once forgotten
    #[serde(default)]
    pub encrypted_signature: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl EncryptedDerivation {
    pub fn is_forgotten(&self) -> bool {
        self.encrypted_signature.is_none()
    }
}

#[async_trait]
pub trait DerivationStore: Send + Sync {
    async fn get(&self, evm_address: &EvmAddress) -> Result<Option<EncryptedDerivation>>;

    /// Insert or replace the record keyed by `record.evm_address`
    async fn put(&self, record: EncryptedDerivation) -> Result<()>;

    async fn list(&self) -> Result<Vec<EncryptedDerivation>>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<EvmAddress, EncryptedDerivation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DerivationStore for MemoryStore {
    async fn get(&self, evm_address: &EvmAddress) -> Result<Option<EncryptedDerivation>> {
        Ok(self.records.read().await.get(evm_address).cloned())
    }

    async fn put(&self, record: EncryptedDerivation) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.evm_address.clone(), record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<EncryptedDerivation>> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.evm_address.cmp(&b.evm_address));
        Ok(records)
    }
}

/// JSON file store
///
/// The whole map is loaded on open and rewritten on every `put` through a
/// temporary file renamed over the target.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: RwLock<BTreeMap<EvmAddress, EncryptedDerivation>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => {
                let list: Vec<EncryptedDerivation> = serde_json::from_str(&content)
                    .map_err(|e| Error::Store(format!("{}: {}", path.display(), e)))?;
                list.into_iter()
                    .map(|record| (record.evm_address.clone(), record))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), records = records.len(), "Opened derivation store");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &BTreeMap<EvmAddress, EncryptedDerivation>) -> Result<()> {
        let list: Vec<&EncryptedDerivation> = records.values().collect();
        let json = serde_json::to_string_pretty(&list)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DerivationStore for FileStore {
    async fn get(&self, evm_address: &EvmAddress) -> Result<Option<EncryptedDerivation>> {
        Ok(self.records.read().await.get(evm_address).cloned())
    }

    async fn put(&self, record: EncryptedDerivation) -> Result<()> {
        let mut records = self.records.write().await;
        let previous = records.insert(record.evm_address.clone(), record.clone());

        if let Err(e) = self.persist(&records).await {
            // Keep memory consistent with disk
            match previous {
                Some(previous) => records.insert(record.evm_address.clone(), previous),
                None => records.remove(&record.evm_address),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<EncryptedDerivation>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
