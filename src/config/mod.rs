//! Configuration for the Mycel wallet core

mod encryption_key;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use encryption_key::{EncryptionKey, ENCRYPTION_KEY_ENV};

/// EVM private key used by the CLI's local signature source
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Default bech32 prefix of Mycel addresses
pub const BECH32_PREFIX: &str = "mycel";

/// Cosmos coin type 118, first account, first address
pub const DEFAULT_HD_PATH: &str = "m/44'/118'/0'/0/0";

/// Secondary-chain parameters used to build signers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Bech32 human-readable prefix
    pub bech32_prefix: String,
    /// BIP-32 path of the signing key
    pub hd_path: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            bech32_prefix: BECH32_PREFIX.to_string(),
            hd_path: DEFAULT_HD_PATH.to_string(),
        }
    }
}

/// EIP-712 onboarding payload parameters
///
/// Changing any of these changes every derived account, so they are fixed
/// per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingConfig {
    /// EIP-712 domain name
    pub domain_name: String,
    /// Value of the `action` field
    pub action: String,
    /// EIP-712 domain chain id
    pub evm_chain_id: u64,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            domain_name: "Mycel".to_string(),
            action: "Mycel Onboarding".to_string(),
            evm_chain_id: 1,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Secondary-chain settings
    #[serde(default)]
    pub chain: ChainConfig,
    /// Typed-data payload settings
    #[serde(default)]
    pub onboarding: OnboardingConfig,
    /// Path to the persisted derivation store (memory only when unset)
    #[serde(default)]
    pub store_path: Option<String>,
}

impl Config {
    /// Load a JSON config file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chain.bech32_prefix.is_empty() {
            return Err(Error::Config("chain.bech32_prefix must not be empty".into()));
        }
        if !self.chain.hd_path.starts_with("m/") {
            return Err(Error::Config(format!(
                "chain.hd_path must start with m/, got {}",
                self.chain.hd_path
            )));
        }
        if self.onboarding.domain_name.is_empty() {
            return Err(Error::Config("onboarding.domain_name must not be empty".into()));
        }
        Ok(())
    }
}
