//! Local EVM signature source
//!
//! SECURITY: the EVM private key exists only here.
//! - Keys are held in alloy's PrivateKeySigner
//! - Keys are never serialized or logged
//! - The only operation is signing the onboarding payload

use crate::typed_data::OnboardingPayload;
use crate::types::{EvmAddress, EvmSignature};
use crate::wallet::SignatureSource;
use crate::{Error, Result};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;

/// Signature source backed by an in-process EVM key
pub struct LocalSignatureSource {
    /// The signer
    signer: PrivateKeySigner,
    /// Public address (safe to expose)
    address: Address,
}

impl LocalSignatureSource {
    /// Create a signer from an environment variable holding a hex private key
    pub fn from_env(var_name: &str) -> Result<Self> {
        let key_hex = std::env::var(var_name).map_err(|_| {
            Error::Config(format!(
                "Environment variable {} not set. Required for local signing.",
                var_name
            ))
        })?;

        Self::from_hex(&key_hex)
    }

    /// Create a signer from a hex-encoded private key
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        // Remove 0x prefix if present
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Config(format!("Invalid private key: {}", e)))?;

        let address = signer.address();
        Ok(Self { signer, address })
    }

    /// Get the public address (safe to share)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Normalized address as seen by the session reconciler
    pub fn evm_address(&self) -> EvmAddress {
        EvmAddress::from(self.address)
    }

    /// Sign the EIP-712 digest of the onboarding payload
    pub fn sign_payload(&self, payload: &OnboardingPayload) -> Result<EvmSignature> {
        let hash = payload.signing_hash();
        let signature = self
            .signer
            .sign_hash_sync(&hash)
            .map_err(|e| Error::Provider(format!("Signing failed: {}", e)))?;

        EvmSignature::from_bytes(&signature.as_bytes())
    }
}

#[async_trait]
impl SignatureSource for LocalSignatureSource {
    async fn request_signature(&self, payload: &OnboardingPayload) -> Result<EvmSignature> {
        tracing::debug!(
            address = %self.evm_address(),
            chain_id = payload.evm_chain_id(),
            "Signing onboarding payload with local key"
        );
        self.sign_payload(payload)
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for LocalSignatureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSignatureSource")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
