//! Deterministic key derivation from an EVM signature
//!
//! `keccak256(r || s)` is used as 256 bits of BIP-39 entropy. The resulting
//! 24-word mnemonic is the root of the Mycel account, so the same EVM key
//! signing the same onboarding payload always yields the same account.
//!
//! This module is pure: no randomness, clock, or I/O.

use crate::config::ChainConfig;
use crate::types::EvmSignature;
use crate::wallet::{derive_xprv, DerivedWallet};
use crate::{Error, Result};
use alloy::primitives::keccak256;
use bip39::Mnemonic;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// HD key material of a derived account
///
/// Memory only. The mnemonic and private key are zeroized when this value is
/// dropped, and `Debug` never prints them.
pub struct PrivateInformation {
    mnemonic: SecretString,
    private_key: Zeroizing<[u8; 32]>,
    public_key: [u8; 33],
}

impl PrivateInformation {
    pub fn mnemonic(&self) -> &SecretString {
        &self.mnemonic
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// Compressed secp256k1 public key
    pub fn public_key(&self) -> &[u8; 33] {
        &self.public_key
    }
}

impl std::fmt::Debug for PrivateInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateInformation")
            .field("mnemonic", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &alloy::hex::encode(self.public_key))
            .finish()
    }
}

/// Derive the HD key only
pub fn derive_hd_key(signature: &EvmSignature, chain: &ChainConfig) -> Result<PrivateInformation> {
    let entropy = Zeroizing::new(keccak256(signature.rs()).0);
    let mnemonic = Mnemonic::from_entropy(entropy.as_slice())
        .map_err(|e| Error::Derivation(format!("Entropy rejected: {e}")))?;
    let mnemonic = SecretString::from(mnemonic.to_string());

    let xprv = derive_xprv(mnemonic.expose_secret(), &chain.hd_path)?;

    Ok(PrivateInformation {
        private_key: Zeroizing::new(xprv.to_bytes()),
        public_key: xprv.public_key().to_bytes(),
        mnemonic,
    })
}

/// Derive the HD key and build the signer objects from its mnemonic
pub fn derive(
    signature: &EvmSignature,
    chain: &ChainConfig,
) -> Result<(PrivateInformation, DerivedWallet)> {
    let private = derive_hd_key(signature, chain)?;
    let wallet = DerivedWallet::from_mnemonic(private.mnemonic(), chain)?;

    if wallet.public_key() != private.public_key() {
        return Err(Error::Derivation(
            "Signer key does not match derived HD key".to_string(),
        ));
    }

    tracing::debug!(address = %wallet.address(), "Derived Mycel wallet from EVM signature");
    Ok((private, wallet))
}

/// Hex signature convenience wrapper, as handed over by browser wallets
pub fn derive_from_hex(
    signature_hex: &str,
    chain: &ChainConfig,
) -> Result<(PrivateInformation, DerivedWallet)> {
    let signature = EvmSignature::from_hex(signature_hex)?;
    derive(&signature, chain)
}
