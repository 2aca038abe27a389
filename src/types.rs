//! Identifiers and signature material shared across the crate

use crate::{Error, Result};
use alloy::hex;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of an EVM `r || s || v` signature.
pub const EVM_SIGNATURE_LEN: usize = 65;

/// Connected primary-chain account, always lowercase `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvmAddress(String);

impl EvmAddress {
    /// Parse and normalize an address. Checksums are not enforced.
    pub fn parse(input: &str) -> Result<Self> {
        let address = Address::from_str(input.trim())
            .map_err(|e| Error::InvalidArgument(format!("Invalid EVM address {input:?}: {e}")))?;
        Ok(Self::from(address))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Address> for EvmAddress {
    fn from(address: Address) -> Self {
        Self(format!("0x{}", hex::encode(address.as_slice())))
    }
}

impl FromStr for EvmAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EvmAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<EvmAddress> for String {
    fn from(address: EvmAddress) -> Self {
        address.0
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bech32 address of a derived Mycel account. Only produced by derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecondaryAddress(String);

impl SecondaryAddress {
    pub(crate) fn new(address: String) -> Self {
        Self(address)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecondaryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for SecondaryAddress {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SecondaryAddress {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Raw 65-byte EVM signature over the onboarding payload.
///
/// Whoever holds these bytes can regenerate the derived Mycel key, so they
/// are treated like key material: zeroized on drop and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EvmSignature([u8; EVM_SIGNATURE_LEN]);

impl EvmSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != EVM_SIGNATURE_LEN {
            return Err(Error::Derivation(format!(
                "Signature must be {} bytes, got {}",
                EVM_SIGNATURE_LEN,
                bytes.len()
            )));
        }
        let mut array = [0u8; EVM_SIGNATURE_LEN];
        array.copy_from_slice(bytes);
        Ok(Self(array))
    }

    /// Parse a hex signature, with or without `0x` prefix
    pub fn from_hex(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let mut bytes = hex::decode(trimmed)
            .map_err(|e| Error::Derivation(format!("Invalid signature hex: {}", e)))?;
        let signature = Self::from_bytes(&bytes);
        bytes.zeroize();
        signature
    }

    pub fn as_bytes(&self) -> &[u8; EVM_SIGNATURE_LEN] {
        &self.0
    }

    /// The `r || s` half used as derivation input; `v` is ignored.
    pub fn rs(&self) -> &[u8] {
        &self.0[..64]
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for EvmSignature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for EvmSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EvmSignature").field(&"[REDACTED]").finish()
    }
}
