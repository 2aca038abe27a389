//! EIP-712 onboarding payload
//!
//! The payload has no nonce or timestamp: the same EVM key must produce the
//! same signature every time, which is what makes the derived account
//! reproducible.

use crate::config::OnboardingConfig;
use crate::Result;
use alloy::dyn_abi::TypedData;
use alloy::primitives::{B256, U256};
use alloy::sol_types::{Eip712Domain, SolStruct};
use serde_json::Value;
use std::borrow::Cow;

alloy::sol! {
    /// Primary type of the onboarding message
    #[derive(serde::Serialize, serde::Deserialize)]
    struct Mycel {
        string action;
    }
}

/// Typed-data payload handed to the signature source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingPayload {
    domain_name: String,
    action: String,
    evm_chain_id: u64,
}

impl OnboardingPayload {
    pub fn new(config: &OnboardingConfig) -> Self {
        Self {
            domain_name: config.domain_name.clone(),
            action: config.action.clone(),
            evm_chain_id: config.evm_chain_id,
        }
    }

    pub fn evm_chain_id(&self) -> u64 {
        self.evm_chain_id
    }

    /// Domain with only `name` and `chainId` set
    pub fn domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.domain_name.clone())),
            None,
            Some(U256::from(self.evm_chain_id)),
            None,
            None,
        )
    }

    pub fn message(&self) -> Mycel {
        Mycel {
            action: self.action.clone(),
        }
    }

    /// Digest an EVM signer signs: `keccak256(0x1901 || domainSeparator || structHash)`
    pub fn signing_hash(&self) -> B256 {
        self.message().eip712_signing_hash(&self.domain())
    }

    /// Dynamic typed data for wallets that sign outside this process
    pub fn typed_data(&self) -> TypedData {
        TypedData::from_struct(&self.message(), Some(self.domain()))
    }

    /// `eth_signTypedData_v4` JSON
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.typed_data())?)
    }
}

impl Default for OnboardingPayload {
    fn default() -> Self {
        Self::new(&OnboardingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;

    fn manual_signing_hash(name: &str, chain_id: u64, action: &str) -> B256 {
        let domain_type = keccak256("EIP712Domain(string name,uint256 chainId)");
        let mut domain = Vec::new();
        domain.extend_from_slice(domain_type.as_slice());
        domain.extend_from_slice(keccak256(name).as_slice());
        domain.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
        let domain_separator = keccak256(&domain);

        let struct_type = keccak256("Mycel(string action)");
        let mut body = Vec::new();
        body.extend_from_slice(struct_type.as_slice());
        body.extend_from_slice(keccak256(action).as_slice());
        let struct_hash = keccak256(&body);

        let mut digest = vec![0x19, 0x01];
        digest.extend_from_slice(domain_separator.as_slice());
        digest.extend_from_slice(struct_hash.as_slice());
        keccak256(&digest)
    }

    #[test]
    fn signing_hash_matches_eip712_encoding() {
        let payload = OnboardingPayload::default();
        assert_eq!(
            payload.signing_hash(),
            manual_signing_hash("Mycel", 1, "Mycel Onboarding")
        );
    }

    #[test]
    fn signing_hash_is_stable_and_chain_bound() {
        let payload = OnboardingPayload::default();
        assert_eq!(payload.signing_hash(), payload.clone().signing_hash());

        let other_chain = OnboardingPayload::new(&OnboardingConfig {
            evm_chain_id: 11155111,
            ..OnboardingConfig::default()
        });
        assert_ne!(payload.signing_hash(), other_chain.signing_hash());
    }

    #[test]
    fn typed_data_hashes_like_the_static_struct() {
        let payload = OnboardingPayload::default();
        assert_eq!(
            payload.typed_data().eip712_signing_hash().unwrap(),
            payload.signing_hash()
        );
    }

    #[test]
    fn json_form_names_primary_type() {
        let value = OnboardingPayload::default().to_json().unwrap();
        assert_eq!(value["primaryType"], "Mycel");
        assert_eq!(value["domain"]["name"], "Mycel");
        assert_eq!(value["message"]["action"], "Mycel Onboarding");
        assert_eq!(value["types"]["Mycel"][0]["name"], "action");

        let parsed: TypedData = serde_json::from_value(value).unwrap();
        assert_eq!(
            parsed.eip712_signing_hash().unwrap(),
            OnboardingPayload::default().signing_hash()
        );
    }
}
