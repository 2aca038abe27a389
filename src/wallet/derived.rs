//! Mycel signer objects built from a derived mnemonic
//!
//! SECURITY: the secp256k1 signing keys live only inside the signers.
//! - `k256::ecdsa::SigningKey` zeroizes itself on drop
//! - Neither signer implements `Serialize`
//! - `Debug` output shows addresses only

use crate::config::ChainConfig;
use crate::types::SecondaryAddress;
use crate::wallet::sign_doc::{
    AminoSignResponse, DirectSignResponse, PubKey, SignDoc, StdSignDoc, StdSignature,
};
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bech32::{Bech32, Hrp};
use bip32::{DerivationPath, XPrv};
use bip39::Mnemonic;
use k256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};
use ripemd::Ripemd160;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::str::FromStr;
use zeroize::Zeroizing;

/// Amino type tag of a secp256k1 public key
pub const SECP256K1_PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Public account entry, safe to share
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub address: SecondaryAddress,
    pub algo: &'static str,
    /// Compressed secp256k1 public key
    pub pubkey: Vec<u8>,
}

/// Bech32 address: `bech32(prefix, ripemd160(sha256(pubkey)))`
pub fn pubkey_to_address(pubkey_bytes: &[u8], prefix: &str) -> Result<SecondaryAddress> {
    let sha_hash = Sha256::digest(pubkey_bytes);
    let ripemd_hash = Ripemd160::digest(sha_hash);

    let hrp = Hrp::parse(prefix)
        .map_err(|e| Error::Config(format!("Invalid bech32 prefix {prefix:?}: {e}")))?;
    let address = bech32::encode::<Bech32>(hrp, &ripemd_hash)
        .map_err(|e| Error::Derivation(format!("Bech32 encoding failed: {e}")))?;

    Ok(SecondaryAddress::new(address))
}

/// Derive the extended private key at `chain.hd_path` from a mnemonic phrase
pub(crate) fn derive_xprv(phrase: &str, hd_path: &str) -> Result<XPrv> {
    let mnemonic = Mnemonic::parse(phrase)
        .map_err(|e| Error::Derivation(format!("Invalid mnemonic: {e}")))?;
    let seed = Zeroizing::new(mnemonic.to_seed(""));

    let path = DerivationPath::from_str(hd_path)
        .map_err(|e| Error::Config(format!("Invalid HD path {hd_path}: {e}")))?;

    XPrv::derive_from_path(seed.as_slice(), &path)
        .map_err(|e| Error::Derivation(format!("HD derivation failed: {e}")))
}

/// One HD account shared by both signing modes
struct HdAccount {
    address: SecondaryAddress,
    signing_key: SigningKey,
    public_key: [u8; 33],
}

impl HdAccount {
    fn from_mnemonic(mnemonic: &SecretString, chain: &ChainConfig) -> Result<Self> {
        let xprv = derive_xprv(mnemonic.expose_secret(), &chain.hd_path)?;
        let public_key = xprv.public_key().to_bytes();
        let address = pubkey_to_address(&public_key, &chain.bech32_prefix)?;

        Ok(Self {
            address,
            signing_key: xprv.private_key().clone(),
            public_key,
        })
    }

    fn account_data(&self) -> AccountData {
        AccountData {
            address: self.address.clone(),
            algo: "secp256k1",
            pubkey: self.public_key.to_vec(),
        }
    }

    fn check_signer(&self, signer_address: &str) -> Result<()> {
        if self.address.as_str() != signer_address {
            return Err(Error::Signing(format!(
                "Address {} not found in wallet",
                signer_address
            )));
        }
        Ok(())
    }

    /// ECDSA over `sha256(bytes)`, low-S, encoded as an amino `StdSignature`
    fn sign(&self, bytes: &[u8]) -> Result<StdSignature> {
        let digest = Sha256::digest(bytes);
        let signature: Signature = self
            .signing_key
            .sign_prehash(&digest)
            .map_err(|e| Error::Signing(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);

        Ok(StdSignature {
            pub_key: PubKey {
                key_type: SECP256K1_PUBKEY_TYPE.to_string(),
                value: BASE64.encode(self.public_key),
            },
            signature: BASE64.encode(signature.to_bytes()),
        })
    }
}

/// Protobuf (`SIGN_MODE_DIRECT`) signer
pub struct DirectSigner {
    account: HdAccount,
}

impl DirectSigner {
    pub fn from_mnemonic(mnemonic: &SecretString, chain: &ChainConfig) -> Result<Self> {
        Ok(Self {
            account: HdAccount::from_mnemonic(mnemonic, chain)?,
        })
    }

    pub fn get_accounts(&self) -> Vec<AccountData> {
        vec![self.account.account_data()]
    }

    pub fn sign_direct(&self, signer_address: &str, sign_doc: SignDoc) -> Result<DirectSignResponse> {
        self.account.check_signer(signer_address)?;
        let bytes = sign_doc
            .clone()
            .into_bytes()
            .map_err(|e| Error::Signing(format!("Failed to encode sign doc: {e}")))?;
        let signature = self.account.sign(&bytes)?;
        Ok(DirectSignResponse {
            signed: sign_doc,
            signature,
        })
    }
}

/// Legacy amino JSON (`SIGN_MODE_LEGACY_AMINO_JSON`) signer
pub struct AminoSigner {
    account: HdAccount,
}

impl AminoSigner {
    pub fn from_mnemonic(mnemonic: &SecretString, chain: &ChainConfig) -> Result<Self> {
        Ok(Self {
            account: HdAccount::from_mnemonic(mnemonic, chain)?,
        })
    }

    pub fn get_accounts(&self) -> Vec<AccountData> {
        vec![self.account.account_data()]
    }

    pub fn sign_amino(&self, signer_address: &str, sign_doc: StdSignDoc) -> Result<AminoSignResponse> {
        self.account.check_signer(signer_address)?;
        let json = sign_doc.to_canonical_json()?;
        let signature = self.account.sign(json.as_bytes())?;
        Ok(AminoSignResponse {
            signed: sign_doc,
            signature,
        })
    }
}

/// Account list plus one signer per signing mode
///
/// Rebuilt from the mnemonic whenever it changes, never mutated in place.
pub struct DerivedWallet {
    accounts: Vec<AccountData>,
    direct: DirectSigner,
    amino: AminoSigner,
}

impl DerivedWallet {
    pub fn from_mnemonic(mnemonic: &SecretString, chain: &ChainConfig) -> Result<Self> {
        let direct = DirectSigner::from_mnemonic(mnemonic, chain)?;
        let amino = AminoSigner::from_mnemonic(mnemonic, chain)?;
        let accounts = direct.get_accounts();

        Ok(Self {
            accounts,
            direct,
            amino,
        })
    }

    pub fn accounts(&self) -> &[AccountData] {
        &self.accounts
    }

    /// Address of the first (and only) account
    pub fn address(&self) -> &SecondaryAddress {
        &self.direct.account.address
    }

    pub fn public_key(&self) -> &[u8; 33] {
        &self.direct.account.public_key
    }

    pub fn direct_signer(&self) -> &DirectSigner {
        &self.direct
    }

    pub fn amino_signer(&self) -> &AminoSigner {
        &self.amino
    }
}

impl std::fmt::Debug for DerivedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedWallet")
            .field("address", self.address())
            .field("signers", &"[REDACTED]")
            .finish()
    }
}
