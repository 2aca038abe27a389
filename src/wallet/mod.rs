//! Wallet management
//!
//! Two sides of one identity live here:
//! - the EVM [`SignatureSource`] that signs the onboarding payload
//! - the derived Mycel [`DerivedWallet`] with its direct and amino signers
//!
//! Secret key material never leaves this module except through
//! `PrivateInformation`, which is memory only.

mod derived;
mod sign_doc;
mod signer;
mod source;

pub(crate) use derived::derive_xprv;
pub use derived::{
    pubkey_to_address, AccountData, AminoSigner, DerivedWallet, DirectSigner,
    SECP256K1_PUBKEY_TYPE,
};
pub use sign_doc::{
    AminoMsg, AminoSignResponse, Coin, DirectSignResponse, PubKey, SignDoc, StdFee, StdSignDoc,
    StdSignature,
};
pub use signer::LocalSignatureSource;
pub use source::SignatureSource;
