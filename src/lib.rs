//! Mycel wallet core
//!
//! Derives a Mycel (Cosmos SDK) account from an EVM wallet signature:
//! - The EVM wallet signs a fixed EIP-712 onboarding payload
//! - The signature seeds a BIP-39 mnemonic and a BIP-32 secp256k1 key
//! - The signature is cached encrypted so returning users are not prompted
//! - A session reconciler keeps one active wallet paired with the connected
//!   EVM address
//!
//! # Security Model
//!
//! - Mnemonics and private keys exist only in memory and are zeroized on drop
//! - The cache stores AES-256-GCM ciphertext under a process-wide key
//! - A wallet is only handed out while its EVM address is the connected one

pub mod cache;
pub mod config;
pub mod derive;
pub mod registration;
pub mod session;
pub mod typed_data;
pub mod types;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use cache::{CredentialCache, DerivationStore, EncryptedDerivation, FileStore, MemoryStore};
pub use config::{ChainConfig, Config, EncryptionKey, OnboardingConfig};
pub use derive::{derive, derive_from_hex, PrivateInformation};
pub use error::{Error, Result};
pub use registration::DomainName;
pub use session::{Phase, SessionReconciler, SessionStatus};
pub use typed_data::OnboardingPayload;
pub use types::{EvmAddress, EvmSignature, SecondaryAddress};
pub use wallet::{DerivedWallet, LocalSignatureSource, SignatureSource};
