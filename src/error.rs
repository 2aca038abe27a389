//! Error types for the Mycel wallet core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed signature or the HD derivation rejected the entropy.
    /// Not retryable with the same input; the user should sign again.
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    /// No recoverable derivation is cached for this address.
    #[error("No cached derivation for {0}")]
    NoRecord(String),

    /// Ciphertext is corrupted, foreign, or was sealed with another key.
    #[error("Failed to decrypt cached signature: {0}")]
    Decrypt(String),

    /// The process-wide encryption key is missing or empty.
    #[error("Encryption key not configured: {0}")]
    NoKey(String),

    #[error("Signature request rejected by user: {0}")]
    UserRejected(String),

    #[error("Signature provider error: {0}")]
    Provider(String),

    #[error("No active Mycel wallet")]
    NoActiveWallet,

    #[error("No EVM address connected")]
    NotConnected,

    /// A fresh derivation resolved after the connected address changed or a
    /// newer request was issued.
    #[error("Derivation request superseded: {0}")]
    Superseded(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Derivation store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Errors that mean "nothing usable is cached" rather than a fault.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Error::NoRecord(_) | Error::Decrypt(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
