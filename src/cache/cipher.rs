//! AES-256-GCM sealing of EVM signatures
//!
//! Ciphertext format: `base64(nonce || ciphertext || tag)` with a random
//! 96-bit nonce per seal.

use crate::config::EncryptionKey;
use crate::types::EvmSignature;
use crate::{Error, Result};
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use zeroize::Zeroizing;

const NONCE_LEN: usize = 12;

fn cipher(key: &EncryptionKey) -> Aes256Gcm {
    let key_bytes = key.cipher_key();
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes.as_slice()))
}

pub fn encrypt_signature(signature: &EvmSignature, key: &EncryptionKey) -> Result<String> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher(key)
        .encrypt(&nonce, signature.as_bytes().as_slice())
        .map_err(|e| Error::Store(format!("Encryption failed: {e}")))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(nonce.as_slice());
    sealed.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(sealed))
}

pub fn decrypt_signature(sealed: &str, key: &EncryptionKey) -> Result<EvmSignature> {
    let bytes = BASE64
        .decode(sealed.trim())
        .map_err(|e| Error::Decrypt(format!("invalid base64: {e}")))?;
    if bytes.len() <= NONCE_LEN {
        return Err(Error::Decrypt("ciphertext too short".to_string()));
    }

    let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
    let plaintext = Zeroizing::new(
        cipher(key)
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Decrypt("authentication failed".to_string()))?,
    );

    EvmSignature::from_bytes(&plaintext)
        .map_err(|_| Error::Decrypt(format!("plaintext is {} bytes", plaintext.len())))
}
