//! Signature source seam
//!
//! The EVM wallet that signs the onboarding payload is external: a browser
//! extension, a hardware wallet, or the local key in [`LocalSignatureSource`].
//!
//! [`LocalSignatureSource`]: crate::wallet::LocalSignatureSource

use crate::typed_data::OnboardingPayload;
use crate::types::EvmSignature;
use crate::Result;
use async_trait::async_trait;

/// One-shot, possibly user-interactive signer of typed data
///
/// Implementations report a declined prompt as `Error::UserRejected` and any
/// other wallet failure as `Error::Provider`. Timeouts are the
/// implementation's concern.
#[async_trait]
pub trait SignatureSource: Send + Sync {
    async fn request_signature(&self, payload: &OnboardingPayload) -> Result<EvmSignature>;
}
