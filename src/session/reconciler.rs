//! Session reconciler
//!
//! Owns the single active derived wallet and keeps it paired with the
//! connected EVM address. Address changes and user actions are serialized
//! behind one async mutex; the signature prompt is awaited outside it, and
//! its result is installed only if no newer request or address change
//! happened in the meantime.

use super::state::{Phase, SessionStatus};
use crate::cache::CredentialCache;
use crate::config::{ChainConfig, Config};
use crate::derive::{derive, PrivateInformation};
use crate::registration::DomainName;
use crate::typed_data::OnboardingPayload;
use crate::types::{EvmAddress, EvmSignature};
use crate::wallet::{
    AminoSignResponse, DerivedWallet, DirectSignResponse, SignDoc, SignatureSource, StdSignDoc,
};
use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Installed wallet and the secrets it was built from
struct ActiveSession {
    evm_address: EvmAddress,
    wallet: Arc<DerivedWallet>,
    private: PrivateInformation,
}

struct Inner {
    phase: Phase,
    connected: Option<EvmAddress>,
    active: Option<ActiveSession>,
    /// Id of the most recently issued signature request
    latest_request: u64,
    /// Bumped on every change of the connected address
    epoch: u64,
}

impl Inner {
    /// Drop the installed wallet; its secrets are zeroized on drop
    fn release(&mut self) {
        if let Some(session) = self.active.take() {
            tracing::debug!(evm_address = %session.evm_address, "Released derived wallet");
        }
    }

    /// The installed session, only while it matches the connected address
    fn paired(&self) -> Option<&ActiveSession> {
        let session = self.active.as_ref()?;
        (self.connected.as_ref() == Some(&session.evm_address)).then_some(session)
    }

    fn install(
        &mut self,
        evm_address: &EvmAddress,
        private: PrivateInformation,
        wallet: DerivedWallet,
    ) -> Result<()> {
        if self.connected.as_ref() != Some(evm_address) {
            return Err(Error::Superseded(evm_address.to_string()));
        }

        self.release();
        tracing::info!(
            evm_address = %evm_address,
            secondary_address = %wallet.address(),
            "Installed derived wallet"
        );
        self.active = Some(ActiveSession {
            evm_address: evm_address.clone(),
            wallet: Arc::new(wallet),
            private,
        });
        self.phase = Phase::Active {
            address: evm_address.clone(),
        };
        Ok(())
    }

    fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase.clone(),
            connected: self.connected.clone(),
            secondary_address: self.paired().map(|s| s.wallet.address().clone()),
        }
    }
}

pub struct SessionReconciler {
    chain: ChainConfig,
    payload: OnboardingPayload,
    cache: Arc<CredentialCache>,
    source: Arc<dyn SignatureSource>,
    inner: Mutex<Inner>,
}

impl SessionReconciler {
    pub fn new(
        config: &Config,
        cache: Arc<CredentialCache>,
        source: Arc<dyn SignatureSource>,
    ) -> Self {
        if !cache.has_key() {
            tracing::error!("Credential cache has no encryption key; derivations cannot be stored or restored");
        }

        Self {
            chain: config.chain.clone(),
            payload: OnboardingPayload::new(&config.onboarding),
            cache,
            source,
            inner: Mutex::new(Inner {
                phase: Phase::Disconnected,
                connected: None,
                active: None,
                latest_request: 0,
                epoch: 0,
            }),
        }
    }

    /// React to the provider reporting a new connected address (or none)
    ///
    /// A provider-side disconnect keeps the cache so the account is restored
    /// on reconnect. Use [`disconnect`](Self::disconnect) to log out.
    pub async fn on_evm_address_changed(&self, address: Option<EvmAddress>) -> SessionStatus {
        let mut inner = self.inner.lock().await;
        if inner.connected != address {
            inner.epoch += 1;
            inner.connected = address.clone();
        }

        let next = inner.phase.on_address_changed(address.as_ref());
        tracing::debug!(from = %inner.phase, to = %next, "EVM address changed");
        inner.phase = next;

        match inner.phase.clone() {
            Phase::Disconnected => inner.release(),
            Phase::Active { .. } => {}
            Phase::Mismatched { active, pending } => {
                inner.release();
                tracing::info!(
                    previous = %active,
                    evm_address = %pending,
                    "Connected account switched"
                );
                inner.phase = Phase::PendingDerivation {
                    evm_address: pending.clone(),
                };
                self.restore(&mut inner, &pending).await;
            }
            Phase::PendingDerivation { evm_address } => {
                self.restore(&mut inner, &evm_address).await
            }
        }

        inner.status()
    }

    /// Try to reinstall the wallet for `address` from the cache
    async fn restore(&self, inner: &mut Inner, address: &EvmAddress) {
        let signature = match self.cache.recover(address).await {
            Ok(signature) => signature,
            Err(Error::NoRecord(_)) => {
                tracing::debug!(evm_address = %address, "No cached derivation, waiting for create");
                return;
            }
            Err(Error::NoKey(reason)) => {
                tracing::error!(evm_address = %address, %reason, "Cannot restore derivation without encryption key");
                return;
            }
            Err(e @ Error::Decrypt(_)) => {
                tracing::warn!(evm_address = %address, error = %e, "Cached derivation unreadable, forgetting");
                self.forget_quietly(address).await;
                return;
            }
            Err(e) => {
                tracing::warn!(evm_address = %address, error = %e, "Cache lookup failed");
                return;
            }
        };

        match derive(&signature, &self.chain) {
            Ok((private, wallet)) => {
                if let Err(e) = inner.install(address, private, wallet) {
                    tracing::warn!(evm_address = %address, error = %e, "Restored wallet not installed");
                }
            }
            Err(e) => {
                tracing::warn!(evm_address = %address, error = %e, "Cached signature does not derive, forgetting");
                self.forget_quietly(address).await;
            }
        }
    }

    async fn forget_quietly(&self, address: &EvmAddress) {
        if let Err(e) = self.cache.forget(address).await {
            tracing::warn!(evm_address = %address, error = %e, "Failed to forget cached derivation");
        }
    }

    /// Prompt for the onboarding signature, derive, cache, and install
    ///
    /// Fails with `Superseded` if the connected address changed or a newer
    /// request was issued while the prompt was open.
    pub async fn create_identity(&self) -> Result<EvmSignature> {
        let (address, request_id, epoch) = {
            let mut inner = self.inner.lock().await;
            let address = inner.connected.clone().ok_or(Error::NotConnected)?;
            inner.latest_request += 1;
            (address, inner.latest_request, inner.epoch)
        };

        tracing::info!(evm_address = %address, request_id, "Requesting onboarding signature");
        let signature = self.source.request_signature(&self.payload).await?;
        let (private, wallet) = derive(&signature, &self.chain)?;

        let mut inner = self.inner.lock().await;
        if inner.latest_request != request_id || inner.epoch != epoch {
            tracing::warn!(
                evm_address = %address,
                request_id,
                latest_request = inner.latest_request,
                "Discarding stale derivation result"
            );
            return Err(Error::Superseded(address.to_string()));
        }

        self.cache
            .store(&address, wallet.address(), &signature)
            .await?;
        inner.install(&address, private, wallet)?;
        Ok(signature)
    }

    /// Wallet for the connected address, if one is installed
    pub async fn get_active_wallet(&self) -> Option<Arc<DerivedWallet>> {
        let inner = self.inner.lock().await;
        inner.paired().map(|session| session.wallet.clone())
    }

    /// Sign with the active wallet's amino signer
    pub async fn sign_message(&self, sign_doc: StdSignDoc) -> Result<AminoSignResponse> {
        let wallet = self.get_active_wallet().await.ok_or(Error::NoActiveWallet)?;
        wallet
            .amino_signer()
            .sign_amino(wallet.address().as_str(), sign_doc)
    }

    pub async fn sign_direct(&self, sign_doc: SignDoc) -> Result<DirectSignResponse> {
        let wallet = self.get_active_wallet().await.ok_or(Error::NoActiveWallet)?;
        wallet
            .direct_signer()
            .sign_direct(wallet.address().as_str(), sign_doc)
    }

    /// Sign the ADR-036 registration request for `name`
    pub async fn sign_domain_name(&self, name: &DomainName) -> Result<AminoSignResponse> {
        let wallet = self.get_active_wallet().await.ok_or(Error::NoActiveWallet)?;
        let sign_doc = name.sign_doc(wallet.address());
        tracing::debug!(domain = %name, secondary_address = %wallet.address(), "Signing domain name");
        wallet
            .amino_signer()
            .sign_amino(wallet.address().as_str(), sign_doc)
    }

    /// Explicit logout: release the wallet and forget the cached signature
    pub async fn disconnect(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let address = inner
            .connected
            .clone()
            .or_else(|| inner.phase.active_address().cloned());

        inner.release();
        inner.connected = None;
        inner.epoch += 1;
        inner.phase = Phase::Disconnected;

        if let Some(address) = address {
            self.cache.forget(&address).await?;
            tracing::info!(evm_address = %address, "Disconnected and forgot cached derivation");
        }
        Ok(())
    }

    pub async fn status(&self) -> SessionStatus {
        self.inner.lock().await.status()
    }

    pub async fn connected_address(&self) -> Option<EvmAddress> {
        self.inner.lock().await.connected.clone()
    }

    /// Scoped access to the secret material of `address`
    ///
    /// Only granted while `address` is both connected and active.
    pub async fn with_private_information<R>(
        &self,
        address: &EvmAddress,
        f: impl FnOnce(&PrivateInformation) -> R,
    ) -> Result<R> {
        let inner = self.inner.lock().await;
        let session = inner
            .paired()
            .filter(|session| &session.evm_address == address)
            .ok_or(Error::NoActiveWallet)?;
        Ok(f(&session.private))
    }
}

impl std::fmt::Debug for SessionReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionReconciler")
            .field("chain", &self.chain)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DerivationStore, EncryptedDerivation, MemoryStore};
    use crate::config::EncryptionKey;
    use crate::wallet::LocalSignatureSource;
    use async_trait::async_trait;
    use secrecy::ExposeSecret;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{mpsc, Semaphore};

    // Well-known development keys (DO NOT use in production!)
    const ALICE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const BOB_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    /// Local signer that counts prompts
    struct CountingSource {
        inner: LocalSignatureSource,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new(key: &str) -> Self {
            Self {
                inner: LocalSignatureSource::from_hex(key).unwrap(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SignatureSource for CountingSource {
        async fn request_signature(&self, payload: &OnboardingPayload) -> Result<EvmSignature> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.request_signature(payload).await
        }
    }

    struct RejectingSource;

    #[async_trait]
    impl SignatureSource for RejectingSource {
        async fn request_signature(&self, _payload: &OnboardingPayload) -> Result<EvmSignature> {
            Err(Error::UserRejected("user closed the prompt".to_string()))
        }
    }

    /// Source that reports each prompt and resolves only when released
    struct GatedSource {
        signature: EvmSignature,
        called: mpsc::UnboundedSender<()>,
        release: Semaphore,
    }

    #[async_trait]
    impl SignatureSource for GatedSource {
        async fn request_signature(&self, _payload: &OnboardingPayload) -> Result<EvmSignature> {
            let _ = self.called.send(());
            self.release
                .acquire()
                .await
                .map_err(|e| Error::Provider(e.to_string()))?
                .forget();
            Ok(self.signature.clone())
        }
    }

    fn gated() -> (Arc<GatedSource>, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut bytes = [0x42u8; 65];
        bytes[64] = 27;
        let source = GatedSource {
            signature: EvmSignature::from_bytes(&bytes).unwrap(),
            called: tx,
            release: Semaphore::new(0),
        };
        (Arc::new(source), rx)
    }

    fn empty_sign_doc() -> SignDoc {
        SignDoc {
            body_bytes: vec![],
            auth_info_bytes: vec![],
            chain_id: "mycel-1".to_string(),
            account_number: 0,
        }
    }

    fn address_of(key: &str) -> EvmAddress {
        LocalSignatureSource::from_hex(key).unwrap().evm_address()
    }

    fn key() -> Option<EncryptionKey> {
        Some(EncryptionKey::new("test-encryption-key").unwrap())
    }

    fn setup(
        store: Arc<dyn DerivationStore>,
        source: Arc<dyn SignatureSource>,
    ) -> (SessionReconciler, Arc<CredentialCache>) {
        let cache = Arc::new(CredentialCache::new(store, key()));
        let reconciler = SessionReconciler::new(&Config::default(), cache.clone(), source);
        (reconciler, cache)
    }

    #[tokio::test]
    async fn create_identity_installs_wallet() {
        let source = Arc::new(CountingSource::new(ALICE_KEY));
        let (reconciler, cache) = setup(Arc::new(MemoryStore::new()), source.clone());
        let alice = address_of(ALICE_KEY);

        let status = reconciler.on_evm_address_changed(Some(alice.clone())).await;
        assert_eq!(status.phase, Phase::PendingDerivation { evm_address: alice.clone() });
        assert!(reconciler.get_active_wallet().await.is_none());

        let signature = reconciler.create_identity().await.unwrap();
        let wallet = reconciler.get_active_wallet().await.unwrap();
        let (_, expected) = derive(&signature, &ChainConfig::default()).unwrap();

        assert_eq!(wallet.address(), expected.address());
        assert!(wallet.address().as_str().starts_with("mycel1"));
        assert_eq!(reconciler.status().await.phase, Phase::Active { address: alice.clone() });
        assert_eq!(cache.recover(&alice).await.unwrap(), signature);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn reconnect_restores_without_prompt() {
        let source = Arc::new(CountingSource::new(ALICE_KEY));
        let (reconciler, _) = setup(Arc::new(MemoryStore::new()), source.clone());
        let alice = address_of(ALICE_KEY);

        reconciler.on_evm_address_changed(Some(alice.clone())).await;
        reconciler.create_identity().await.unwrap();
        let first = reconciler.get_active_wallet().await.unwrap().address().clone();

        let status = reconciler.on_evm_address_changed(None).await;
        assert_eq!(status.phase, Phase::Disconnected);
        assert!(reconciler.get_active_wallet().await.is_none());

        let status = reconciler.on_evm_address_changed(Some(alice.clone())).await;
        assert_eq!(status.phase, Phase::Active { address: alice });
        assert_eq!(status.secondary_address, Some(first.clone()));
        assert_eq!(reconciler.get_active_wallet().await.unwrap().address(), &first);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn switch_to_uncached_account_drops_wallet() {
        let (reconciler, cache) = setup(
            Arc::new(MemoryStore::new()),
            Arc::new(CountingSource::new(ALICE_KEY)),
        );
        let alice = address_of(ALICE_KEY);
        let bob = address_of(BOB_KEY);

        reconciler.on_evm_address_changed(Some(alice.clone())).await;
        reconciler.create_identity().await.unwrap();

        let status = reconciler.on_evm_address_changed(Some(bob.clone())).await;
        assert_eq!(status.phase, Phase::PendingDerivation { evm_address: bob.clone() });
        assert!(status.secondary_address.is_none());
        assert!(reconciler.get_active_wallet().await.is_none());
        assert!(matches!(
            reconciler.with_private_information(&alice, |_| ()).await,
            Err(Error::NoActiveWallet)
        ));

        // Switching accounts keeps the previous account recoverable
        assert!(cache.recover(&alice).await.is_ok());
    }

    #[tokio::test]
    async fn switch_between_cached_accounts_restores_each() {
        let store: Arc<dyn DerivationStore> = Arc::new(MemoryStore::new());
        let alice = address_of(ALICE_KEY);
        let bob = address_of(BOB_KEY);

        for (key, address) in [(ALICE_KEY, &alice), (BOB_KEY, &bob)] {
            let (reconciler, _) = setup(store.clone(), Arc::new(CountingSource::new(key)));
            reconciler.on_evm_address_changed(Some(address.clone())).await;
            reconciler.create_identity().await.unwrap();
        }

        let source = Arc::new(CountingSource::new(ALICE_KEY));
        let (reconciler, _) = setup(store, source.clone());

        reconciler.on_evm_address_changed(Some(alice.clone())).await;
        let alice_wallet = reconciler.get_active_wallet().await.unwrap();
        let status = reconciler.on_evm_address_changed(Some(bob.clone())).await;
        assert_eq!(status.phase, Phase::Active { address: bob });
        let bob_wallet = reconciler.get_active_wallet().await.unwrap();

        assert_ne!(alice_wallet.address(), bob_wallet.address());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn corrupt_cache_forgets_and_stays_pending() {
        let store: Arc<dyn DerivationStore> = Arc::new(MemoryStore::new());
        let alice = address_of(ALICE_KEY);
        store
            .put(EncryptedDerivation {
                evm_address: alice.clone(),
                secondary_address: None,
                encrypted_signature: Some("Y29ycnVwdGVkIGNpcGhlcnRleHQgYnl0ZXM=".to_string()),
                updated_at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        let (reconciler, cache) = setup(store, Arc::new(CountingSource::new(ALICE_KEY)));
        let status = reconciler.on_evm_address_changed(Some(alice.clone())).await;

        assert_eq!(status.phase, Phase::PendingDerivation { evm_address: alice.clone() });
        assert!(cache.record(&alice).await.unwrap().unwrap().is_forgotten());

        // A fresh create recovers the account
        reconciler.create_identity().await.unwrap();
        assert!(reconciler.status().await.phase.is_active());
    }

    #[tokio::test]
    async fn restore_without_key_keeps_record() {
        let store: Arc<dyn DerivationStore> = Arc::new(MemoryStore::new());
        let alice = address_of(ALICE_KEY);
        {
            let (reconciler, _) = setup(store.clone(), Arc::new(CountingSource::new(ALICE_KEY)));
            reconciler.on_evm_address_changed(Some(alice.clone())).await;
            reconciler.create_identity().await.unwrap();
        }

        let keyless = Arc::new(CredentialCache::new(store.clone(), None));
        let source = Arc::new(CountingSource::new(ALICE_KEY));
        let reconciler = SessionReconciler::new(&Config::default(), keyless.clone(), source.clone());
        let status = reconciler.on_evm_address_changed(Some(alice.clone())).await;

        assert_eq!(status.phase, Phase::PendingDerivation { evm_address: alice.clone() });
        assert!(reconciler.get_active_wallet().await.is_none());
        let record = keyless.record(&alice).await.unwrap().unwrap();
        assert!(!record.is_forgotten());
        assert_eq!(source.calls(), 0);

        // The record is still usable once the key is back
        let (keyed, _) = setup(store, source);
        let status = keyed.on_evm_address_changed(Some(alice.clone())).await;
        assert_eq!(status.phase, Phase::Active { address: alice });
    }

    #[tokio::test]
    async fn explicit_disconnect_forgets_cache() {
        let source = Arc::new(CountingSource::new(ALICE_KEY));
        let (reconciler, cache) = setup(Arc::new(MemoryStore::new()), source.clone());
        let alice = address_of(ALICE_KEY);

        reconciler.on_evm_address_changed(Some(alice.clone())).await;
        reconciler.create_identity().await.unwrap();
        reconciler.disconnect().await.unwrap();

        assert_eq!(reconciler.status().await.phase, Phase::Disconnected);
        assert!(reconciler.connected_address().await.is_none());
        assert!(matches!(
            cache.recover(&alice).await.unwrap_err(),
            Error::NoRecord(_)
        ));

        let status = reconciler.on_evm_address_changed(Some(alice)).await;
        assert!(!status.phase.is_active());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn stale_signature_is_discarded() {
        let (source, mut called) = gated();
        let (reconciler, cache) = setup(Arc::new(MemoryStore::new()), source.clone());
        let reconciler = Arc::new(reconciler);
        let alice = address_of(ALICE_KEY);
        let bob = address_of(BOB_KEY);

        reconciler.on_evm_address_changed(Some(alice.clone())).await;
        let task = tokio::spawn({
            let reconciler = reconciler.clone();
            async move { reconciler.create_identity().await }
        });
        called.recv().await.unwrap();

        reconciler.on_evm_address_changed(Some(bob.clone())).await;
        source.release.add_permits(1);

        let result = task.await.unwrap();
        assert!(matches!(result, Err(Error::Superseded(_))));
        assert!(reconciler.get_active_wallet().await.is_none());
        assert_eq!(
            reconciler.status().await.phase,
            Phase::PendingDerivation { evm_address: bob }
        );
        assert!(cache.record(&alice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn only_latest_request_is_installed() {
        let (source, mut called) = gated();
        let (reconciler, _) = setup(Arc::new(MemoryStore::new()), source.clone());
        let reconciler = Arc::new(reconciler);
        reconciler
            .on_evm_address_changed(Some(address_of(ALICE_KEY)))
            .await;

        let first = tokio::spawn({
            let reconciler = reconciler.clone();
            async move { reconciler.create_identity().await }
        });
        called.recv().await.unwrap();
        let second = tokio::spawn({
            let reconciler = reconciler.clone();
            async move { reconciler.create_identity().await }
        });
        called.recv().await.unwrap();
        source.release.add_permits(2);

        assert!(matches!(first.await.unwrap(), Err(Error::Superseded(_))));
        assert!(second.await.unwrap().is_ok());
        assert!(reconciler.get_active_wallet().await.is_some());
    }

    #[tokio::test]
    async fn create_requires_connection() {
        let (reconciler, _) = setup(Arc::new(MemoryStore::new()), Arc::new(RejectingSource));
        assert!(matches!(
            reconciler.create_identity().await.unwrap_err(),
            Error::NotConnected
        ));
    }

    #[tokio::test]
    async fn user_rejection_propagates() {
        let (reconciler, _) = setup(Arc::new(MemoryStore::new()), Arc::new(RejectingSource));
        reconciler
            .on_evm_address_changed(Some(address_of(ALICE_KEY)))
            .await;

        let err = reconciler.create_identity().await.unwrap_err();
        assert!(matches!(err, Error::UserRejected(_)));
        assert!(!reconciler.status().await.phase.is_active());
    }

    #[tokio::test]
    async fn missing_key_blocks_install() {
        let cache = Arc::new(CredentialCache::in_memory(None));
        let source = Arc::new(CountingSource::new(ALICE_KEY));
        let reconciler = SessionReconciler::new(&Config::default(), cache, source);
        reconciler
            .on_evm_address_changed(Some(address_of(ALICE_KEY)))
            .await;

        let err = reconciler.create_identity().await.unwrap_err();
        assert!(matches!(err, Error::NoKey(_)));
        assert!(reconciler.get_active_wallet().await.is_none());
    }

    #[tokio::test]
    async fn signing_requires_active_wallet() {
        let (reconciler, _) = setup(
            Arc::new(MemoryStore::new()),
            Arc::new(CountingSource::new(ALICE_KEY)),
        );
        let name = DomainName::parse("alice", false).unwrap();

        assert!(matches!(
            reconciler.sign_domain_name(&name).await.unwrap_err(),
            Error::NoActiveWallet
        ));
        assert!(matches!(
            reconciler.sign_direct(empty_sign_doc()).await.unwrap_err(),
            Error::NoActiveWallet
        ));

        reconciler
            .on_evm_address_changed(Some(address_of(ALICE_KEY)))
            .await;
        reconciler.create_identity().await.unwrap();

        let response = reconciler.sign_domain_name(&name).await.unwrap();
        let wallet = reconciler.get_active_wallet().await.unwrap();
        assert_eq!(response.signed.msgs[0].value["signer"], wallet.address().as_str());

        let response = reconciler.sign_message(name.sign_doc(wallet.address())).await.unwrap();
        assert!(!response.signature.signature.is_empty());

        let response = reconciler.sign_direct(empty_sign_doc()).await.unwrap();
        assert_eq!(response.signed.chain_id, "mycel-1");
    }

    #[tokio::test]
    async fn private_information_matches_wallet() {
        let (reconciler, _) = setup(
            Arc::new(MemoryStore::new()),
            Arc::new(CountingSource::new(ALICE_KEY)),
        );
        let alice = address_of(ALICE_KEY);
        reconciler.on_evm_address_changed(Some(alice.clone())).await;
        let signature = reconciler.create_identity().await.unwrap();

        let (expected, _) = derive(&signature, &ChainConfig::default()).unwrap();
        let words = reconciler
            .with_private_information(&alice, |private| {
                assert_eq!(private.public_key(), expected.public_key());
                private.mnemonic().expose_secret().split_whitespace().count()
            })
            .await
            .unwrap();
        assert_eq!(words, 24);
    }
}
