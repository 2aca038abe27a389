//! Mycel wallet CLI
//!
//! Derives, caches and restores the Mycel account of an EVM key.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use mycel_wallet::config::PRIVATE_KEY_ENV;
use mycel_wallet::{
    derive_from_hex, Config, CredentialCache, DerivationStore, DomainName, EncryptionKey, Error,
    EvmAddress, EvmSignature, FileStore, LocalSignatureSource, MemoryStore, OnboardingPayload,
    Result, SessionReconciler, SignatureSource,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mycel-wallet")]
#[command(about = "Mycel account derived from an EVM wallet signature")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the Mycel account from an onboarding signature
    Derive {
        /// 65-byte signature, hex encoded (with or without 0x prefix)
        #[arg(short, long)]
        signature: String,
    },

    /// Print the onboarding typed data for an external wallet to sign
    Payload,

    /// Sign the onboarding payload with PRIVATE_KEY and cache the derivation
    Create,

    /// Restore the cached derivation of an EVM address
    Restore {
        /// EVM address
        #[arg(short, long)]
        address: String,
    },

    /// Sign a .cel domain name registration with a cached account
    SignDomain {
        /// EVM address whose cached account signs
        #[arg(short, long)]
        address: String,

        /// Second-level name, with or without .cel
        #[arg(short, long)]
        name: String,

        /// Lowercase the name before signing
        #[arg(long)]
        lowercase: bool,
    },

    /// Forget the cached signature of an EVM address
    Forget {
        /// EVM address
        #[arg(short, long)]
        address: String,
    },

    /// List cached derivations
    List,

    /// Show current configuration
    Config,
}

/// Signature source for commands that must never prompt
struct NoPrompt;

#[async_trait]
impl SignatureSource for NoPrompt {
    async fn request_signature(&self, _payload: &OnboardingPayload) -> Result<EvmSignature> {
        Err(Error::Provider(
            "interactive signing is not available for this command".to_string(),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Derive { signature } => run_derive(&config, &signature)?,
        Commands::Payload => {
            let payload = OnboardingPayload::new(&config.onboarding);
            println!("{}", serde_json::to_string_pretty(&payload.to_json()?)?);
        }
        Commands::Create => run_create(&config).await?,
        Commands::Restore { address } => run_restore(&config, &address).await?,
        Commands::SignDomain {
            address,
            name,
            lowercase,
        } => run_sign_domain(&config, &address, &name, lowercase).await?,
        Commands::Forget { address } => {
            let cache = open_cache(&config).await?;
            cache.forget(&EvmAddress::parse(&address)?).await?;
            println!("Forgot cached signature for {}", address);
        }
        Commands::List => run_list(&config).await?,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn open_cache(config: &Config) -> Result<Arc<CredentialCache>> {
    let key = EncryptionKey::from_env()?;

    let store: Arc<dyn DerivationStore> = match &config.store_path {
        Some(path) => {
            let store = FileStore::open(path).await?;
            tracing::debug!(path = %store.path().display(), "Using file derivation store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("No store_path configured - derivations are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(Arc::new(CredentialCache::new(store, Some(key))))
}

fn run_derive(config: &Config, signature: &str) -> Result<()> {
    let (private, wallet) = derive_from_hex(signature, &config.chain)?;

    let output = json!({
        "secondary_address": wallet.address(),
        "public_key": alloy::hex::encode(private.public_key()),
        "accounts": wallet.accounts(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_create(config: &Config) -> Result<()> {
    let source = Arc::new(LocalSignatureSource::from_env(PRIVATE_KEY_ENV)?);
    let address = source.evm_address();
    tracing::info!(evm_address = %address, "Loaded EVM key from PRIVATE_KEY");

    let cache = open_cache(config).await?;
    let reconciler = SessionReconciler::new(config, cache, source);

    let status = reconciler.on_evm_address_changed(Some(address)).await;
    if !status.phase.is_active() {
        reconciler.create_identity().await?;
    }

    println!("{}", serde_json::to_string_pretty(&reconciler.status().await)?);
    Ok(())
}

async fn restore(config: &Config, address: &str) -> Result<SessionReconciler> {
    let cache = open_cache(config).await?;
    let reconciler = SessionReconciler::new(config, cache, Arc::new(NoPrompt));
    reconciler
        .on_evm_address_changed(Some(EvmAddress::parse(address)?))
        .await;
    Ok(reconciler)
}

async fn run_restore(config: &Config, address: &str) -> Result<()> {
    let reconciler = restore(config, address).await?;
    println!("{}", serde_json::to_string_pretty(&reconciler.status().await)?);
    Ok(())
}

async fn run_sign_domain(config: &Config, address: &str, name: &str, lowercase: bool) -> Result<()> {
    let name = DomainName::parse(name, lowercase)?;
    let reconciler = restore(config, address).await?;

    let response = reconciler.sign_domain_name(&name).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn run_list(config: &Config) -> Result<()> {
    let cache = open_cache(config).await?;

    for record in cache.list().await? {
        let secondary = record
            .secondary_address
            .as_ref()
            .map(|a| a.as_str())
            .unwrap_or("-");
        let state = if record.is_forgotten() {
            "forgotten"
        } else {
            "cached"
        };
        println!(
            "{}  {}  {}  {}",
            record.evm_address,
            secondary,
            state,
            record.updated_at.to_rfc3339()
        );
    }
    Ok(())
}
