//! Recall share CLI - drive both sides of the share sync protocol
//!
//! Plays the extension role (`save`) and the host role (`drain`, `auth`)
//! against a file-backed shared store, for development and operations.

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use recall_share_core::{
    drain_pending, CredentialRelay, DrainReport, ItemsClient, JsonFileStore, PendingQueue,
    ShareBridge, ShareSubmitter, SyncAuthConfig,
};
use thiserror::Error;


const STORE_PATH_ENV: &str = "RECALL_SHARE_STORE_PATH";

/// Default log filter. The protocol decision points live in the core
/// library, so that is the target to enable by default.
const DEFAULT_LOG_DIRECTIVE: &str = "recall_share_core=info";

#[derive(Parser)]
#[command(name = "recall-share")]
#[command(about = "Save and sync shared URLs through the Recall pending queue")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Optional path to the shared store file
    #[arg(long, value_name = "PATH", global = true)]
    store_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a URL the way the share extension does: direct submit with
    /// queue fallback
    Save {
        /// URL to save
        url: String,
    },
    /// Drain the pending queue through the configured API (host role)
    Drain,
    /// Show queued URLs without draining them
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the relayed auth snapshot
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Publish an access token and API base URL for the extension
    Set {
        /// Bearer token the backend expects
        #[arg(long)]
        access_token: String,
        /// API base URL, e.g. https://api.recall.app
        #[arg(long)]
        api_base_url: String,
    },
    /// Revoke the published snapshot (sign-out)
    Clear,
    /// Show whether a usable credential pair is published
    Status,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] recall_share_core::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(
        "Auth is not configured. Run `recall-share auth set` with an access token and API base URL."
    )]
    AuthNotConfigured,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(DEFAULT_LOG_DIRECTIVE.parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let store_path = resolve_store_path(cli.store_path);
    let store = JsonFileStore::open(store_path)?;

    match cli.command {
        Commands::Save { url } => run_save(&store, &url).await?,
        Commands::Drain => run_drain(&store).await?,
        Commands::Pending { json } => run_pending(&store, json)?,
        Commands::Auth { command } => match command {
            AuthCommands::Set {
                access_token,
                api_base_url,
            } => run_auth_set(&store, access_token, api_base_url)?,
            AuthCommands::Clear => run_auth_clear(&store)?,
            AuthCommands::Status => run_auth_status(&store)?,
        },
    }

    Ok(())
}

async fn run_save(store: &JsonFileStore, url: &str) -> Result<(), CliError> {
    let outcome = ShareSubmitter::new(store).submit(url).await?;
    println!("{}", outcome.user_message());
    Ok(())
}

async fn run_drain(store: &JsonFileStore) -> Result<(), CliError> {
    let Some(credentials) = CredentialRelay::new(store).read()? else {
        return Err(CliError::AuthNotConfigured);
    };

    tracing::info!(store = %store.path().display(), "draining pending queue");
    let client = ItemsClient::new(credentials.api_base_url.as_str())?;
    let report = drain_pending(store, &client, &credentials.access_token).await?;
    println!("{}", format_drain_summary(&report));
    Ok(())
}

fn run_pending(store: &JsonFileStore, as_json: bool) -> Result<(), CliError> {
    let urls = PendingQueue::new(store).pending()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&urls)?);
    } else if urls.is_empty() {
        println!("No pending URLs");
    } else {
        for url in urls {
            println!("{url}");
        }
    }

    Ok(())
}

fn run_auth_set(
    store: &JsonFileStore,
    access_token: String,
    api_base_url: String,
) -> Result<(), CliError> {
    let bridge = ShareBridge::new(store);
    bridge.sync_auth_config(&SyncAuthConfig {
        access_token: Some(access_token),
        api_base_url: Some(api_base_url),
    })?;
    run_auth_status(store)
}

fn run_auth_clear(store: &JsonFileStore) -> Result<(), CliError> {
    ShareBridge::new(store).sync_auth_config(&SyncAuthConfig {
        access_token: None,
        api_base_url: None,
    })?;
    println!("Auth cleared");
    Ok(())
}

fn run_auth_status(store: &JsonFileStore) -> Result<(), CliError> {
    match CredentialRelay::new(store).read()? {
        Some(credentials) => println!("Auth configured for {}", credentials.api_base_url),
        None => println!("Auth not configured"),
    }
    Ok(())
}

fn format_drain_summary(report: &DrainReport) -> String {
    match (report.submitted.len(), report.requeued.len()) {
        (0, 0) => "Nothing to sync".to_string(),
        (submitted, 0) => format!("Synced {submitted} pending URL(s)"),
        (submitted, requeued) => {
            format!("Synced {submitted} pending URL(s), re-queued {requeued} after failures")
        }
    }
}

fn resolve_store_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    if let Ok(path) = env::var(STORE_PATH_ENV) {
        let path = path.trim();
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::data_local_dir().map_or_else(
        || PathBuf::from("share-store.json"),
        |base| base.join("recall").join("share-store.json"),
    )
}
