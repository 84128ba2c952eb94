//! Hashmark binary: serve the verification API or drive ingest by hand.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use hashmark::staging::{object_key, FsStaging, StagingArea};
use hashmark::store::{Ledger, SqliteLedger};
use hashmark::{Disposition, Hashmark, HashmarkConfig};
use hashmark_server::{create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Hashmark - proof of prior existence for files
#[derive(Parser, Debug)]
#[command(name = "hashmark")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, env = "HASHMARK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve POST /verify and GET /health
    Serve {
        /// Override the configured listen address
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Copy a local file into the staging area
    Stage {
        path: PathBuf,
        /// Name to stage under (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Ingest one staged object by name
    Ingest { name: String },
    /// Ingest everything currently staged
    Sweep,
    /// Verify a local file or a SHA-256 hex string
    Verify {
        #[arg(long, conflicts_with = "hash", required_unless_present = "hash")]
        file: Option<PathBuf>,
        #[arg(long)]
        hash: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<HashmarkConfig> {
    match path {
        Some(path) => HashmarkConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let config = HashmarkConfig::default();
            config.validate().context("invalid default config")?;
            Ok(config)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let hashmark = Hashmark::open(config)
        .await
        .context("failed to open ledger or staging area")?;

    match cli.command {
        Command::Serve { bind } => serve(hashmark, bind).await,
        Command::Stage { path, name } => stage(&hashmark, path, name).await,
        Command::Ingest { name } => {
            let outcome = hashmark
                .ingest()
                .ingest_named(&name)
                .await
                .with_context(|| format!("failed to ingest {}", name))?;
            let verb = match outcome.disposition {
                Disposition::Committed => "committed",
                Disposition::DuplicateDiscarded => "duplicate of",
            };
            println!(
                "{} {} {} ({})",
                name,
                verb,
                outcome.record.key(),
                outcome.fingerprint.primary
            );
            if !outcome.staged_copy_removed {
                eprintln!("warning: staged copy of {} could not be removed", name);
            }
            Ok(())
        }
        Command::Sweep => {
            let report = hashmark.ingest().sweep().await.context("sweep failed")?;
            println!(
                "committed: {}, duplicates: {}, failed: {}, left staged: {}",
                report.committed, report.duplicates, report.failed, report.left_staged
            );
            if report.failed > 0 {
                bail!("{} staged objects failed to ingest", report.failed);
            }
            Ok(())
        }
        Command::Verify { file, hash } => {
            let verification = match (file, hash) {
                (Some(path), _) => {
                    let data = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    hashmark.verification().verify_bytes(&data).await?
                }
                (None, Some(hash)) => hashmark.verification().verify_hash_str(&hash).await?,
                (None, None) => bail!("either --file or --hash is required"),
            };
            println!("{}", serde_json::to_string_pretty(&verification.result)?);
            Ok(())
        }
    }
}

async fn serve(
    hashmark: Hashmark<SqliteLedger, FsStaging>,
    bind: Option<SocketAddr>,
) -> Result<()> {
    let addr = bind.unwrap_or(hashmark.config().bind_addr);
    let ledger: Arc<dyn Ledger> = hashmark.ledger().clone();
    let state = AppState::new(ledger, hashmark.config());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

async fn stage<L: Ledger + ?Sized, S: StagingArea + ?Sized>(
    hashmark: &Hashmark<L, S>,
    path: PathBuf,
    name: Option<String>,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .with_context(|| format!("cannot derive a name from {}", path.display()))?,
    };
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let length = data.len();

    hashmark
        .staging()
        .put(object_key(&name), Bytes::from(data))
        .await
        .with_context(|| format!("failed to stage {}", name))?;
    println!("staged {} ({} bytes)", name, length);
    Ok(())
}
