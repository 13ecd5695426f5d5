use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use loupe_core::config::{load_config, load_config_from_path};
use loupe_core::impls::LocalArtifactStore;
use loupe_core::{OwnerHint, ResolveError, ResolverBuilder, ResolverConfig};

#[derive(Debug, Parser)]
#[command(name = "loupe", version, about = "Find and decode stored artifacts by name")]
struct Cli {
    /// Config file (default: ./loupe.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a logical filename and print what was found.
    Resolve {
        name: String,

        /// Owner to search; omit or pass "*" to search every owner.
        #[arg(long)]
        owner: Option<String>,

        /// Artifact directory laid out as owner/session/name/version.
        #[arg(long, default_value = "artifacts")]
        root: PathBuf,

        /// `owner/session` used for the direct lookup when the scan misses.
        #[arg(long)]
        scope: Option<String>,

        /// Write the decoded bytes here.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the candidate names tried for a logical filename.
    Candidates { name: String },
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("loupe={log_level},loupe_core={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn resolver_config(path: Option<&PathBuf>) -> Result<ResolverConfig> {
    match path {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => load_config().context("loading config"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let config = resolver_config(cli.config.as_ref())?;

    match cli.command {
        Command::Candidates { name } => {
            // The store is never touched when only listing candidates.
            let store = Arc::new(LocalArtifactStore::new("."));
            let resolver = ResolverBuilder::new(store).config(&config).build()?;
            for candidate in resolver.candidates(&name) {
                println!("{candidate:?}");
            }
        }
        Command::Resolve {
            name,
            owner,
            root,
            scope,
            out,
        } => {
            let mut store = LocalArtifactStore::new(&root);
            if let Some(scope) = scope {
                store = store.with_current_scope(scope);
            }
            let resolver = ResolverBuilder::new(Arc::new(store)).config(&config).build()?;
            let owner_hint = OwnerHint::from_option(owner.as_deref());

            match resolver.resolve(&name, &owner_hint).await {
                Ok(artifact) => {
                    println!("{}", artifact.describe());
                    println!("stored at: {}", artifact.stored_key);
                    println!("encoding:  {:?}", artifact.payload_encoding);
                    if let Some(out) = out {
                        tokio::fs::write(&out, &artifact.decoded_bytes)
                            .await
                            .with_context(|| format!("writing {}", out.display()))?;
                        println!("wrote {} bytes to {}", artifact.size_bytes, out.display());
                    }
                }
                Err(err @ ResolveError::BackendUnavailable(_)) => {
                    return Err(err).with_context(|| format!("reading artifacts under {}", root.display()));
                }
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    std::process::exit(2);
                }
            }
        }
    }

    Ok(())
}
