//! sbe — substrate editor for recipe configuration files
//!
//! Commands: serve, extract, update

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use sbe_core::{RecipeDocument, SubstrateRecord};
use sbe_http::ServerConfig;
use sbe_vault::{FileName, Vault};

#[derive(Parser)]
#[command(name = "sbe")]
#[command(version)]
#[command(about = "Edit the substrate record of recipe configuration files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the HTTP service and browser form
    Serve {
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Listen address, overrides the config file
        #[arg(long, env = "SBE_BIND")]
        bind: Option<SocketAddr>,
        /// Upload directory, overrides the config file
        #[arg(long, env = "SBE_UPLOAD_DIR")]
        upload_dir: Option<PathBuf>,
    },
    /// Print the substrate1 record of a file as JSON
    Extract {
        /// Recipe file to read
        file: PathBuf,
    },
    /// Replace the substrate1 record of a file in place
    Update {
        /// Recipe file to rewrite
        file: PathBuf,
        #[arg(long)]
        thickness: Option<String>,
        #[arg(long)]
        material: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            upload_dir,
        } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(upload_dir) = upload_dir {
                config.upload_dir = upload_dir;
            }
            sbe_http::serve(config).await?;
        }
        Commands::Extract { file } => {
            let (vault, name) = locate(&file)?;
            let text = vault
                .read_to_string(&name)
                .with_context(|| format!("reading {}", file.display()))?;
            let document = RecipeDocument::parse(&text)?;
            println!("{}", serde_json::to_string_pretty(document.substrate()?)?);
        }
        Commands::Update {
            file,
            thickness,
            material,
        } => {
            let (vault, name) = locate(&file)?;
            let text = vault
                .read_to_string(&name)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut document = RecipeDocument::parse(&text)?;
            document.set_substrate(&SubstrateRecord {
                thickness: thickness.map(Value::String),
                material: material.map(Value::String),
            })?;
            vault
                .write(&name, &document.to_pretty_string()?)
                .with_context(|| format!("writing {}", file.display()))?;
            tracing::info!(file = %file.display(), "substrate1 updated");
            println!("{}", serde_json::to_string_pretty(document.substrate()?)?);
        }
    }

    Ok(())
}

/// Split a local path into the directory it lives in and its file name.
fn locate(file: &Path) -> Result<(Vault, FileName)> {
    if !file.is_file() {
        anyhow::bail!("no such file: {}", file.display());
    }
    let raw = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file path: {}", file.display()))?;
    let name = FileName::parse(raw)?;
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((Vault::open(dir)?, name))
}
