// Filedrop - local upload store CLI
// Entry point and command dispatch

use anyhow::Context;
use clap::{Parser, Subcommand};
use filedrop::config::UploadConfig;
use filedrop::services::UploadService;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "filedrop", about = "Store files under a managed upload root")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a file and print its key and public URL
    Put {
        /// File to store
        file: PathBuf,
        /// Collection (one-level subdirectory) to store under
        #[arg(long)]
        collection: Option<String>,
        /// Emit the full receipt as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the keys of every stored file
    List {
        /// Emit keys as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filedrop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let service = UploadService::new(UploadConfig::from_env());
    service.initialize().await?;

    match cli.command {
        Command::Put {
            file,
            collection,
            json,
        } => {
            let payload = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            let receipt = service
                .upload(&payload, name, collection.as_deref())
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                println!("{}", receipt.relative_path);
                println!("{}", receipt.public_url);
            }
        }
        Command::List { json } => {
            let mut keys = service.list().await?;
            keys.sort();

            if json {
                println!("{}", serde_json::to_string_pretty(&keys)?);
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
    }

    Ok(())
}
