//! ClinicDesk CLI
//!
//! Thin wrapper around clinicdesk-media for checking attachments from a
//! terminal with the same credentials the desktop inbox uses.
//!
//! ## Usage
//!
//! ```bash
//! # Download an attachment
//! clinicdesk fetch /media/42 -o wound.png
//!
//! # Check that a payload really is what the message claims
//! clinicdesk fetch /media/42 --kind image
//!
//! # Content type and inferred kind only
//! clinicdesk probe /media/42
//!
//! # Effective configuration, token redacted
//! clinicdesk config
//!
//! # Persist flags/environment into the config file
//! clinicdesk --base-url https://api.clinic.example --tenant st-marys config --save
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clinicdesk_media::{
    logging, AuthenticatedClient, Blob, ClientConfig, FetchClient, FetchResponse, MediaKind,
};
use tracing::info;

/// ClinicDesk - authenticated attachment access
#[derive(Parser)]
#[command(name = "clinicdesk")]
#[command(version)]
#[command(about = "ClinicDesk - fetch protected WhatsApp inbox attachments")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: <config_dir>/clinicdesk/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend origin relative references are resolved against
    #[arg(long, env = "CLINICDESK_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Session bearer token
    #[arg(long, env = "CLINICDESK_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Tenant (hospital/clinic) id
    #[arg(long, env = "CLINICDESK_TENANT", global = true)]
    tenant: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a protected resource
    Fetch {
        /// Path or URL of the resource
        reference: String,

        /// Write the payload here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Check the payload decodes as this kind (image, video, audio, document)
        #[arg(short, long)]
        kind: Option<MediaKind>,
    },

    /// Show the content type and inferred kind of a resource
    Probe {
        /// Path or URL of the resource
        reference: String,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(ClientConfig::default_path)
}

/// File, then flags and environment on top.
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let path = config_path(cli);
    let mut config = ClientConfig::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?
        .with_overrides(cli.base_url.clone(), cli.token.clone(), cli.tenant.clone());

    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_summary(reference: &str, response: &FetchResponse) {
    let kind = MediaKind::from_content_type(&response.content_type);
    println!("Resource: {}", reference);
    println!("  Content-Type: {}", response.content_type);
    println!("  Size: {} bytes", response.bytes.len());
    println!("  Kind: {}", kind);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(
        logging::verbosity_filter(cli.verbose),
        &format!("cli-{}", std::process::id()),
    );

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Fetch {
            ref reference,
            ref output,
            kind,
        } => {
            let client = AuthenticatedClient::new(config)?;
            let url = client.resolve(reference)?;
            info!(%url, "Fetching resource");

            let response = client
                .fetch(reference)
                .await
                .with_context(|| format!("Failed to fetch {}", url))?;
            print_summary(reference, &response);

            if let Some(kind) = kind {
                Blob::decode(response.bytes.clone(), response.content_type.clone(), kind)
                    .with_context(|| format!("Payload is not a valid {}", kind))?;
                println!("  Decodes as: {}", kind);
            }

            if let Some(path) = output {
                tokio::fs::write(path, &response.bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("  Saved: {}", path.display());
            }
        }

        Commands::Probe { ref reference } => {
            let client = AuthenticatedClient::new(config)?;
            let response = client
                .fetch(reference)
                .await
                .with_context(|| format!("Failed to fetch {}", reference))?;
            println!("{}", response.content_type);
            println!("{}", MediaKind::from_content_type(&response.content_type));
        }

        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            if save {
                let path = config_path(&cli);
                config
                    .save(&path)
                    .with_context(|| format!("Failed to save config to {}", path.display()))?;
                println!("Saved: {}", path.display());
            }
        }
    }

    Ok(())
}
