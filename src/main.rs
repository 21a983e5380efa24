#![allow(non_snake_case)]

mod app;
mod components;
pub mod context;
mod conversation;
mod pages;
mod theme;

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use clap::Parser;
use clinicdesk_media::{logging, ClientConfig};
use clinicdesk_ui::MediaServices;
use dioxus::desktop::{Config, WindowBuilder};

use crate::conversation::Conversation;

/// Conversation shown in the inbox, set from the command line
static CONVERSATION: OnceLock<Conversation> = OnceLock::new();

/// Get the conversation loaded at startup
pub fn get_conversation() -> Option<Conversation> {
    CONVERSATION.get().cloned()
}

/// ClinicDesk - WhatsApp inbox for hospitals and clinics
#[derive(Parser, Debug)]
#[command(name = "clinicdesk-desktop")]
#[command(about = "ClinicDesk - WhatsApp inbox with protected attachments")]
struct Args {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (default: <config_dir>/clinicdesk/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend origin relative references are resolved against
    #[arg(long, env = "CLINICDESK_BASE_URL")]
    base_url: Option<String>,

    /// Session bearer token
    #[arg(long, env = "CLINICDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Tenant (hospital/clinic) id
    #[arg(long, env = "CLINICDESK_TENANT")]
    tenant: Option<String>,

    /// Conversation fixture to show instead of the bundled sample
    #[arg(long)]
    conversation: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The desktop app is chattier than the CLI by default.
    let filter = match args.verbose {
        0 => "info",
        v => logging::verbosity_filter(v.saturating_add(1)),
    };
    logging::init(filter, &format!("desk-{}", std::process::id()));

    let config_path = args.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = ClientConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?
        .with_overrides(args.base_url, args.token, args.tenant);

    let conversation = match &args.conversation {
        Some(path) => Conversation::from_file(path)?,
        None => Conversation::sample()?,
    };
    tracing::info!(
        base_url = %config.base_url,
        tenant = ?config.tenant_id,
        contact = %conversation.contact_name,
        attachments = conversation.attachment_count(),
        "Starting ClinicDesk"
    );

    let title = format!("ClinicDesk - {}", conversation.contact_name);
    let _ = CONVERSATION.set(conversation);

    let services = MediaServices::new(config).context("Invalid media configuration")?;

    // Configure desktop window
    let window = Config::new().with_window(
        WindowBuilder::new()
            .with_title(&title)
            .with_inner_size(dioxus::desktop::LogicalSize::new(720.0, 900.0))
            .with_resizable(true),
    );

    dioxus::LaunchBuilder::desktop()
        .with_cfg(window)
        .with_context(services)
        .launch(app::App);

    Ok(())
}
