use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    resolve_endpoint, ChatView, ChatWidgetController, HttpQueryTransport, SubmitOutcome,
};
use shared::domain::Locale;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal_view;

use config::load_settings;
use terminal_view::TerminalView;

/// Talks to a chat deployment's `/query` endpoint from the terminal.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    /// `es` or `en`.
    #[arg(long)]
    locale: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    lock_while_pending: bool,
    /// Send a single message and exit.
    #[arg(long)]
    message: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(raw) = args.locale.as_deref() {
        settings.widget.locale =
            Locale::parse(raw).with_context(|| format!("unsupported locale '{raw}'"))?;
    }
    if args.lock_while_pending {
        settings.widget.lock_while_pending = true;
    }

    let endpoint = resolve_endpoint(&settings.server_url, &settings.widget.endpoint_path)?;
    tracing::info!(%endpoint, "chat console starting");

    let interactive = args.message.is_none();
    let controller = ChatWidgetController::new(
        TerminalView::new(io::stdout(), interactive),
        HttpQueryTransport::new(endpoint),
        settings.widget,
    );
    controller.init();

    if let Some(message) = args.message {
        controller.view_mut().set_input(&message);
        return match controller.submit().await {
            SubmitOutcome::Failed(entry, code) => {
                anyhow::bail!("query for entry {} failed ({code:?})", entry.0)
            }
            _ => Ok(()),
        };
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        controller.view_mut().set_input(&line);
        if let SubmitOutcome::Ignored(_) = controller.submit().await {
            controller.view_mut().focus_input();
        }
    }

    tracing::debug!(
        pending = controller.view().pending_entries(),
        "stdin closed; chat console exiting"
    );
    Ok(())
}
