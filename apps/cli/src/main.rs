use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, FormController, HttpTransport, UiState};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "bypass", about = "Resolve intermediate download links through the bypass backend")]
struct Args {
    /// Backend base URL; overrides bypass-client.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Give up on the backend after this many seconds (default: wait).
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Print the result panel as HTML markup.
    #[arg(long)]
    html: bool,
    /// Links to submit. Reads one link per line from stdin when omitted.
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = Some(timeout_secs);
    }

    let transport = HttpTransport::new(&settings).context("failed to build HTTP client")?;
    tracing::info!(endpoint = transport.endpoint(), "bypass client ready");
    let mut controller = FormController::new(transport);
    let renderer = tokio::spawn(render_loop(controller.subscribe(), args.html));

    let mut failures = 0usize;
    if args.urls.is_empty() {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
            if controller.submit(&line).await.is_err() {
                failures += 1;
            }
        }
    } else {
        for url in &args.urls {
            if controller.submit(url).await.is_err() {
                failures += 1;
            }
        }
    }

    drop(controller);
    renderer.await.context("renderer task failed")?;

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn render_loop(mut view: watch::Receiver<UiState>, html: bool) {
    while view.changed().await.is_ok() {
        let state = view.borrow_and_update().clone();
        println!("{}", render::render_state(&state, html));
    }
}
