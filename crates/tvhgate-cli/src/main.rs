//! tvhgate - HDHomeRun-compatible gateway in front of Tvheadend.

/// Application configuration (TOML + environment).
mod config;
/// HDHomeRun HTTP endpoints.
mod server;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use tvhgate_api::tvheadend::TvheadendApi;
use tvhgate_core::{Gateway, RefreshMode, build_lineup, spawn_refresh_task, transform_with_lineup};

use crate::config::{AppConfig, resolve_config_path};
use crate::server::AppState;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Explicit config file path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run (defaults to `serve`).
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HDHomeRun gateway.
    Serve,
    /// Fetch the channel lineup once and print it as JSON.
    Lineup,
    /// Fetch and transform the guide once.
    Epg(EpgArgs),
}

/// Arguments for the `epg` subcommand.
#[derive(clap::Args)]
struct EpgArgs {
    /// Write the XMLTV document to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

/// Writes `text` to stdout followed by a newline.
fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").context("failed to write to stdout")?;
    stdout.flush().context("failed to flush stdout")
}

/// Runs the gateway until Ctrl-C.
#[instrument(skip_all)]
async fn run_serve(config: &AppConfig) -> Result<()> {
    let hostname = gethostname::gethostname().to_string_lossy().into_owned();
    let mode = config.refresh_mode()?;
    let client = config.backend_client()?;
    let gateway = Arc::new(Gateway::new(client, config.lineup_settings(), mode));

    let device = config.device_descriptor(&hostname);
    let base_url = device.base_url.clone();
    let state = AppState::new(Arc::clone(&gateway), device)?;

    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let shutdown = CancellationToken::new();
    let refresh_task = match mode {
        RefreshMode::Interval(period) => Some(spawn_refresh_task(
            Arc::clone(&gateway),
            period,
            shutdown.clone(),
        )),
        RefreshMode::OnDemand => None,
    };

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        tracing::info!("Shutdown requested");
        signal_token.cancel();
    });

    tracing::info!(%addr, %base_url, "Gateway listening");
    let served = server::serve(listener, server::router(state), shutdown.clone()).await;

    shutdown.cancel();
    if let Some(task) = refresh_task {
        task.await.context("refresh task panicked")?;
    }
    served
}

/// Prints the current lineup.
#[instrument(skip_all)]
async fn run_lineup(config: &AppConfig) -> Result<()> {
    let client = config.backend_client()?;
    let channels = client
        .fetch_channels()
        .await
        .context("failed to fetch channels")?;
    let lineup = build_lineup(&channels, &config.lineup_settings());
    let json = serde_json::to_string_pretty(&lineup).context("failed to serialize lineup")?;
    write_stdout(&json)
}

/// Fetches and transforms the guide, writing it to `output` or stdout.
#[instrument(skip_all)]
async fn run_epg(config: &AppConfig, output: Option<&Path>) -> Result<()> {
    let client = config.backend_client()?;
    let channels = client
        .fetch_channels()
        .await
        .context("failed to fetch channels")?;
    let lineup = build_lineup(&channels, &config.lineup_settings());
    let raw = client
        .fetch_guide_xml()
        .await
        .context("failed to fetch guide")?;

    let transformed = transform_with_lineup(raw.as_str(), &lineup, &Local::now())
        .context("failed to transform guide")?;
    let document = transformed.document;

    match output {
        Some(path) => {
            std::fs::write(path, document.to_xml())
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                channels = document.channel_numbers().len(),
                programmes = document.programme_count(),
                warnings = transformed.warnings.len(),
                "Guide written"
            );
            Ok(())
        }
        None => write_stdout(document.to_xml().trim_end()),
    }
}

/// Installs the tracing subscriber. Logs go to stderr so command output stays clean.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let path = resolve_config_path(cli.config.as_deref(), cli.dir.as_deref())?;
    let config = AppConfig::load_with_env(&path).context("failed to load config")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_serve(&config).await,
        Commands::Lineup => run_lineup(&config).await,
        Commands::Epg(args) => run_epg(&config, args.output.as_deref()).await,
    }
}
