//! STH Telemetry Dashboard — Binary Entrypoint
//! Boots the poll scheduler and the Axum HTTP server that republishes the
//! aggregated series for the chart front end.

use std::sync::Arc;

use anyhow::Context;
use chrono::FixedOffset;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sth_telemetry_dashboard::api::{self, AppState};
use sth_telemetry_dashboard::config::Config;
use sth_telemetry_dashboard::metrics::Metrics;
use sth_telemetry_dashboard::poll::historian::SthClient;
use sth_telemetry_dashboard::poll::scheduler::{spawn_poll_scheduler, PollSchedulerCfg};
use sth_telemetry_dashboard::store::SeriesStore;
use sth_telemetry_dashboard::SampleSource;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = Config::load_default().context("loading dashboard config")?;
    let metrics = Metrics::init(cfg.poll.interval_secs);

    let store = Arc::new(SeriesStore::new());
    let source: Arc<dyn SampleSource> = Arc::new(SthClient::new(cfg.historian.clone()));

    spawn_poll_scheduler(
        PollSchedulerCfg {
            interval_secs: cfg.poll.interval_secs,
            last_n: cfg.historian.last_n,
        },
        source,
        Arc::clone(&store),
    );

    let display_offset = FixedOffset::east_opt(cfg.display.utc_offset_minutes * 60)
        .context("display offset out of range")?;
    let state = AppState {
        store,
        display_offset,
    };
    let router = api::create_router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.poll.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.poll.bind_addr))?;
    tracing::info!(addr = %cfg.poll.bind_addr, "dashboard listening");
    axum::serve(listener, router).await.context("http server")?;
    Ok(())
}
