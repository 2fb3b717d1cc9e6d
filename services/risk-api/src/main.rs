//! Risk API Server
//!
//! Serves a daily risk grid over a bounded region as GeoJSON layers.

use anyhow::Context;
use clap::Parser;
use metrics::gauge;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use risk_api::config::ServiceArgs;
use risk_api::router::build_router;
use risk_api::server::{bind_with_fallback, shutdown_signal};
use risk_api::state::AppState;
use risk_processor::RiskDataset;

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = ServiceArgs::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = match runtime_builder.build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(run_server(args));
    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(args: ServiceArgs) -> anyhow::Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting risk API server");

    let config = args
        .dataset_config()
        .context("Invalid configuration")?;

    // All data work happens here, before the listener opens
    let dataset = RiskDataset::build(&config).context("Failed to build dataset")?;
    gauge!("risk_grid_cells").set(dataset.grid().len() as f64);
    info!(
        data_note = %dataset.data_note(),
        days = dataset.axis().len(),
        today = %dataset.today(),
        "Dataset ready"
    );

    let state = AppState::new(dataset, args.default_stride, args.static_dir.clone());
    let app = build_router(state, prometheus_handle);

    let listener = bind_with_fallback(&args.host, args.port)
        .await
        .context("Cannot bind any port; set PORT")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    info!("Server stopped");
    Ok(())
}
