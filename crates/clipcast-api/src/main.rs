//! C10: process wiring. One process owns the HTTP surface, the scheduler's
//! bounded worker pool, and the background retention/gauge tasks -- there is
//! no separate worker binary.

use std::net::SocketAddr;
use std::sync::Arc;

use clipcast_captions::TranscriptionClient;
use clipcast_scheduler::{JobScheduler, SchedulerConfig};
use clipcast_storage::LocalVideoStorage;
use clipcast_worker::{VideoPipelineProcessor, WorkerConfig};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipcast_api::{create_router, metrics, ApiConfig, AppState, GaugeRefresher, RetentionSweeper};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("clipcast=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting clipcast-api");

    let config = ApiConfig::from_env();
    info!(host = %config.host, port = config.port, "API config loaded");

    let scheduler_config = SchedulerConfig::from_env();
    let store = match clipcast_store::from_env().await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to connect to job store");
            std::process::exit(1);
        }
    };
    let storage = LocalVideoStorage::from_env();

    let transcription_config = clipcast_captions::TranscriptionClientConfig::from_env().unwrap_or_else(|_| {
        warn!("ASSEMBLYAI_API_KEY not set; caption requests will degrade to zero captions per job");
        clipcast_captions::TranscriptionClientConfig {
            base_url: std::env::var("TRANSCRIPTION_BASE_URL")
                .unwrap_or_else(|_| "https://api.assemblyai.com/v2".to_string()),
            api_key: String::new(),
            timeout: std::time::Duration::from_secs(60),
        }
    });
    let transcription = match TranscriptionClient::new(transcription_config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build transcription HTTP client");
            std::process::exit(1);
        }
    };

    let worker_config = WorkerConfig::from_env();
    let cost = scheduler_config.cost;
    let processor = Arc::new(VideoPipelineProcessor::new(worker_config, storage.clone(), transcription, cost));

    let scheduler = JobScheduler::new(Arc::clone(&store), scheduler_config, processor);

    info!("running crash recovery pass");
    if let Err(e) = scheduler.recover().await {
        error!(error = %e, "crash recovery failed");
        std::process::exit(1);
    }

    let metrics_enabled = std::env::var("METRICS_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    let metrics_handle = if metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics())
    } else {
        None
    };

    let state = AppState::new(config.clone(), Arc::clone(&scheduler), Arc::clone(&store), storage.clone());
    state.mark_recovered();

    tokio::spawn(RetentionSweeper::new(storage).run());
    tokio::spawn(GaugeRefresher::new(store, scheduler).run());

    let app = create_router(state, metrics_handle);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid bind address");

    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    info!("server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to install CTRL+C handler");
    info!("received shutdown signal");
}
