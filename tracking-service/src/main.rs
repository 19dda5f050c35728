mod carrier;
mod config;
mod notify;
mod routes;
mod store;
mod updater;

use crate::carrier::DhlClient;
use crate::config::ServiceConfig;
use crate::notify::Notifier;
use crate::routes::AppState;
use crate::store::TrackingStore;
use anyhow::Result;
use clap::Parser;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use parceltrack_common::metrics::{component_info_metric, names};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Path to the add-on options file
    #[clap(long, default_value = "/data/options.json")]
    options_file: PathBuf,

    /// Path to the persisted tracking data
    #[clap(long, default_value = "/data/trackings.json")]
    trackings_file: PathBuf,

    /// Address the HTTP interface listens on
    #[clap(long, default_value = "0.0.0.0:58784")]
    listen_address: SocketAddr,

    #[clap(long, env, default_value = "127.0.0.1:9090")]
    observability_address: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    PrometheusBuilder::new()
        .with_http_listener(args.observability_address)
        .install()
        .expect("prometheus metrics exporter should be setup");

    component_info_metric("tracking-service");
    describe_counter!(names::CARRIER_REQUESTS, "Requests issued to the carrier");
    describe_counter!(names::UPDATE_PASSES, "Completed refresh passes");
    describe_counter!(names::FAILURES, "Failures by kind");

    let config = ServiceConfig::load(&args.options_file);
    info!(
        "refreshing every {} minute(s), notify_on_change = {}",
        config.update_interval, config.notify_on_change
    );

    let store = Arc::new(Mutex::new(TrackingStore::load(&args.trackings_file)));
    let carrier = Arc::new(DhlClient::new());
    let notifier = Notifier::new();

    let state = AppState {
        store: Arc::clone(&store),
        carrier: Arc::clone(&carrier),
    };
    let listener = tokio::net::TcpListener::bind(args.listen_address).await?;
    info!("listening on {}", args.listen_address);
    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, routes::router(state)).await {
            warn!("http interface stopped: {error}");
        }
    });

    // The first tick fires immediately, so tracked shipments are
    // refreshed right after startup.
    let mut update_interval =
        tokio::time::interval(Duration::from_secs(config.update_interval.max(1) * 60));
    update_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = update_interval.tick() => {
                updater::run_update_pass(
                    &store,
                    &carrier,
                    &notifier,
                    config.notify_on_change,
                )
                .await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    let store = store
        .lock()
        .expect("should be able to lock the tracking store");
    if let Err(error) = store.save() {
        warn!("could not persist tracking data on shutdown: {error}");
    }

    Ok(())
}
