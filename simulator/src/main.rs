mod shipments;

use crate::shipments::{advance_fleet, generate_fleet, SimulatedShipment};
use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use parceltrack_common::ShipmentRecord;
use rand::Rng;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Stand-in for the tracking service: serves a generated, slowly
/// evolving shipment list so the status panel can be exercised without
/// real carrier data.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Address to serve the generated shipment data on
    #[clap(long, default_value = "127.0.0.1:58785")]
    listen_address: SocketAddr,

    /// Number of shipments in flight
    #[clap(long, default_value = "5")]
    shipments: usize,

    /// Seconds between simulated delivery advances
    #[clap(long, default_value = "30")]
    advance_interval: u64,

    /// Fraction of requests answered with HTTP 500, for exercising the
    /// panel's error path
    #[clap(long, default_value = "0.0")]
    failure_rate: f64,
}

struct SimulatorState {
    fleet: Mutex<Vec<SimulatedShipment>>,
    failure_rate: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let fleet = {
        let mut rng = rand::rng();
        generate_fleet(args.shipments, &mut rng)
    };
    let state = Arc::new(SimulatorState {
        fleet: Mutex::new(fleet),
        failure_rate: args.failure_rate.clamp(0.0, 1.0),
    });

    // Advance the simulated deliveries in the background.
    let advancing = Arc::clone(&state);
    let mut advance_interval =
        tokio::time::interval(Duration::from_secs(args.advance_interval.max(1)));
    tokio::spawn(async move {
        loop {
            advance_interval.tick().await;
            let mut fleet = advancing
                .fleet
                .lock()
                .expect("should be able to lock the fleet");
            let mut rng = rand::rng();
            advance_fleet(&mut fleet, &mut rng);
            debug!("advanced simulated deliveries");
        }
    });

    let app = Router::new()
        .route("/", get(trackings))
        .route("/trackings", get(trackings))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.listen_address).await?;
    info!(
        "serving {} generated shipments on {}",
        args.shipments, args.listen_address
    );
    axum::serve(listener, app).await?;

    Ok(())
}

async fn trackings(
    State(state): State<Arc<SimulatorState>>,
) -> Result<Json<Vec<ShipmentRecord>>, StatusCode> {
    if state.failure_rate > 0.0 && rand::rng().random_bool(state.failure_rate) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let fleet = state
        .fleet
        .lock()
        .expect("should be able to lock the fleet");
    Ok(Json(fleet.iter().map(SimulatedShipment::to_record).collect()))
}
