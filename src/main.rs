// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tokio::sync::{broadcast, Notify};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::session_runner::{self, RunnerSettings};
use crate::application::simulator::MetricsSimulator;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::notifier::BroadcastNotifier;
use crate::infrastructure::sign_out::{shutdown_signal, ShutdownTerminator};
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

const EVENT_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("water_monitor=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let addr = app_config.server.socket_addr()?;

    // Simulation core
    let drift = app_config.simulation.drift_profile();
    let simulator = match app_config.simulation.seed {
        Some(seed) => MetricsSimulator::seeded(seed, drift),
        None => MetricsSimulator::from_entropy(drift),
    };

    // Outbound adapters (infrastructure layer)
    let (events, _) = broadcast::channel(EVENT_BUFFER);
    let shutdown = Arc::new(Notify::new());
    let notifier = Arc::new(BroadcastNotifier::new(events.clone()));
    let terminator = Arc::new(ShutdownTerminator::new(shutdown.clone()));

    // Session and services (application layer)
    let (session, session_guard) = session_runner::spawn(
        RunnerSettings::new(
            app_config.simulation.tick_interval(),
            app_config.simulation.history_capacity,
        ),
        simulator,
        events,
        notifier,
        terminator,
    );
    let dashboard_service = DashboardService::new(app_config.dashboard.title.clone());
    let streaming_service =
        StreamingDashboardService::new(session.clone(), dashboard_service.clone());

    let state = Arc::new(AppState {
        session,
        dashboard_service,
        streaming_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    tracing::info!(%addr, "Starting water-monitor service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal(shutdown).await;
            // Ends open dashboard streams so the drain can finish on Ctrl-C
            drop(session_guard);
        })
        .await?;

    tracing::info!("water-monitor stopped");

    Ok(())
}
