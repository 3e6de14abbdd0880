use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use station_board::config::AppConfig;
use station_board::display::Projector;
use station_board::scheduler::RefreshScheduler;
use station_board::search::StationDirectory;
use station_board::source::{HttpScheduleSource, Provider, StaticScheduleSource};
use station_board::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "station_board=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let provider = match &config.mock_dir {
        Some(dir) => {
            let source = StaticScheduleSource::from_dir(dir)?;
            info!(
                dir = %dir.display(),
                boards = source.available_boards().len(),
                "serving static schedule data"
            );
            Provider::Static(source)
        }
        None => {
            info!(url = %config.source.base_url, "using schedule provider");
            Provider::Http(HttpScheduleSource::new(config.source.clone())?)
        }
    };
    let provider = Arc::new(provider);

    let scheduler = RefreshScheduler::spawn(Arc::clone(&provider), config.scheduler.clone());
    let directory = StationDirectory::new(provider);

    // Warm the station list; search retries the load on first use if this fails
    match directory.load().await {
        Ok(index) => info!(count = index.len(), "station list ready"),
        Err(e) => warn!(error = %e, "station list unavailable at startup"),
    }

    let state = AppState::new(
        scheduler.clone(),
        directory,
        Projector::new(config.timezone),
    )
    .with_result_cap(config.result_cap);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "station board listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
