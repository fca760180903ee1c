use challenge_tracker::{clock::spawn_day_watcher, router, AppState, Config};
use chrono::Local;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let tracker = config.build_tracker()?;
    for participant in tracker.participants() {
        info!(
            "participant {} ({}) started {}",
            participant.id, participant.name, participant.start_date
        );
    }

    let state = AppState::new(tracker, Local::now().date_naive());
    let watcher = spawn_day_watcher(state.clone());
    let app = router(state);

    info!("listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    watcher.abort();
    info!("shut down, check-ins discarded");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
