#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::future::ready;

use axum::routing::get;
use stockpile::telemetry;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    telemetry::setup_logging();

    let recorder_handle = match telemetry::setup_metrics_recorder() {
        Ok(handle) => handle,
        Err(err) => {
            tracing::error!(%err, "failed to install prometheus recorder");
            std::process::exit(1);
        },
    };

    let state = match stockpile::initialize_state().await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(%err, "failed to initialize application state");
            std::process::exit(1);
        },
    };
    let address = state.config.address.clone();

    let app = stockpile::app(state).route(
        "/metrics",
        get(move || ready(recorder_handle.render())),
    );

    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%err, %address, "cannot bind server address");
            std::process::exit(1);
        },
    };

    tracing::info!(%address, "server started");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%err, "server stopped unexpectedly");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(err) => {
                tracing::error!(%err, "failed to install signal handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}
