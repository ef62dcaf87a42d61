use mercato::{app, initialize_state, seed, telemetry};

#[tokio::main]
async fn main() {
    telemetry::init();

    let state = match initialize_state().await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "state initialization failed");
            std::process::exit(1);
        }
    };

    // A first start gets a small catalog to play with.
    if let Err(err) = seed::run(&state).await {
        tracing::warn!(error = %err, "sample catalog could not be inserted");
    }

    let port = state.config.port;
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %port, "cannot listen on port");
            std::process::exit(1);
        }
    };

    tracing::info!(%port, "server started");

    if let Err(err) = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %err, "server stopped");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
