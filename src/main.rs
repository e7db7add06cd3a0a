// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, time::Duration};

use gramaconnect_server::{
    api::router,
    auth::TokenService,
    config::AppConfig,
    startup::{init_tracing, open_store, seed_officials},
    state::AppState,
};

/// Grace period for in-flight requests on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may be set directly.
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().inspect_err(|e| eprintln!("Invalid configuration: {e}"))?;
    init_tracing(config.log_format);
    tracing::info!(?config, "Configuration loaded");

    let store = open_store(&config).await.inspect_err(|e| {
        tracing::error!(error = %e, "Document store unavailable");
    })?;

    if let Some(seed_file) = &config.officials_seed_file {
        let count = seed_officials(&store, seed_file).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to seed officials directory");
        })?;
        tracing::info!(count, file = %seed_file.display(), "Officials directory seeded");
    }

    let tokens = TokenService::new(config.secret_key.as_bytes(), config.token_validity);
    let app = router(AppState::new(store, tokens));

    let addr: SocketAddr = config.bind_address().parse()?;

    let handle = axum_server::Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            }
        }
    });

    tracing::info!(%addr, "GramaConnect server listening (docs at /docs)");

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
