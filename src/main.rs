// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use tracing_subscriber::EnvFilter;

use tokengate_server::api::router;
use tokengate_server::auth::{AssetResolver, TokenService};
use tokengate_server::config::{
    BALANCE_API_URL_ENV, DATA_DIR_ENV, DEFAULT_BALANCE_API_URL, DEFAULT_DATA_DIR,
    TOKEN_SECRET_ENV, TOKEN_TTL_ENV,
};
use tokengate_server::state::AppState;
use tokengate_server::storage::ContentDatabase;

#[tokio::main]
async fn main() {
    init_tracing();

    let secret = env::var(TOKEN_SECRET_ENV).unwrap_or_else(|_| {
        tracing::warn!("{TOKEN_SECRET_ENV} not set, using development secret");
        "development-secret".to_string()
    });
    let ttl = env::var(TOKEN_TTL_ENV)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs);
    let balance_url =
        env::var(BALANCE_API_URL_ENV).unwrap_or_else(|_| DEFAULT_BALANCE_API_URL.to_string());
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

    let db = ContentDatabase::open(&PathBuf::from(&data_dir).join("content.redb"))
        .expect("Failed to open content database");

    let state = AppState::new(
        db,
        TokenService::new(&secret, ttl),
        AssetResolver::new(balance_url),
    );
    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3100".to_string())
        .parse()
        .unwrap_or(3100);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Tokengate server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if env::var("LOG_FORMAT").is_ok_and(|value| value.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("shutdown signal received");
}
