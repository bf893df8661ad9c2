//! GraphQL storefront backend.
//!
//! A thin resolver -> service -> document layer over MongoDB:
//! users, products, orders and reviews behind a single GraphQL
//! endpoint, token-based auth with refresh rotation, plus a small
//! REST surface for token refresh and the payment processor
//! passthrough.
//!
//! # Layout
//! - [`graphql`]: resolvers, schema wiring, guards applied per operation
//! - [`services`]: one service per collection, query logic lives here
//! - [`models`]: serde documents shared with the GraphQL type layer
//! - [`auth`]: JWT issuance/validation, password hashing, guards
//! - [`routes`]: axum handlers for the HTTP surface
use std::time::Duration;

use axum::{
    Extension, Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod graphql;
pub mod models;
pub mod payments;
pub mod routes;
pub mod services;
pub mod state;

use config::Config;
use graphql::build_schema;
use routes::{
    client_id_handler, graphql_handler, graphql_playground, refresh_token_handler, stripe_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = cors_layer(&state.config);
    let schema = build_schema(state.clone());

    let app = Router::new()
        .route("/api/graphql", get(graphql_playground).post(graphql_handler))
        .route("/api/refresh_token", get(refresh_token_handler))
        .route("/api/clientId", get(client_id_handler))
        .route("/api/stripe", post(stripe_handler))
        .layer(Extension(schema))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<_> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
