use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json,
    Router,
    extract::State,
    routing::get,
};
use axum_server::{Handle, Server};
use giftbot_common::models::GiveawayStats;
use tokio::sync::oneshot;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::Error;
use crate::services::giveaway::GiveawayManager;

/// Shared state for the health routes.
#[derive(Clone)]
pub struct HealthState {
    pub bot_name: String,
    pub manager: Arc<GiveawayManager>,
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/stats", get(handle_stats))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Serves the liveness endpoint on `0.0.0.0:port`. Send on (or drop) the
/// returned sender to shut it down gracefully.
pub async fn start_health_server(port: u16, state: HealthState) -> Result<oneshot::Sender<()>, Error> {
    let app = health_router(state);

    let (shutdown_send, shutdown_recv) = oneshot::channel::<()>();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Health server listening on http://{}", addr);

    let handle = Handle::new();
    let handle_clone = handle.clone();

    tokio::spawn(async move {
        let _ = shutdown_recv.await;
        handle_clone.graceful_shutdown(None);
    });

    let server = Server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service());

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Health server error: {}", e);
        }
        info!("Health server shut down.");
    });

    Ok(shutdown_send)
}

async fn handle_root(State(state): State<HealthState>) -> String {
    format!("{} is running!", state.bot_name)
}

async fn handle_stats(State(state): State<HealthState>) -> Json<GiveawayStats> {
    Json(state.manager.stats())
}
