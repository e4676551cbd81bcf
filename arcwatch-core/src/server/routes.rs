use crate::server::middleware::observe_request;
use crate::server::{AppState, HealthReport, ViewerSettings};
use axum::Router;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{Json, Response};
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

pub const VIEWER_CONFIG_PATH: &str = "/api/viewer-config";
pub const HEALTH_PATH: &str = "/healthz";

pub fn build_router(state: AppState, stream_path: &str, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route(stream_path, get(stream_handler))
        .route(VIEWER_CONFIG_PATH, get(viewer_config))
        .route(HEALTH_PATH, get(health));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            observe_request,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET {stream_path}: WebSocket upgrade into the viewer stream
async fn stream_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_to_viewer(state, socket))
}

async fn stream_to_viewer(state: AppState, socket: WebSocket) {
    let mut subscription = match state.pipeline.subscribe() {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(error = %e, "failed to encode initial batch, closing viewer");
            return;
        }
    };
    let subscriber_id = subscription.id();

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            frame = subscription.recv() => match frame {
                Some(frame) => {
                    if ws_tx.send(Message::Text(frame.to_string().into())).await.is_err() {
                        break;
                    }
                }
                // Dropped by the hub: too slow, or shutting down.
                None => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            },
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(subscriber_id = %subscriber_id, error = %e, "viewer socket error");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    debug!(subscriber_id = %subscriber_id, "viewer stream ended");
}

/// GET /api/viewer-config
async fn viewer_config(State(state): State<AppState>) -> Json<ViewerSettings> {
    Json(state.viewer.as_ref().clone())
}

/// GET /healthz
async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".to_string(),
        subscribers: state.pipeline.hub().len(),
        history: state.pipeline.history_len(),
    })
}
