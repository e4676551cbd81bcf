use crate::ingest::RequestCtx;
use crate::server::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use tracing::debug;

/// Hands every request to the observer before routing it.
pub async fn observe_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(peer)) => {
            state.observer.observe(&RequestCtx {
                method: request.method(),
                path: request.uri().path(),
                headers: request.headers(),
                peer_ip: peer.ip(),
            });
        }
        None => debug!(path = request.uri().path(), "no peer address, request not observed"),
    }

    next.run(request).await
}
