//! HTTP persistence API
//!
//! Exposes `POST /api/save-image` and `GET /api/get-images` over axum.
//! Unknown verbs on these paths get a 405 with an `Allow` header from the
//! method router.

pub mod routes;
pub mod state;

pub use routes::api_routes;
pub use state::ApiState;

use crate::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Assemble the full application router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().merge(api_routes()).with_state(state)
}

/// Bind `addr` and serve the persistence API until the process exits.
pub async fn serve(addr: SocketAddr, state: Arc<ApiState>) -> Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("Persistence API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
