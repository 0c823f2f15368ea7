use crate::api::state::ApiState;
use crate::models::{ImageListResponse, SaveImageRequest, SaveImageResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::error;

pub fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/save-image", post(save_image))
        .route("/api/get-images", get(get_images))
}

/// Fetch the image behind `url` and persist it. Failure details go to the
/// log; the client only sees a generic message.
async fn save_image(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SaveImageRequest>,
) -> (StatusCode, Json<SaveImageResponse>) {
    match state.storage.store(&request.url).await {
        Ok(filename) => (
            StatusCode::OK,
            Json(SaveImageResponse {
                success: true,
                filename: Some(filename),
                error: None,
            }),
        ),
        Err(e) => {
            error!("Error saving image: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveImageResponse {
                    success: false,
                    filename: None,
                    error: Some("Failed to save image".to_string()),
                }),
            )
        }
    }
}

async fn get_images(
    State(state): State<Arc<ApiState>>,
) -> (StatusCode, Json<ImageListResponse>) {
    match state.storage.list().await {
        Ok(images) => (StatusCode::OK, Json(ImageListResponse { images })),
        Err(e) => {
            error!("Error listing images: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ImageListResponse { images: Vec::new() }),
            )
        }
    }
}
