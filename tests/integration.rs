use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use fluxgen::api::{self, ApiState};
use fluxgen::app::{App, AppServices};
use fluxgen::flux::{FluxClient, MockFluxClient};
use fluxgen::models::{ImageListResponse, SaveImageResponse, TaskStatus};
use fluxgen::storage::{LocalImageStore, MockImageStore, StorageService};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAKE_PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[tokio::test]
async fn test_full_workflow_against_mock_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/flux-pro-1.1"))
        .and(header_matcher("x-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "t1" })))
        .expect(1)
        .mount(&server)
        .await;

    // First status check: the task is not visible yet.
    Mock::given(method("GET"))
        .and(path("/v1/get_result"))
        .and(query_param("id", "t1"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    let sample_url = format!("{}/img.png", server.uri());
    Mock::given(method("GET"))
        .and(path("/v1/get_result"))
        .and(query_param("id", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "Ready",
            "result": { "sample": sample_url }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_PNG))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().join("images");

    let app = App::with_services(AppServices {
        generation: Arc::new(
            FluxClient::new("test-key".to_string()).with_base_url(server.uri()),
        ),
        storage: Arc::new(LocalImageStore::new(&images_dir)),
    })
    .with_poll_interval(Duration::from_millis(10));

    let generated = app.generate("a red fox").await.unwrap();

    assert_eq!(generated.task_id, "t1");
    assert_eq!(generated.sample_url, format!("{}/img.png", server.uri()));

    let filename = generated.filename.expect("image should have been saved");
    assert_eq!(std::fs::read(images_dir.join(&filename)).unwrap(), FAKE_PNG);
    assert_eq!(app.saved_images().await.unwrap(), vec![filename]);
}

#[tokio::test]
async fn test_full_workflow_with_mocks() {
    let flux = MockFluxClient::new()
        .with_submit_response("t1")
        .with_status_not_found()
        .with_status_response(TaskStatus::ready("https://x/img.png"));
    let storage = MockImageStore::new();

    let app = App::with_services(AppServices {
        generation: Arc::new(flux.clone()),
        storage: Arc::new(storage.clone()),
    })
    .with_poll_interval(Duration::from_millis(1));

    let generated = app.generate("a red fox").await.unwrap();

    assert_eq!(flux.get_status_count(), 2);
    assert_eq!(storage.get_stored_urls(), vec!["https://x/img.png"]);
    assert_eq!(generated.filename.as_deref(), Some("image_1.png"));
}

#[tokio::test]
async fn test_persistence_api_roundtrip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_PNG))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().join("images");
    let storage: Arc<dyn StorageService> = Arc::new(LocalImageStore::new(&images_dir));
    let router = api::router(Arc::new(ApiState::new(storage)));

    let save_request = Request::builder()
        .method("POST")
        .uri("/api/save-image")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "url": format!("{}/img.png", server.uri()) }).to_string(),
        ))
        .unwrap();

    let response = router.clone().oneshot(save_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let saved: SaveImageResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(saved.success);
    let filename = saved.filename.expect("save must report the filename");

    let list_request = Request::builder()
        .method("GET")
        .uri("/api/get-images")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(list_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let listed: ImageListResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listed.images, vec![filename]);
}
