use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use imagesapi::{HttpStatusError, ImageBackend, ImageClient, ImagePayload, OpenAiImages};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn record_generation(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    recorded.requests.lock().unwrap().push((auth, body));
    Json(json!({ "data": [{ "b64_json": "aGVsbG8=" }] }))
}

fn generation_router(recorded: &Recorded) -> Router {
    Router::new()
        .route("/v1/images/generations", post(record_generation))
        .with_state(recorded.clone())
}

#[tokio::test]
async fn posts_prompt_with_bearer_and_model() {
    let recorded = Recorded::default();
    let base = serve(generation_router(&recorded)).await;

    let client = ImageClient::new(format!("{base}/v1/"), "sk-test", "dall-e-3");
    let response = OpenAiImages::new()
        .generate(&client, "a lighthouse at dusk")
        .await
        .unwrap();

    assert_eq!(response.into_payload(), ImagePayload::Inline("aGVsbG8=".into()));

    let requests = recorded.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(
        body,
        &json!({
            "prompt": "a lighthouse at dusk",
            "n": 1,
            "size": "1024x1024",
            "model": "dall-e-3"
        })
    );
}

#[tokio::test]
async fn omits_auth_and_model_when_blank() {
    let recorded = Recorded::default();
    let base = serve(generation_router(&recorded)).await;

    let client = ImageClient::new(format!("{base}/v1"), "", "");
    OpenAiImages::new()
        .generate(&client, "a lighthouse")
        .await
        .unwrap();

    let requests = recorded.requests.lock().unwrap();
    let (auth, body) = &requests[0];
    assert!(auth.is_none());
    assert!(body.get("model").is_none());
}

#[tokio::test]
async fn non_success_status_carries_code_and_body() {
    let router = Router::new().route(
        "/images/generations",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let base = serve(router).await;

    let client = ImageClient::new(base, "sk-wrong", "");
    let err = OpenAiImages::new()
        .generate(&client, "anything")
        .await
        .unwrap_err();

    let status = err.downcast_ref::<HttpStatusError>().unwrap();
    assert_eq!(status.status, 401);
    assert_eq!(status.body, "invalid api key");
}

#[tokio::test]
async fn truncated_error_body_still_reports_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.ends_with(b"}") {
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..read]);
        }
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 64\r\n\r\nshort")
            .await
            .unwrap();
    });

    let client = ImageClient::new(format!("http://{addr}"), "", "");
    let err = OpenAiImages::new()
        .generate(&client, "anything")
        .await
        .unwrap_err();

    let status = err.downcast_ref::<HttpStatusError>().unwrap();
    assert_eq!(status.status, 503);
    assert_eq!(status.body, "Service Unavailable");
}

#[tokio::test]
async fn download_reports_content_type() {
    let router = Router::new().route(
        "/out/y.jpg",
        get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], vec![0xFF_u8, 0xD8, 0xFF]) }),
    );
    let base = serve(router).await;

    let image = OpenAiImages::new()
        .download(&format!("{base}/out/y.jpg"))
        .await
        .unwrap();

    assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF]);
    assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn download_failure_falls_back_to_status_text() {
    let router = Router::new().route("/gone.png", get(|| async { StatusCode::NOT_FOUND }));
    let base = serve(router).await;

    let err = OpenAiImages::new()
        .download(&format!("{base}/gone.png"))
        .await
        .unwrap_err();

    let status = err.downcast_ref::<HttpStatusError>().unwrap();
    assert_eq!(status.status, 404);
    assert_eq!(status.body, "Not Found");
}
