use axum::Router;
use axum::body::Body;
use axum::extract::Extension;
use axum::http::Request;
use axum::middleware;
use axum::routing::get;
use tower::ServiceExt;

use voxrelay::infrastructure::observability::{REQUEST_ID_HEADER, RequestId, request_id_middleware};

fn echo_router() -> Router {
    Router::new()
        .route(
            "/",
            get(|Extension(id): Extension<RequestId>| async move { id.0 }),
        )
        .layer(middleware::from_fn(request_id_middleware))
}

#[test]
fn given_request_id_header_constant_when_accessed_then_returns_correct_value() {
    assert_eq!(REQUEST_ID_HEADER, "x-request-id");
}

#[test]
fn given_request_id_when_cloned_then_equals_original() {
    let original = RequestId("abc".to_string());
    let cloned = original.clone();
    assert_eq!(original.0, cloned.0);
}

#[tokio::test]
async fn given_caller_request_id_when_handling_then_same_id_is_echoed_and_visible_to_handler() {
    let response = echo_router()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(REQUEST_ID_HEADER, "caller-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "caller-42");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"caller-42");
}

#[tokio::test]
async fn given_no_request_id_when_handling_then_uuid_is_generated() {
    let response = echo_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
