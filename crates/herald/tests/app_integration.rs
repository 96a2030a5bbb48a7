//! End-to-end tests through the assembled server, without sockets.

use std::sync::Arc;

use bytes::Bytes;
use herald::app;
use herald::config::HeraldConfig;
use herald::server::{HttpResponse, Server, REQUEST_ID_HEADER};
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;

fn server() -> Server {
    app::build_server(&HeraldConfig::default()).unwrap()
}

fn get(uri: &str) -> Request<Bytes> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Bytes::new())
        .unwrap()
}

fn post(uri: &str, content_type: &str, body: &'static str) -> Request<Bytes> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

fn post_form(body: &'static str) -> Request<Bytes> {
    post("/", "application/x-www-form-urlencoded", body)
}

fn post_json(body: &'static str) -> Request<Bytes> {
    post("/api/name", "application/json", body)
}

async fn body_text(response: HttpResponse) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: HttpResponse) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn content_type(response: &HttpResponse) -> &str {
    response.headers()[header::CONTENT_TYPE].to_str().unwrap()
}

// GET /

#[tokio::test]
async fn test_home_without_name_asks_who() {
    let response = server().handle(get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));
    assert!(body_text(response).await.contains("Who are you?"));
}

#[tokio::test]
async fn test_home_greets_named_visitor() {
    let response = server().handle(get("/?name=Grace+Hopper")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<h1>Hello Grace Hopper</h1>"));
}

#[tokio::test]
async fn test_home_does_not_validate_the_greeting() {
    let response = server().handle(get("/?Name=Ada")).await;
    assert!(body_text(response).await.contains("Hello Ada"));
}

// POST /

#[tokio::test]
async fn test_form_valid_name_redirects_home() {
    let response = server().handle(post_form("name=Grace+Hopper")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/?name=Grace+Hopper");
}

#[tokio::test]
async fn test_redirect_target_greets_the_name() {
    let server = server();
    let response = server.handle(post_form("name=Grace%26Co")).await;
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();

    let page = server.handle(get(&location)).await;
    assert!(body_text(page).await.contains("Hello Grace&amp;Co"));
}

#[tokio::test]
async fn test_form_empty_name_rerenders_with_message() {
    let response = server().handle(post_form("name=")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Who are you?"));
    assert!(html.contains("should not be empty."));
    assert!(!html.contains("at least 5"));
}

#[tokio::test]
async fn test_form_missing_field_rerenders_with_message() {
    let html = body_text(server().handle(post_form("")).await).await;
    assert!(html.contains("should not be empty."));
}

#[tokio::test]
async fn test_form_short_name_rerenders_with_length_message() {
    let html = body_text(server().handle(post_form("name=Ada")).await).await;

    assert!(html.contains("Who are you?"));
    assert!(html.contains("must be at least 5 characters. You entered 3 characters."));
    assert!(html.contains("value=\"Ada\""));
}

// POST /api/name

#[tokio::test]
async fn test_api_valid_name_echoes() {
    let response = server().handle(post_json(r#"{"name":"Grace"}"#)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json");
    assert_eq!(body_json(response).await, serde_json::json!({ "name": "Grace" }));
}

#[tokio::test]
async fn test_api_empty_name_is_problem_details() {
    let response = server().handle(post_json(r#"{"name":""}"#)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&response), "application/problem+json");
    assert_eq!(
        body_json(response).await,
        serde_json::json!({
            "status": 400,
            "detail": "'Name' should not be empty.",
            "errors": { "Name": ["'Name' should not be empty."] }
        })
    );
}

#[tokio::test]
async fn test_api_long_name_reports_max_length() {
    let response = server()
        .handle(post_json(
            r#"{"Name":"abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz"}"#,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["detail"],
        "The length of 'Name' must be 50 characters or fewer. You entered 52 characters."
    );
    assert_eq!(body["errors"]["Name"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_api_malformed_body_is_binding_error() {
    let response = server().handle(post_json("{not json")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&response), "application/json");
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["request_id"].is_string());
}

// GET /api/welcome

#[tokio::test]
async fn test_api_welcome() {
    let server = server();

    let named = body_json(server.handle(get("/api/welcome?name=Ada")).await).await;
    assert_eq!(named, serde_json::json!({ "message": "Hello Ada" }));

    let anonymous = body_json(server.handle(get("/api/welcome")).await).await;
    assert_eq!(anonymous, serde_json::json!({ "message": "Who are you?" }));
}

// Cross-cutting

#[tokio::test]
async fn test_unknown_route_is_not_found_envelope() {
    let response = server().handle(get("/nowhere")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let request_id = response.headers()[REQUEST_ID_HEADER]
        .to_str()
        .unwrap()
        .to_string();
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["request_id"], request_id);
}

#[tokio::test]
async fn test_every_response_has_request_id() {
    let server = server();
    let requests = vec![
        get("/"),
        get("/api/welcome"),
        get("/health"),
        get("/missing"),
        post_form("name=Grace"),
        post_json(r#"{"name":""}"#),
    ];

    for request in requests {
        let response = server.handle(request).await;
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}

#[tokio::test]
async fn test_health_and_ready() {
    let server = server();

    let health = server.handle(get("/health")).await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_json(health).await["status"], "healthy");

    assert_eq!(server.handle(get("/ready")).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_requests_get_equal_answers() {
    let server = Arc::new(server());

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                body_json(server.handle(get("/api/welcome?name=Grace")).await).await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(
            task.await.unwrap(),
            serde_json::json!({ "message": "Hello Grace" })
        );
    }
}
