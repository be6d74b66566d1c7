use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::Service;

use server::auth::ServerState;
use server::routes;
use service::auth::password::PasswordHasher;
use service::auth::repository::mock::MockAuthRepository;
use service::auth::repository::AuthRepository;
use service::auth::token::TokenService;
use service::auth::AuthService;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

// The mock repository keeps the whole flow in memory; no database needed.
fn build_app(ttl_secs: i64) -> Router {
    let repo: Arc<dyn AuthRepository> = Arc::new(MockAuthRepository::default());
    let auth = Arc::new(AuthService::new(
        repo,
        PasswordHasher::default(),
        TokenService::new(b"test-secret", chrono::Duration::seconds(ttl_secs)),
    ));
    routes::build_router(cors(), ServerState { auth })
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_running() {
    let app = build_app(900);
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = app.clone().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"status": "running"}));
}

#[tokio::test]
async fn register_login_and_list_flow() {
    let app = build_app(900);

    // Register
    let resp = app
        .clone()
        .call(json_request("POST", "/users", &json!({"email": "a@x.com", "password": "p1"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["email"], "a@x.com");
    assert!(created["id"].is_string());
    assert!(created.get("password_hash").is_none());

    // Same email again, different password: still a conflict
    let resp = app
        .clone()
        .call(json_request("POST", "/users", &json!({"email": "a@x.com", "password": "p2"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await, json!({"error": "Email já cadastrado"}));

    // Wrong password
    let resp = app
        .clone()
        .call(json_request("POST", "/users/login", &json!({"email": "a@x.com", "password": "wrong"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"error": "Email ou senha inválidos"}));

    // Unknown email answers the same way
    let resp = app
        .clone()
        .call(json_request("POST", "/users/login", &json!({"email": "b@x.com", "password": "p1"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Correct credentials
    let resp = app
        .clone()
        .call(json_request("POST", "/users/login", &json!({"email": "a@x.com", "password": "p1"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let token = body_json(resp).await["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // Listing with the token
    let req = Request::builder()
        .uri("/users")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["email"], "a@x.com");
    assert_eq!(listed[0].as_object().unwrap().len(), 2);

    // Listing without a token
    let req = Request::builder().uri("/users").body(Body::empty()).unwrap();
    let resp = app.clone().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let app = build_app(900);

    for body in [json!({"email": "a@x.com"}), json!({"password": "p1"}), json!({})] {
        let resp = app.clone().call(json_request("POST", "/users", &body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "email e password são obrigatórios"}));
    }
}

#[tokio::test]
async fn listing_rejects_bad_bearer_tokens() {
    let app = build_app(900);

    let req = Request::builder()
        .uri("/users")
        .header("authorization", "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Wrong scheme
    let req = Request::builder()
        .uri("/users")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn listing_rejects_expired_tokens() {
    // Tokens from this app are already past their expiry when issued.
    let app = build_app(-60);

    let resp = app
        .clone()
        .call(json_request("POST", "/users", &json!({"email": "a@x.com", "password": "p1"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .call(json_request("POST", "/users/login", &json!({"email": "a@x.com", "password": "p1"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let token = body_json(resp).await["token"].as_str().unwrap().to_string();

    let req = Request::builder()
        .uri("/users")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
