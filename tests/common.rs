#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::Value;

use tokengate::auth::{create_backend, AuthService};
use tokengate::config::{Config, ConfigV1};
use tokengate::models::token::TokenCodec;
use tokengate::routes::create_router;
use tokengate::state::AppState;
use tokengate::store::create_store;

/// Test configuration. The durable-store path is substituted per test so
/// parallel tests never share a file.
pub fn load_test_config(store_path: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
bind_address: 127.0.0.1:8081
environment: "test"
logging:
  level: "debug"
  format: "json"
jwt:
  iss: tokengate-test
  exp: 86400
  secret: test-secret
store:
  file:
    path: "{store_path}"
  cookie:
    name: token
    max_age: 604800
backend:
  type: "fixture"
  name: "Fixture backend"
  users:
    - id: "1"
      username: user
      password: "123456a@"
      name: "Admin User"
      roles:
        - user
        - admin
"#
    );

    let config: Config = Figment::new()
        .merge(Yaml::string(&yaml))
        .extract()
        .expect("Failed to parse test config YAML");

    match config {
        Config::ConfigV1(cfg) => cfg,
    }
}

pub async fn build_app(config: ConfigV1) -> (Router, Arc<ConfigV1>) {
    let config = Arc::new(config);
    let store = create_store(&config.store);
    let backend = create_backend(&config.backend);
    let codec = TokenCodec::new(&config.jwt);
    let auth = Arc::new(AuthService::new(backend, codec, config.jwt.exp));

    let state = AppState {
        config: config.clone(),
        auth,
        store,
        started_at: Instant::now(),
    };

    (create_router(state), config)
}

pub fn get_request(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn request_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn json_request(path: &str, method: Method, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
