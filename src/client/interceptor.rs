use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::store::TokenStore;

/// HTTP client for the API that attaches the current session token to every
/// outgoing request and transparently retries a 401 exactly once.
///
/// The retry re-reads the token store but does not obtain a fresh token; if
/// the retried request fails too, that failure is the caller's to handle.
/// Non-401 statuses and transport errors propagate immediately.
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
}

/// One outgoing request. The retry-once flag travels with the request
/// context rather than any shared state.
struct RequestContext {
    method: Method,
    path: String,
    body: Option<Value>,
    retried: bool,
}

impl RequestContext {
    fn new(method: Method, path: &str, body: Option<Value>) -> Self {
        RequestContext {
            method,
            path: path.to_string(),
            body,
            retried: false,
        }
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<TokenStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            http: Client::new(),
            base_url,
            tokens,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response, String> {
        self.execute(RequestContext::new(Method::GET, path, None)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Response, String> {
        self.execute(RequestContext::new(Method::POST, path, Some(body)))
            .await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<Response, String> {
        self.execute(RequestContext::new(Method::PATCH, path, Some(body)))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, String> {
        self.execute(RequestContext::new(Method::DELETE, path, None))
            .await
    }

    /// Issue one attempt: current token attached as a bearer credential
    /// when the store has one.
    async fn send(&self, ctx: &RequestContext) -> Result<Response, String> {
        let url = format!("{}{}", self.base_url, ctx.path);
        let mut request = self.http.request(ctx.method.clone(), &url);

        if let Some(token) = self.tokens.load().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &ctx.body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| format!("Request to {} failed: {}", url, e))
    }

    async fn execute(&self, mut ctx: RequestContext) -> Result<Response, String> {
        let response = self.send(&ctx).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !ctx.retried {
            ctx.retried = true;
            warn!("Got 401 from '{}', retrying once", ctx.path);
            return self.send(&ctx).await;
        }

        debug!("{} {} -> {}", ctx.method, ctx.path, response.status());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::config::{CookieConfig, FileStoreConfig};
    use crate::store::{CookieSink, FileSink, TokenSink};

    fn store_in(dir: &std::path::Path) -> Arc<TokenStore> {
        let file = Arc::new(FileSink::new(&FileStoreConfig {
            path: dir.join("session.json").to_string_lossy().into_owned(),
        }));
        let cookie = Arc::new(CookieSink::new(&CookieConfig::default()));
        let sinks: Vec<Arc<dyn TokenSink>> = vec![file, cookie];
        Arc::new(TokenStore::new(sinks))
    }

    /// The stored token rides along as a bearer credential.
    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = store_in(dir.path());
        tokens.save("tok-123").await;

        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/users/1")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), tokens);
        let response = client.get("/users/1").await.expect("request should succeed");

        m.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Without a stored token no Authorization header is sent.
    #[tokio::test]
    async fn test_no_token_means_no_auth_header() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = store_in(dir.path());

        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/users/1")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), tokens);
        client.get("/users/1").await.expect("request should succeed");

        m.assert_async().await;
    }

    /// A 401 triggers exactly one transparent retry; the second failure
    /// propagates to the caller.
    #[tokio::test]
    async fn test_401_is_retried_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = store_in(dir.path());
        tokens.save("stale").await;

        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/users/1")
            .with_status(401)
            .expect(2)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), tokens);
        let response = client.get("/users/1").await.expect("transport should succeed");

        m.assert_async().await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Non-401 failures are not retried.
    #[tokio::test]
    async fn test_other_errors_propagate_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = store_in(dir.path());

        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/users")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), tokens);
        let response = client
            .post("/users", json!({"name": "x"}))
            .await
            .expect("transport should succeed");

        m.assert_async().await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
