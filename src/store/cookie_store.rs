use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;
use tokio::sync::RwLock;

use crate::config::CookieConfig;
use crate::store::TokenSink;

/// A sink modelling the browser cookie jar: the token value lives in memory
/// and `render_set_cookie` produces the `Set-Cookie` string with the
/// configured attributes.
///
/// The cookie is scoped to `Path=/` with `SameSite=Lax` and the configured
/// max-age. The `Domain` attribute is omitted for loopback/development hosts
/// and set explicitly otherwise.
pub struct CookieSink {
    config: CookieConfig,
    jar: RwLock<Option<String>>,
}

impl CookieSink {
    pub fn new(config: &CookieConfig) -> Self {
        CookieSink {
            config: config.clone(),
            jar: RwLock::new(None),
        }
    }

    /// Render the `Set-Cookie` header value used when persisting `token`.
    pub fn render_set_cookie(&self, token: &str) -> String {
        let mut builder = Cookie::build((self.config.name.clone(), token.to_string()))
            .path("/")
            .max_age(Duration::seconds(self.config.max_age))
            .same_site(SameSite::Lax);

        if let Some(host) = &self.config.host {
            if !is_loopback_host(host) {
                builder = builder.domain(host.clone());
            }
        }

        builder.build().to_string()
    }
}

/// Hosts for which the cookie `Domain` attribute is left unset.
fn is_loopback_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1" | "0.0.0.0") || host.ends_with(".localhost")
}

#[async_trait]
impl TokenSink for CookieSink {
    fn name(&self) -> &str {
        "cookie-jar"
    }

    async fn write(&self, token: &str) -> Result<(), String> {
        let rendered = self.render_set_cookie(token);
        tracing::debug!("Setting session cookie: {}", rendered);
        *self.jar.write().await = Some(token.to_string());
        Ok(())
    }

    async fn read(&self) -> Result<Option<String>, String> {
        Ok(self.jar.read().await.clone())
    }

    async fn delete(&self) -> Result<(), String> {
        *self.jar.write().await = None;
        Ok(())
    }
}
