//! Transport capability.
//!
//! A [`Transport`] is the only thing a [`Command`](crate::Command) needs to physically send a
//! request: one operation that either produces a [`Response`] or fails. Implementations must
//! be `Send + Sync` since a single transport is normally shared by many commands.
//!
//! [`ReqwestTransport`] is the production implementation. Connection pooling, redirects, TLS and
//! timeouts are all handled by the underlying `reqwest::Client`.
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use hyper::ext::ReasonPhrase;
use lazy_static::lazy_static;
use reqwest::redirect;
use url::Url;

use crate::config::TransportConfig;
use crate::errors::TransportError;
use crate::net::response::reason_phrase;
use crate::net::{Body, Request, Response};

/// Sends a request and returns a response or a failure.
pub trait Transport: Send + Sync {
    fn execute<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Response, TransportError>>;
}

lazy_static! {
    static ref DEFAULT_TRANSPORT: Arc<ReqwestTransport> = Arc::new(
        ReqwestTransport::new().unwrap_or_else(|e| {
            log::warn!("Cannot build configured default transport, using a plain client: {e}");
            ReqwestTransport::from_client(reqwest::Client::new())
        })
    );
}

/// Returns the process-wide default transport. Every call hands out the same instance.
pub fn default_transport() -> Arc<dyn Transport> {
    DEFAULT_TRANSPORT.clone()
}

/// Transport backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with [`TransportConfig::default`].
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&TransportConfig::default())
    }

    pub fn with_config(config: &TransportConfig) -> Result<Self, TransportError> {
        let redirect_policy = match config.max_redirects {
            0 => redirect::Policy::none(),
            n => redirect::Policy::limited(n),
        };

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(redirect_policy);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self::from_client(builder.build()?))
    }

    /// Wraps an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let url = Url::parse(&request.uri().to_string())
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {e}", request.uri())))?;

        log::trace!("{} {}", request.method(), url);
        let res = self
            .client
            .request(request.method().clone(), url)
            .headers(request.headers().clone())
            .body(request.body().clone())
            .send()
            .await?;

        // Fetch results
        let final_url = res.url().clone();
        let status = res.status().as_u16();
        // hyper only records the phrase when it differs from the canonical one
        let status_text = match res.extensions().get::<ReasonPhrase>() {
            Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
            None => reason_phrase(status),
        };
        let version = res.version();
        let headers = res.headers().clone();

        // Fetch body. We don't do streaming yet
        let body = res.bytes().await?.to_vec();
        log::debug!("{} {} -> {} ({} bytes)", request.method(), final_url, status, body.len());

        Ok(Response {
            url: final_url,
            status,
            status_text,
            version,
            headers,
            body: Some(Body::new(body)),
        })
    }
}

impl Transport for ReqwestTransport {
    fn execute<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Response, TransportError>> {
        self.send(request).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_is_shared() {
        let a = default_transport();
        let b = default_transport();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn relative_uri_is_an_invalid_request() {
        let transport = ReqwestTransport::new().unwrap();
        let request = http::Request::get("/").body(Vec::new()).unwrap();

        match transport.execute(&request).await {
            Err(TransportError::InvalidRequest(msg)) => assert!(msg.starts_with("/")),
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }
}
