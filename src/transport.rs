//! HTTP transport abstraction.
//!
//! The fetcher never talks to `reqwest` directly; it hands a fully built
//! request to an [`HttpTransport`]. [`ReqwestTransport`] is the production
//! implementation; tests and embedders can inject their own.

use crate::config::HttpConfig;
use crate::error::ViewError;
use crate::interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::HeaderMap;
use std::fmt;
use std::sync::Arc;

/// A response body as a sequence of chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes, ViewError>>;

/// Transport-level request data. Method and URL live in `ctx`.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub ctx: HttpRequestContext,
    pub headers: HeaderMap,
}

/// Transport-level response data. The body has not been read yet.
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl HttpTransportResponse {
    /// A response whose body is delivered as the given chunks, in order.
    pub fn from_chunks(status: u16, chunks: Vec<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: stream::iter(chunks.into_iter().map(Ok)).boxed(),
        }
    }

    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        Self::from_chunks(status, vec![body.into()])
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Debug for HttpTransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Performs one HTTP call.
///
/// Implementations return `Ok` for every response that arrived, whatever
/// its status; status handling is the caller's job. Connection-level
/// failures are returned as [`ViewError::Transport`] labelled with
/// `request.ctx.operation`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, ViewError>;
}

/// [`HttpTransport`] backed by a `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            interceptors: Vec::new(),
        }
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, ViewError> {
        Ok(Self::new(config.build_client()?))
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Shorthand for adding a [`LoggingInterceptor`].
    pub fn with_logging(self) -> Self {
        self.with_interceptor(Arc::new(LoggingInterceptor))
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, ViewError> {
        let HttpTransportRequest { ctx, headers } = request;

        let mut rb = self
            .client
            .request(ctx.method.clone(), &ctx.url)
            .headers(headers);
        for interceptor in &self.interceptors {
            rb = interceptor.on_before_send(&ctx, rb)?;
        }

        let resp = match rb.send().await {
            Ok(resp) => resp,
            Err(e) => {
                let error = ViewError::connection(ctx.operation, e.to_string());
                for interceptor in &self.interceptors {
                    interceptor.on_error(&ctx, &error);
                }
                return Err(error);
            }
        };
        for interceptor in &self.interceptors {
            interceptor.on_response(&ctx, &resp)?;
        }

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let operation = ctx.operation;
        let body = resp
            .bytes_stream()
            .map(move |chunk| {
                chunk.map_err(|e| {
                    ViewError::connection(operation, format!("failed to read response body: {e}"))
                })
            })
            .boxed();

        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }
}
