//! HTTP Interceptor interfaces
//!
//! Interceptors observe requests sent by [`ReqwestTransport`](crate::transport::ReqwestTransport):
//! they can tweak the request builder before send, observe responses, and be
//! notified of errors. Hooks are best-effort and should avoid expensive work.

use crate::error::{Operation, ViewError};
use reqwest::Method;

/// Context passed to interceptors and transports describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub request_id: String,
    pub operation: Operation,
    pub method: Method,
    pub url: String,
    /// URL as it may appear in logs; differs from `url` when the URL embeds
    /// a credential.
    pub display_url: String,
}

impl HttpRequestContext {
    pub fn new(operation: Operation, method: Method, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            request_id: generate_request_id(),
            operation,
            method,
            display_url: url.clone(),
            url,
        }
    }

    pub fn with_display_url(mut self, display_url: impl Into<String>) -> Self {
        self.display_url = display_url.into();
        self
    }
}

pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Return the (possibly modified)
    /// builder or an error to short-circuit the request.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ViewError> {
        Ok(builder)
    }

    /// Called once response headers are received, before the body is read.
    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        _response: &reqwest::Response,
    ) -> Result<(), ViewError> {
        Ok(())
    }

    /// Called when sending fails.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &ViewError) {}
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ViewError> {
        tracing::debug!(target: "tableau_views::http", request_id=%ctx.request_id, operation=%ctx.operation, method=%ctx.method, url=%ctx.display_url, "sending request");
        Ok(builder)
    }

    fn on_response(
        &self,
        ctx: &HttpRequestContext,
        response: &reqwest::Response,
    ) -> Result<(), ViewError> {
        tracing::debug!(target: "tableau_views::http", request_id=%ctx.request_id, operation=%ctx.operation, url=%ctx.display_url, status=%response.status().as_u16(), "response received");
        Ok(())
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &ViewError) {
        tracing::debug!(target: "tableau_views::http", request_id=%ctx.request_id, operation=%ctx.operation, url=%ctx.display_url, err=%error, "request error");
    }
}
