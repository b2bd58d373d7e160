//! Unified entry for test support modules
//!
//! - Wrap mockito server setup behind small helpers
//! - Provide an in-memory transport that records what the fetcher sends

#![allow(dead_code)]

pub mod mockito;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tableau_views::{
    HttpTransport, HttpTransportRequest, HttpTransportResponse, ServerConfig, SessionContext,
    ViewContentFetcher, ViewError,
};

pub const SITE_ID: &str = "site-1";
pub const TOKEN: &str = "tok-123";
pub const API_VERSION: &str = "3.4";

pub fn session() -> SessionContext {
    SessionContext::signed_in(SITE_ID, TOKEN)
}

/// Transport that answers every request with the same canned response and
/// keeps the requests it saw.
pub struct RecordingTransport {
    status: u16,
    chunks: Vec<Bytes>,
    requests: Mutex<Vec<HttpTransportRequest>>,
}

impl RecordingTransport {
    pub fn new(status: u16, chunks: Vec<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            status,
            chunks: chunks.into_iter().map(Bytes::from).collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: &[u8]) -> Arc<Self> {
        Self::new(200, vec![body.to_vec()])
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.ctx.url.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<HttpTransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, ViewError> {
        self.requests.lock().unwrap().push(request);
        Ok(HttpTransportResponse::from_chunks(
            self.status,
            self.chunks.clone(),
        ))
    }
}

/// Fetcher pointed at `http://views.test` that sends through `transport`.
pub fn fetcher_with(transport: Arc<RecordingTransport>) -> ViewContentFetcher {
    ViewContentFetcher::builder()
        .server(ServerConfig::new("http://views.test").with_api_version(API_VERSION))
        .session(session())
        .transport(transport)
        .build()
        .expect("fetcher should build")
}
