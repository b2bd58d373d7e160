//! mockito test utilities
//!
//! Goals:
//! - Provide a unified async Server creation
//! - Build fetchers pointed at a mock server
//! - Insulate tests from future mockito API changes

#![allow(dead_code)]

use super::{API_VERSION, SITE_ID, session};
use mockito::{Server, ServerGuard};
use tableau_views::{ServerConfig, TrustedTicketEndpoint, ViewContentFetcher};

/// Start an async mockito Server
pub async fn start() -> ServerGuard {
    Server::new_async().await
}

/// Path of a view endpoint under the test site
pub fn site_path(rest: &str) -> String {
    format!("/api/{API_VERSION}/sites/{SITE_ID}/{rest}")
}

/// Fetcher whose REST API and trusted-ticket endpoint both live on `server`
pub fn fetcher(server: &ServerGuard) -> ViewContentFetcher {
    fetcher_for_url(&server.url())
}

pub fn fetcher_for_url(url: &str) -> ViewContentFetcher {
    ViewContentFetcher::builder()
        .server(ServerConfig::new(url).with_api_version(API_VERSION))
        .trusted_ticket(TrustedTicketEndpoint::default().with_base_url(url))
        .session(session())
        .build()
        .expect("fetcher should build")
}
