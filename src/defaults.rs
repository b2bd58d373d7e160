//! Default Configuration Values
//!
//! Centralizes default values used by the HTTP layer and URL construction.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for HTTP requests.
    ///
    /// Rendering a full-size view image on a busy server can take a while,
    /// so this is more generous than a typical REST call.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("tableau-views/", env!("CARGO_PKG_VERSION"));

    /// Number of body bytes kept in the message of a non-2xx transport error
    pub const ERROR_BODY_EXCERPT: usize = 512;
}

/// REST API defaults
pub mod api {
    /// REST API version used when none is configured
    pub const VERSION: &str = "3.4";

    /// Header carrying the signed-in session token
    pub const AUTH_HEADER: &str = "X-Tableau-Auth";
}

/// Trusted-ticket snapshot endpoint of the AssessmentTool deployment
pub mod trusted_ticket {
    pub const BASE_URL: &str = "https://tableau.onware.com";
    pub const SITE: &str = "AssessmentTool";
    pub const WORKBOOK: &str = "Responses";
    pub const VIEW: &str = "Snapshot";
    pub const FORMAT: &str = "png";
    pub const COMPANY_ID: &str = "fd59cde3-90f8-463a-8c82-c5c1f030e9ea";
    pub const MODULE_ID: &str = "c9cb1e8e-ab27-4957-83a9-27f3bbdcdbf5";
}
