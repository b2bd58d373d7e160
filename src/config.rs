//! Client configuration
//!
//! All configuration types are plain serde structs so they can be embedded in
//! an application's own config file. [`Settings`] bundles them for the common
//! case of loading everything from one JSON document.

use crate::defaults;
use crate::error::ViewError;
use crate::types::TicketToken;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Custom headers sent with every request
    pub headers: HashMap<String, String>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
}

// Helper module for Duration serialization
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
        }
    }
}

impl HttpConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Build a `reqwest::Client` honoring timeouts, proxy, user agent and
    /// default headers.
    pub fn build_client(&self) -> Result<reqwest::Client, ViewError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy_url) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ViewError::configuration(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if !self.headers.is_empty() {
            let mut headers = reqwest::header::HeaderMap::new();
            for (k, v) in &self.headers {
                let name = reqwest::header::HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                    ViewError::configuration(format!("Invalid header name '{k}': {e}"))
                })?;
                let value = reqwest::header::HeaderValue::from_str(v).map_err(|e| {
                    ViewError::configuration(format!("Invalid header value for '{k}': {e}"))
                })?;
                headers.insert(name, value);
            }
            builder = builder.default_headers(headers);
        }

        builder
            .build()
            .map_err(|e| ViewError::configuration(format!("Failed to build HTTP client: {e}")))
    }
}

/// Location of the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Scheme and host, e.g. `https://tableau.example.com`
    pub server_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    defaults::api::VERSION.to_string()
}

impl ServerConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_version: default_api_version(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// `{server}/api/{version}` without a trailing slash.
    pub fn api_base(&self) -> Result<String, ViewError> {
        let server = self.server_url.trim_end_matches('/');
        if server.is_empty() {
            return Err(ViewError::configuration("server_url is empty"));
        }
        if self.api_version.is_empty() {
            return Err(ViewError::configuration("api_version is empty"));
        }
        Ok(format!("{server}/api/{}", self.api_version))
    }
}

/// Trusted-ticket render endpoint used by the filtered image fetch.
///
/// The ticket becomes a path segment; everything else is fixed per
/// deployment:
/// `{base_url}/trusted/{ticket}/t/{site}/views/{workbook}/{view}.{format}?{query}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedTicketEndpoint {
    pub base_url: String,
    pub site: String,
    pub workbook: String,
    pub view: String,
    pub format: String,
    /// Fixed query parameters, sent in order.
    #[serde(default)]
    pub query: Vec<(String, String)>,
}

impl Default for TrustedTicketEndpoint {
    fn default() -> Self {
        use defaults::trusted_ticket as d;
        Self {
            base_url: d::BASE_URL.to_string(),
            site: d::SITE.to_string(),
            workbook: d::WORKBOOK.to_string(),
            view: d::VIEW.to_string(),
            format: d::FORMAT.to_string(),
            query: vec![
                ("CompanyId".to_string(), d::COMPANY_ID.to_string()),
                ("ModuleId".to_string(), d::MODULE_ID.to_string()),
            ],
        }
    }
}

impl TrustedTicketEndpoint {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Render URL for one ticket.
    ///
    /// The ticket is written into the path as issued (`=` and `:` stay
    /// literal); only `/`, `?` and `#` are escaped so it stays one segment.
    /// An empty ticket is sent as-is and left for the server to refuse.
    pub fn url_for(&self, ticket: &TicketToken) -> Result<String, ViewError> {
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(ViewError::configuration("trusted ticket base_url is empty"));
        }

        let mut url = format!(
            "{base}/trusted/{}/t/{}/views/{}/{}.{}",
            ticket_segment(ticket.expose()),
            urlencoding::encode(&self.site),
            urlencoding::encode(&self.workbook),
            urlencoding::encode(&self.view),
            self.format,
        );
        for (i, (key, value)) in self.query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        Ok(url)
    }
}

fn ticket_segment(ticket: &str) -> String {
    let mut segment = String::with_capacity(ticket.len());
    for c in ticket.chars() {
        match c {
            '/' => segment.push_str("%2F"),
            '?' => segment.push_str("%3F"),
            '#' => segment.push_str("%23"),
            c => segment.push(c),
        }
    }
    segment
}

/// Everything needed to talk to one server, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub trusted_ticket: TrustedTicketEndpoint,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, ViewError> {
        serde_json::from_str(json)
            .map_err(|e| ViewError::configuration(format!("Invalid settings: {e}")))
    }
}
