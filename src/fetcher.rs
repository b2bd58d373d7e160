//! View content fetcher
//!
//! [`ViewContentFetcher`] downloads the renderings and data of a view. Each
//! buffered operation issues exactly one signed-in GET, drains the whole
//! body into memory and returns it as bytes or text. The `stream_*`
//! variants perform the same request but hand the body over unread.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tableau_views::{ServerConfig, SessionContext, ViewContentFetcher};
//!
//! let fetcher = ViewContentFetcher::builder()
//!     .server(ServerConfig::new("https://tableau.example.com"))
//!     .session(SessionContext::signed_in(site_id, token))
//!     .build()?;
//! let png = fetcher.get_image(workbook_id, view_id).await?;
//! let csv = fetcher.get_data(view_id).await?;
//! ```

use crate::config::{HttpConfig, ServerConfig, Settings, TrustedTicketEndpoint};
use crate::error::{Operation, ViewError};
use crate::execution::{decode_text, execute_signed_in_get, read_to_end};
use crate::interceptor::HttpRequestContext;
use crate::session::SessionContext;
use crate::transport::{ByteStream, HttpTransport, ReqwestTransport};
use crate::types::{ImageFilters, TicketToken, ViewIdentifier};
use crate::urls::{ServerUrls, ViewUrlBuilder};
use reqwest::Method;
use std::fmt;
use std::sync::Arc;

/// Fetches thumbnails, images and data extracts for views.
///
/// Holds only read-only shared handles, so it is cheap to clone and safe to
/// use from several tasks at once.
#[derive(Clone)]
pub struct ViewContentFetcher {
    urls: Arc<dyn ViewUrlBuilder>,
    session: Arc<SessionContext>,
    transport: Arc<dyn HttpTransport>,
    trusted_ticket: TrustedTicketEndpoint,
}

impl ViewContentFetcher {
    pub fn builder() -> ViewContentFetcherBuilder {
        ViewContentFetcherBuilder::default()
    }

    /// Fetcher using the default transport and trusted-ticket endpoint.
    pub fn new(
        urls: Arc<dyn ViewUrlBuilder>,
        session: Arc<SessionContext>,
    ) -> Result<Self, ViewError> {
        Self::builder()
            .url_builder_arc(urls)
            .session(session)
            .build()
    }

    pub fn from_settings(
        settings: &Settings,
        session: impl Into<Arc<SessionContext>>,
    ) -> Result<Self, ViewError> {
        Self::builder()
            .server(settings.server.clone())
            .http_config(settings.http.clone())
            .trusted_ticket(settings.trusted_ticket.clone())
            .session(session)
            .build()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn trusted_ticket(&self) -> &TrustedTicketEndpoint {
        &self.trusted_ticket
    }

    /// Reduced-size preview rendering of a view.
    pub async fn get_preview_thumbnail(
        &self,
        workbook_id: &str,
        view_id: &str,
    ) -> Result<Vec<u8>, ViewError> {
        read_to_end(self.stream_preview_thumbnail(workbook_id, view_id).await?).await
    }

    /// Full-resolution rendering of a view.
    pub async fn get_image(&self, workbook_id: &str, view_id: &str) -> Result<Vec<u8>, ViewError> {
        read_to_end(self.stream_image(workbook_id, view_id).await?).await
    }

    /// Rendering through the trusted-ticket endpoint.
    ///
    /// Only `ticket` shapes the request. `workbook_id`, `view_id` and
    /// `filters` are accepted but not sent: the endpoint always renders the
    /// view it is configured for, unfiltered.
    pub async fn get_image_with_filters(
        &self,
        workbook_id: &str,
        view_id: &str,
        filters: &ImageFilters,
        ticket: &TicketToken,
    ) -> Result<Vec<u8>, ViewError> {
        read_to_end(
            self.stream_image_with_filters(workbook_id, view_id, filters, ticket)
                .await?,
        )
        .await
    }

    /// The view's data extract, decoded as UTF-8 (CSV on Tableau Server).
    pub async fn get_data(&self, view_id: &str) -> Result<String, ViewError> {
        let bytes = read_to_end(self.stream_data(view_id).await?).await?;
        decode_text(Operation::ViewData, bytes)
    }

    pub async fn get_preview_thumbnail_for(
        &self,
        view: &ViewIdentifier,
    ) -> Result<Vec<u8>, ViewError> {
        self.get_preview_thumbnail(&view.workbook_id, &view.view_id)
            .await
    }

    pub async fn get_image_for(&self, view: &ViewIdentifier) -> Result<Vec<u8>, ViewError> {
        self.get_image(&view.workbook_id, &view.view_id).await
    }

    pub async fn stream_preview_thumbnail(
        &self,
        workbook_id: &str,
        view_id: &str,
    ) -> Result<ByteStream, ViewError> {
        let url = self
            .urls
            .view_thumbnail(workbook_id, view_id, &self.session)?;
        self.send(HttpRequestContext::new(
            Operation::ViewThumbnail,
            Method::GET,
            url,
        ))
        .await
    }

    pub async fn stream_image(
        &self,
        workbook_id: &str,
        view_id: &str,
    ) -> Result<ByteStream, ViewError> {
        let url = self.urls.view_image(workbook_id, view_id, &self.session)?;
        self.send(HttpRequestContext::new(Operation::ViewImage, Method::GET, url))
            .await
    }

    pub async fn stream_image_with_filters(
        &self,
        workbook_id: &str,
        view_id: &str,
        filters: &ImageFilters,
        ticket: &TicketToken,
    ) -> Result<ByteStream, ViewError> {
        // TODO: send filters as query parameters once the intended filter
        // semantics for the trusted-ticket endpoint are confirmed.
        tracing::debug!(
            target: "tableau_views::http",
            workbook_id,
            view_id,
            filters = ?filters,
            "trusted-ticket render ignores workbook, view and filter arguments"
        );
        let url = self.trusted_ticket.url_for(ticket)?;
        let display_url = self.trusted_ticket.url_for(&TicketToken::new("REDACTED"))?;
        self.send(
            HttpRequestContext::new(Operation::ViewImageWithFilters, Method::GET, url)
                .with_display_url(display_url),
        )
        .await
    }

    pub async fn stream_data(&self, view_id: &str) -> Result<ByteStream, ViewError> {
        let url = self.urls.view_data(view_id, &self.session)?;
        self.send(HttpRequestContext::new(Operation::ViewData, Method::GET, url))
            .await
    }

    async fn send(&self, ctx: HttpRequestContext) -> Result<ByteStream, ViewError> {
        execute_signed_in_get(self.transport.as_ref(), &self.session, ctx).await
    }
}

impl fmt::Debug for ViewContentFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewContentFetcher")
            .field("session", &self.session)
            .field("trusted_ticket", &self.trusted_ticket)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ViewContentFetcher`].
///
/// A URL builder and a signed-in session are required. The transport
/// defaults to a [`ReqwestTransport`] built from the HTTP config (or
/// [`HttpConfig::default`]); the trusted-ticket endpoint defaults to
/// [`TrustedTicketEndpoint::default`].
#[derive(Default)]
pub struct ViewContentFetcherBuilder {
    urls: Option<Arc<dyn ViewUrlBuilder>>,
    session: Option<Arc<SessionContext>>,
    transport: Option<Arc<dyn HttpTransport>>,
    http_config: Option<HttpConfig>,
    trusted_ticket: Option<TrustedTicketEndpoint>,
}

impl ViewContentFetcherBuilder {
    /// Use the standard REST layout of `server`.
    pub fn server(self, server: ServerConfig) -> Self {
        self.url_builder(ServerUrls::new(server))
    }

    pub fn url_builder(self, urls: impl ViewUrlBuilder + 'static) -> Self {
        self.url_builder_arc(Arc::new(urls))
    }

    pub fn url_builder_arc(mut self, urls: Arc<dyn ViewUrlBuilder>) -> Self {
        self.urls = Some(urls);
        self
    }

    pub fn session(mut self, session: impl Into<Arc<SessionContext>>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Replace the HTTP transport. Takes precedence over [`Self::http_config`].
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = Some(config);
        self
    }

    pub fn trusted_ticket(mut self, endpoint: TrustedTicketEndpoint) -> Self {
        self.trusted_ticket = Some(endpoint);
        self
    }

    pub fn build(self) -> Result<ViewContentFetcher, ViewError> {
        let urls = self
            .urls
            .ok_or_else(|| ViewError::configuration("URL builder not specified"))?;
        let session = self
            .session
            .ok_or_else(|| ViewError::configuration("session not specified"))?;
        if !session.is_signed_in() {
            return Err(ViewError::configuration("session is not signed in"));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let config = self.http_config.unwrap_or_default();
                Arc::new(ReqwestTransport::from_config(&config)?)
            }
        };

        Ok(ViewContentFetcher {
            urls,
            session,
            transport,
            trusted_ticket: self.trusted_ticket.unwrap_or_default(),
        })
    }
}
