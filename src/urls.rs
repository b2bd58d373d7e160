//! REST endpoint URLs for view resources.

use crate::config::ServerConfig;
use crate::error::ViewError;
use crate::session::SessionContext;

/// Builds fully-qualified view endpoint URLs.
///
/// Implement this to target a server whose URL layout differs from the
/// standard REST API (a gateway, a test double).
pub trait ViewUrlBuilder: Send + Sync {
    fn view_thumbnail(
        &self,
        workbook_id: &str,
        view_id: &str,
        session: &SessionContext,
    ) -> Result<String, ViewError>;

    fn view_image(
        &self,
        workbook_id: &str,
        view_id: &str,
        session: &SessionContext,
    ) -> Result<String, ViewError>;

    /// Data extracts are addressed by view id alone.
    fn view_data(&self, view_id: &str, session: &SessionContext) -> Result<String, ViewError>;
}

/// Standard REST API layout rooted at a [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerUrls {
    config: ServerConfig,
}

impl ServerUrls {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn site_base(&self, session: &SessionContext) -> Result<String, ViewError> {
        Ok(format!(
            "{}/sites/{}",
            self.config.api_base()?,
            urlencoding::encode(session.site_id())
        ))
    }

    fn workbook_view(
        &self,
        workbook_id: &str,
        view_id: &str,
        session: &SessionContext,
        endpoint: &str,
    ) -> Result<String, ViewError> {
        Ok(format!(
            "{}/workbooks/{}/views/{}/{endpoint}",
            self.site_base(session)?,
            urlencoding::encode(workbook_id),
            urlencoding::encode(view_id),
        ))
    }
}

impl ViewUrlBuilder for ServerUrls {
    fn view_thumbnail(
        &self,
        workbook_id: &str,
        view_id: &str,
        session: &SessionContext,
    ) -> Result<String, ViewError> {
        self.workbook_view(workbook_id, view_id, session, "previewImage")
    }

    fn view_image(
        &self,
        workbook_id: &str,
        view_id: &str,
        session: &SessionContext,
    ) -> Result<String, ViewError> {
        self.workbook_view(workbook_id, view_id, session, "image")
    }

    fn view_data(&self, view_id: &str, session: &SessionContext) -> Result<String, ViewError> {
        Ok(format!(
            "{}/views/{}/data",
            self.site_base(session)?,
            urlencoding::encode(view_id)
        ))
    }
}
