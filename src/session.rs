//! Signed-in session state.
//!
//! Sign-in itself happens elsewhere; this type only carries the token the
//! server issued and exposes it to request construction.

use crate::defaults;
use crate::error::ViewError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// An established session on one site.
#[derive(Clone)]
pub struct SessionContext {
    site_id: String,
    user_id: Option<String>,
    token: SecretString,
}

impl SessionContext {
    /// Wrap a token issued by a prior sign-in.
    pub fn signed_in(site_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            user_id: None,
            token: SecretString::from(token.into()),
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        !self.token.expose_secret().is_empty()
    }

    /// Headers that authenticate a request as this session.
    pub fn auth_headers(&self) -> Result<HeaderMap, ViewError> {
        if !self.is_signed_in() {
            return Err(ViewError::configuration("session is not signed in"));
        }
        let mut value = HeaderValue::from_str(self.token.expose_secret())
            .map_err(|e| ViewError::configuration(format!("Invalid session token: {e}")))?;
        value.set_sensitive(true);

        let name = HeaderName::from_bytes(defaults::api::AUTH_HEADER.as_bytes())
            .map_err(|e| ViewError::configuration(format!("Invalid auth header name: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(name, value);
        Ok(headers)
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("site_id", &self.site_id)
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
