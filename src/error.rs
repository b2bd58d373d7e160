//! Error Handling Module
//!
//! Every failure carries the [`Operation`] that raised it so callers can
//! produce a diagnostic message without extra bookkeeping.
//!
//! # Example
//!
//! ```rust,ignore
//! use tableau_views::error::{ErrorCategory, Operation, ViewError};
//!
//! let error = ViewError::http_status(Operation::ViewData, 500, "boom");
//! assert_eq!(error.category(), ErrorCategory::Server);
//! assert_eq!(error.operation().map(|op| op.label()), Some("get view data"));
//! ```

use std::fmt;
use std::string::FromUtf8Error;

/// The view operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ViewThumbnail,
    ViewImage,
    ViewImageWithFilters,
    ViewData,
}

impl Operation {
    /// Diagnostic label attached to failures of this operation.
    ///
    /// The filtered render shares its label with the plain image fetch.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewThumbnail => "get view thumbnail",
            Self::ViewImage | Self::ViewImageWithFilters => "get view image",
            Self::ViewData => "get view data",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors returned by the view client.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The HTTP call failed: connection error (`status == None`) or a
    /// non-success status code.
    #[error("{operation} failed: {}", transport_detail(.status, .message))]
    Transport {
        operation: Operation,
        status: Option<u16>,
        message: String,
    },

    /// The response arrived but its body is not valid UTF-8.
    #[error("{operation} returned a body that is not valid UTF-8: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: FromUtf8Error,
    },

    /// Invalid configuration, session or URL; raised before anything is sent.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn transport_detail(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {code}: {message}"),
        None => message.to_string(),
    }
}

/// Coarse error classification for callers deciding how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The server could not be reached or the connection broke.
    Network,
    /// 4xx responses.
    Client,
    /// 5xx responses.
    Server,
    /// The payload arrived but is corrupt.
    Data,
    Configuration,
}

impl ViewError {
    pub fn connection(operation: Operation, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            status: None,
            message: message.into(),
        }
    }

    pub fn http_status(operation: Operation, status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// The operation that failed, if the error was raised by a request.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Transport { operation, .. } | Self::Decode { operation, .. } => Some(*operation),
            Self::Configuration(_) => None,
        }
    }

    /// HTTP status code of a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { status: None, .. } => ErrorCategory::Network,
            Self::Transport {
                status: Some(code), ..
            } if (400..500).contains(code) => ErrorCategory::Client,
            // Anything else that is not a 2xx is treated as a server fault.
            Self::Transport { .. } => ErrorCategory::Server,
            Self::Decode { .. } => ErrorCategory::Data,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }
}
